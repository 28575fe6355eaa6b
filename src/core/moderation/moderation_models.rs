// Moderation domain models - verdicts produced by the moderation gate.
//
// These are pure domain types with no HTTP dependencies.
// The http layer converts a rejected verdict into a 400 response.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Why an entry was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModerationCategory {
    /// Dangerous requests, self-harm, abuse
    Harmful,
    /// Illegal activity (reported as `Harmful` by the local classifier)
    #[allow(dead_code)]
    Illegal,
    /// General-assistant requests and factual questions
    OffTopic,
    /// Test strings, shouting, too-short text
    Spam,
}

impl std::fmt::Display for ModerationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModerationCategory::Harmful => write!(f, "harmful"),
            ModerationCategory::Illegal => write!(f, "illegal"),
            ModerationCategory::OffTopic => write!(f, "off-topic"),
            ModerationCategory::Spam => write!(f, "spam"),
        }
    }
}

/// Outcome of one moderation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModerationVerdict {
    pub appropriate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ModerationCategory>,
}

impl ModerationVerdict {
    /// Create an "appropriate" verdict
    pub fn appropriate() -> Self {
        Self {
            appropriate: true,
            reason: None,
            category: None,
        }
    }

    /// Create a rejection with a category and user-facing reason
    pub fn rejected(category: ModerationCategory, reason: impl Into<String>) -> Self {
        Self {
            appropriate: false,
            reason: Some(reason.into()),
            category: Some(category),
        }
    }
}

/// Final decision of the whole gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Entry may be analyzed and persisted
    Accept,
    /// Entry is rejected; the verdict carries reason and category
    Reject(ModerationVerdict),
}

/// Result returned by a remote moderation provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RemoteModerationResult {
    pub flagged: bool,
    /// Category name -> flagged, e.g. `"violence/graphic": true`
    #[serde(default)]
    pub categories: BTreeMap<String, bool>,
}

impl RemoteModerationResult {
    /// Whether a named category is flagged. Missing categories count as false.
    pub fn is_flagged(&self, category: &str) -> bool {
        self.categories.get(category).copied().unwrap_or(false)
    }
}
