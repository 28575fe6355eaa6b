// Journal domain models.
//
// The moderation outcome is never stored; only the text and its AI analysis.

use crate::core::ai::EntryAnalysis;
use crate::core::moderation::ModerationVerdict;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: String,
    pub content: String,
    /// Serialized as `sentiment` so clients can send entries back as context.
    #[serde(rename = "sentiment")]
    pub analysis: EntryAnalysis,
    #[serde(rename = "followUpPrompt", skip_serializing_if = "Option::is_none")]
    pub follow_up_prompt: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn new(
        user_id: impl Into<String>,
        content: impl Into<String>,
        analysis: EntryAnalysis,
        follow_up_prompt: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            content: content.into(),
            analysis,
            follow_up_prompt,
            created_at: Utc::now(),
        }
    }
}

/// A previous entry sent by the client as context for the follow-up question.
///
/// Only the themes are used; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentEntry {
    #[serde(default)]
    pub sentiment: Option<RecentSentiment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentSentiment {
    #[serde(default)]
    pub themes: Option<Vec<String>>,
}

/// Flatten the themes of recent entries, in order.
pub fn recent_themes(entries: &[RecentEntry]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|e| e.sentiment.as_ref())
        .filter_map(|s| s.themes.as_ref())
        .flatten()
        .cloned()
        .collect()
}

/// What happened to a submitted entry.
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    /// Moderation rejected the entry. Nothing was analyzed or stored.
    Rejected(ModerationVerdict),
    /// The entry was analyzed and stored.
    Accepted(JournalEntry),
}
