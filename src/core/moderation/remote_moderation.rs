// Remote moderation adapter - wraps a third-party moderation endpoint.
//
// The remote layer is best-effort: any provider failure is logged and the
// entry is treated as not flagged. The local layers stay authoritative.

use super::moderation_models::{ModerationCategory, ModerationVerdict, RemoteModerationResult};
use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ModerationProviderError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Malformed moderation response: {0}")]
    MalformedResponse(String),
}

// ============================================================================
// PROVIDER TRAIT (PORT)
// ============================================================================

/// A remote content moderation service.
#[async_trait]
pub trait ModerationProvider: Send + Sync {
    /// Classify `text`, returning the flagged bit and per-category flags.
    async fn moderate(&self, text: &str) -> Result<RemoteModerationResult, ModerationProviderError>;
}

#[async_trait]
impl ModerationProvider for Box<dyn ModerationProvider> {
    async fn moderate(&self, text: &str) -> Result<RemoteModerationResult, ModerationProviderError> {
        (**self).moderate(text).await
    }
}

// ============================================================================
// MESSAGES
// ============================================================================

pub const VIOLENCE_MESSAGE: &str = "Lumina Journal is not a space for violent content. \
Please use your journal to reflect on your own thoughts and experiences.";

pub const SELF_HARM_MESSAGE: &str = "It sounds like you may be going through something really \
painful. You don't have to face it alone: please call or text 988 to reach the 988 Suicide & \
Crisis Lifeline, or contact your local emergency services.";

pub const HATE_MESSAGE: &str =
    "Please keep entries respectful. Lumina Journal is a space for personal reflection.";

pub const FLAGGED_MESSAGE: &str = "This content was flagged as potentially harmful. \
Lumina Journal is designed for personal reflection and emotional wellbeing only.";

/// Category flags checked in priority order. The first flagged one picks the message.
const CATEGORY_MESSAGES: &[(&[&str], &str)] = &[
    (&["violence", "violence/graphic"], VIOLENCE_MESSAGE),
    (&["self-harm"], SELF_HARM_MESSAGE),
    (&["hate"], HATE_MESSAGE),
];

/// Pick the user-facing message for a flagged result.
pub fn flagged_message(result: &RemoteModerationResult) -> &'static str {
    CATEGORY_MESSAGES
        .iter()
        .find(|(categories, _)| categories.iter().any(|c| result.is_flagged(c)))
        .map(|(_, message)| *message)
        .unwrap_or(FLAGGED_MESSAGE)
}

// ============================================================================
// ADAPTER
// ============================================================================

/// Fail-open wrapper around an optional moderation provider.
pub struct RemoteModerationAdapter<P: ModerationProvider> {
    provider: Option<P>,
}

impl<P: ModerationProvider> RemoteModerationAdapter<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// An adapter that never flags anything (remote layer switched off).
    pub fn disabled() -> Self {
        Self { provider: None }
    }

    /// Returns a rejection verdict when the provider flags `text`.
    ///
    /// Provider errors are logged and treated as "not flagged".
    pub async fn check(&self, text: &str) -> Option<ModerationVerdict> {
        let provider = self.provider.as_ref()?;

        let result = match provider.moderate(text).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Remote moderation unavailable, allowing entry: {}", e);
                return None;
            }
        };

        if !result.flagged {
            return None;
        }

        let flagged: Vec<&str> = result
            .categories
            .iter()
            .filter(|(_, flagged)| **flagged)
            .map(|(name, _)| name.as_str())
            .collect();
        tracing::info!(categories = ?flagged, "Entry flagged by remote moderation");

        Some(ModerationVerdict::rejected(
            ModerationCategory::Harmful,
            flagged_message(&result),
        ))
    }
}

// ============================================================================
// TESTS
// ============================================================================
