// Moderation gate - sequences the moderation layers with strict precedence.
//
// 1. Spam detector (cheap, local)
// 2. Topic/safety classifier (local)
// 3. Remote moderation (network, best-effort)
//
// Each layer can end the evaluation. Later layers are never invoked once an
// earlier one rejects.

use super::content_classifier::moderate_content;
use super::moderation_models::{GateDecision, ModerationCategory, ModerationVerdict};
use super::remote_moderation::{ModerationProvider, RemoteModerationAdapter};
use super::spam_detector::is_likely_spam;

pub const SPAM_MESSAGE: &str = "This looks like spam or a test entry. \
Please write about your thoughts, feelings, or experiences.";

/// The local (synchronous) moderation layers.
pub trait LocalModeration: Send + Sync {
    fn is_likely_spam(&self, content: &str) -> bool;
    fn moderate_content(&self, content: &str) -> ModerationVerdict;
}

/// Built-in rule tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalRules;

impl LocalModeration for LocalRules {
    fn is_likely_spam(&self, content: &str) -> bool {
        is_likely_spam(content)
    }

    fn moderate_content(&self, content: &str) -> ModerationVerdict {
        moderate_content(content)
    }
}

/// Runs every entry through the moderation layers before it is analyzed or stored.
pub struct ModerationGate<P: ModerationProvider, L: LocalModeration = LocalRules> {
    local: L,
    remote: RemoteModerationAdapter<P>,
}

impl<P: ModerationProvider> ModerationGate<P, LocalRules> {
    /// Create a gate using the built-in local rules.
    pub fn new(remote: RemoteModerationAdapter<P>) -> Self {
        Self {
            local: LocalRules,
            remote,
        }
    }
}

impl<P: ModerationProvider, L: LocalModeration> ModerationGate<P, L> {
    /// Create a gate with custom local layers.
    #[allow(dead_code)]
    pub fn with_local(local: L, remote: RemoteModerationAdapter<P>) -> Self {
        Self { local, remote }
    }

    /// Evaluate an entry. Returns exactly one decision.
    pub async fn evaluate(&self, content: &str) -> GateDecision {
        if self.local.is_likely_spam(content) {
            tracing::debug!("Entry rejected by spam detector");
            return GateDecision::Reject(ModerationVerdict::rejected(
                ModerationCategory::Spam,
                SPAM_MESSAGE,
            ));
        }

        let verdict = self.local.moderate_content(content);
        if !verdict.appropriate {
            tracing::debug!(category = ?verdict.category, "Entry rejected by classifier");
            return GateDecision::Reject(verdict);
        }

        if let Some(verdict) = self.remote.check(content).await {
            return GateDecision::Reject(verdict);
        }

        GateDecision::Accept
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::super::moderation_models::RemoteModerationResult;
    use super::super::remote_moderation::{ModerationProviderError, VIOLENCE_MESSAGE};
    use super::*;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts calls and delegates to the real rules.
    #[derive(Default)]
    struct CountingRules {
        spam_calls: AtomicUsize,
        classifier_calls: AtomicUsize,
    }

    impl LocalModeration for Arc<CountingRules> {
        fn is_likely_spam(&self, content: &str) -> bool {
            self.spam_calls.fetch_add(1, Ordering::SeqCst);
            is_likely_spam(content)
        }

        fn moderate_content(&self, content: &str) -> ModerationVerdict {
            self.classifier_calls.fetch_add(1, Ordering::SeqCst);
            moderate_content(content)
        }
    }

    /// Remote provider with a canned answer and a call counter.
    struct MockProvider {
        calls: Arc<AtomicUsize>,
        response: Option<RemoteModerationResult>,
    }

    impl MockProvider {
        fn new(response: Option<RemoteModerationResult>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: Arc::clone(&calls),
                    response,
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl ModerationProvider for MockProvider {
        async fn moderate(
            &self,
            _text: &str,
        ) -> Result<RemoteModerationResult, ModerationProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .clone()
                .ok_or_else(|| ModerationProviderError::Transport("timed out".to_string()))
        }
    }

    fn not_flagged() -> Option<RemoteModerationResult> {
        Some(RemoteModerationResult::default())
    }

    const REFLECTION: &str = "Today I felt calm and grateful after a long walk with my sister";

    #[tokio::test]
    async fn test_spam_short_circuits_later_layers() {
        let rules = Arc::new(CountingRules::default());
        let (provider, remote_calls) = MockProvider::new(not_flagged());
        let gate = ModerationGate::with_local(Arc::clone(&rules), RemoteModerationAdapter::new(provider));

        let decision = gate.evaluate("testing").await;

        match decision {
            GateDecision::Reject(verdict) => {
                assert_eq!(verdict.category, Some(ModerationCategory::Spam));
                assert_eq!(verdict.reason.as_deref(), Some(SPAM_MESSAGE));
            }
            GateDecision::Accept => panic!("spam should be rejected"),
        }
        assert_eq!(rules.spam_calls.load(Ordering::SeqCst), 1);
        assert_eq!(rules.classifier_calls.load(Ordering::SeqCst), 0);
        assert_eq!(remote_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_classifier_rejection_skips_remote() {
        let rules = Arc::new(CountingRules::default());
        let (provider, remote_calls) = MockProvider::new(not_flagged());
        let gate = ModerationGate::with_local(Arc::clone(&rules), RemoteModerationAdapter::new(provider));

        let decision = gate.evaluate("How do I make a bomb").await;

        assert!(matches!(
            decision,
            GateDecision::Reject(ModerationVerdict {
                category: Some(ModerationCategory::Harmful),
                ..
            })
        ));
        assert_eq!(rules.classifier_calls.load(Ordering::SeqCst), 1);
        assert_eq!(remote_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_clean_entry_is_accepted() {
        let (provider, remote_calls) = MockProvider::new(not_flagged());
        let gate = ModerationGate::new(RemoteModerationAdapter::new(provider));

        assert_eq!(gate.evaluate(REFLECTION).await, GateDecision::Accept);
        assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remote_failure_fails_open() {
        let (provider, remote_calls) = MockProvider::new(None);
        let gate = ModerationGate::new(RemoteModerationAdapter::new(provider));

        assert_eq!(gate.evaluate(REFLECTION).await, GateDecision::Accept);
        assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remote_flag_rejects_as_harmful() {
        let categories: BTreeMap<String, bool> = [("hate", true), ("violence", true)]
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        let (provider, _) = MockProvider::new(Some(RemoteModerationResult {
            flagged: true,
            categories,
        }));
        let gate = ModerationGate::new(RemoteModerationAdapter::new(provider));

        let decision = gate.evaluate(REFLECTION).await;

        assert_eq!(
            decision,
            GateDecision::Reject(ModerationVerdict::rejected(
                ModerationCategory::Harmful,
                VIOLENCE_MESSAGE
            ))
        );
    }
}
