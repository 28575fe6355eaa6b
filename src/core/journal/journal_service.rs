// Journal service - the entry submission pipeline.
//
// moderation gate -> sentiment analysis -> follow-up question -> persist
//
// Nothing is analyzed or stored unless the gate accepts the entry, and
// nothing is stored unless both AI calls succeed.

use super::insights::Insights;
use super::journal_models::{recent_themes, JournalEntry, RecentEntry, SubmissionOutcome};
use super::journal_store::{EntryStore, StoreError};
use crate::core::ai::{AiError, AiProvider, AiService};
use crate::core::moderation::{GateDecision, ModerationGate, ModerationProvider};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("AI error: {0}")]
    Ai(#[from] AiError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub struct JournalService<A: AiProvider, M: ModerationProvider, S: EntryStore> {
    gate: ModerationGate<M>,
    ai: AiService<A>,
    store: S,
}

impl<A: AiProvider, M: ModerationProvider, S: EntryStore> JournalService<A, M, S> {
    pub fn new(gate: ModerationGate<M>, ai: AiService<A>, store: S) -> Self {
        Self { gate, ai, store }
    }

    /// Moderate, analyze and store a new entry.
    pub async fn submit(
        &self,
        user_id: &str,
        content: &str,
        recent: &[RecentEntry],
    ) -> Result<SubmissionOutcome, JournalError> {
        if let GateDecision::Reject(verdict) = self.gate.evaluate(content).await {
            tracing::info!(
                user_id,
                category = ?verdict.category,
                "Entry rejected by moderation"
            );
            return Ok(SubmissionOutcome::Rejected(verdict));
        }

        let analysis = self.ai.analyze_entry(content).await?;
        let themes = recent_themes(recent);
        let follow_up = self.ai.follow_up_question(content, &themes).await?;

        let entry = JournalEntry::new(user_id, content, analysis, Some(follow_up));
        self.store.save_entry(&entry).await?;

        tracing::info!(user_id, entry_id = %entry.id, "Journal entry saved");
        Ok(SubmissionOutcome::Accepted(entry))
    }

    /// Most recent entries for a user, newest first.
    pub async fn recent_entries(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<JournalEntry>, JournalError> {
        Ok(self.store.recent_entries(user_id, limit).await?)
    }

    /// Mood chart and top themes over all of a user's entries.
    pub async fn insights(&self, user_id: &str) -> Result<Insights, JournalError> {
        let entries = self.store.all_entries(user_id).await?;
        Ok(Insights::from_entries(&entries))
    }
}

// ============================================================================
// TESTS
// ============================================================================
