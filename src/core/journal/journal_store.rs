use super::journal_models::JournalEntry;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence port for journal entries.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn save_entry(&self, entry: &JournalEntry) -> Result<(), StoreError>;

    /// Most recent entries for a user, newest first.
    async fn recent_entries(&self, user_id: &str, limit: usize)
        -> Result<Vec<JournalEntry>, StoreError>;

    /// All entries for a user, oldest first.
    async fn all_entries(&self, user_id: &str) -> Result<Vec<JournalEntry>, StoreError>;
}

#[async_trait]
impl EntryStore for Box<dyn EntryStore> {
    async fn save_entry(&self, entry: &JournalEntry) -> Result<(), StoreError> {
        (**self).save_entry(entry).await
    }

    async fn recent_entries(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        (**self).recent_entries(user_id, limit).await
    }

    async fn all_entries(&self, user_id: &str) -> Result<Vec<JournalEntry>, StoreError> {
        (**self).all_entries(user_id).await
    }
}
