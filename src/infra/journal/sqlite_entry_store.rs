// SQLite-backed journal entry store.
//
// Tables:
// - journal_entries: entry text plus its AI analysis as a JSON blob

use crate::core::ai::EntryAnalysis;
use crate::core::journal::{EntryStore, JournalEntry, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

pub struct SqliteEntryStore {
    pool: Pool<Sqlite>,
}

impl SqliteEntryStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Run database migrations to create required tables.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS journal_entries (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                content TEXT NOT NULL,
                analysis TEXT NOT NULL,
                follow_up_prompt TEXT,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_journal_entries_user_created
                ON journal_entries(user_id, created_at);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    /// Fixed-width timestamps so text ordering matches time ordering.
    fn format_timestamp(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn row_to_entry(row: &SqliteRow) -> Result<JournalEntry, StoreError> {
        let id: String = row.get("id");
        let analysis: String = row.get("analysis");
        let created_at: String = row.get("created_at");

        Ok(JournalEntry {
            id: Uuid::parse_str(&id).map_err(|e| StoreError::Database(e.to_string()))?,
            user_id: row.get("user_id"),
            content: row.get("content"),
            analysis: serde_json::from_str::<EntryAnalysis>(&analysis)?,
            follow_up_prompt: row.get("follow_up_prompt"),
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| StoreError::Database(e.to_string()))?,
        })
    }
}

#[async_trait]
impl EntryStore for SqliteEntryStore {
    async fn save_entry(&self, entry: &JournalEntry) -> Result<(), StoreError> {
        let analysis = serde_json::to_string(&entry.analysis)?;

        sqlx::query(
            r#"
            INSERT INTO journal_entries (id, user_id, content, analysis, follow_up_prompt, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(&entry.user_id)
        .bind(&entry.content)
        .bind(analysis)
        .bind(entry.follow_up_prompt.as_deref())
        .bind(Self::format_timestamp(&entry.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn recent_entries(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, content, analysis, follow_up_prompt, created_at
            FROM journal_entries
            WHERE user_id = ?
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn all_entries(&self, user_id: &str) -> Result<Vec<JournalEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, content, analysis, follow_up_prompt, created_at
            FROM journal_entries
            WHERE user_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.iter().map(Self::row_to_entry).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ai::models::Sentiment;
    use crate::core::ai::SentimentLabel;
    use chrono::Duration;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_store() -> SqliteEntryStore {
        // A single connection keeps every query on the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = SqliteEntryStore::new(pool);
        store.migrate().await.unwrap();
        store
    }

    fn entry(user_id: &str, content: &str, minutes_ago: i64) -> JournalEntry {
        let mut entry = JournalEntry::new(
            user_id,
            content,
            EntryAnalysis {
                sentiment: Sentiment {
                    score: 0.25,
                    label: SentimentLabel::Positive,
                },
                themes: vec!["work".to_string()],
                emotions: vec!["relief".to_string()],
            },
            Some("What helped most?".to_string()),
        );
        entry.created_at = Utc::now() - Duration::minutes(minutes_ago);
        entry
    }

    #[tokio::test]
    async fn test_save_and_load_entry() {
        let store = memory_store().await;
        let saved = entry("alice", "Finished the project today", 0);
        store.save_entry(&saved).await.unwrap();

        let loaded = store.all_entries("alice").await.unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, saved.id);
        assert_eq!(loaded[0].content, saved.content);
        assert_eq!(loaded[0].analysis, saved.analysis);
        assert_eq!(loaded[0].follow_up_prompt, saved.follow_up_prompt);
        assert_eq!(
            loaded[0].created_at.timestamp_micros(),
            saved.created_at.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn test_entries_are_scoped_and_ordered() {
        let store = memory_store().await;
        store.save_entry(&entry("alice", "oldest", 30)).await.unwrap();
        store.save_entry(&entry("alice", "newest", 1)).await.unwrap();
        store.save_entry(&entry("alice", "middle", 10)).await.unwrap();
        store.save_entry(&entry("bob", "not alice", 5)).await.unwrap();

        let recent = store.recent_entries("alice", 2).await.unwrap();
        let contents: Vec<&str> = recent.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["newest", "middle"]);

        let all = store.all_entries("alice").await.unwrap();
        let contents: Vec<&str> = all.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["oldest", "middle", "newest"]);
    }

    #[tokio::test]
    async fn test_unknown_user_has_no_entries() {
        let store = memory_store().await;
        assert!(store.recent_entries("nobody", 5).await.unwrap().is_empty());
    }
}
