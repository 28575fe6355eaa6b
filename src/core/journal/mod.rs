// Core journal module - entry submission pipeline, persistence port and insights.

pub mod insights;
pub mod journal_models;
pub mod journal_service;
pub mod journal_store;

pub use insights::Insights;
pub use journal_models::{JournalEntry, RecentEntry, SubmissionOutcome};
pub use journal_service::JournalService;
pub use journal_store::{EntryStore, StoreError};
