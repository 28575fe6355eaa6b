// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "auth/sqlite_session_store.rs"]
pub mod auth;

#[path = "journal/sqlite_entry_store.rs"]
pub mod journal;
