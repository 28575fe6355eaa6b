// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "auth/mod.rs"]
pub mod auth;

#[path = "journal/mod.rs"]
pub mod journal;

#[path = "moderation/mod.rs"]
pub mod moderation;
