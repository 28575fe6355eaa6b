use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::auth::session_auth_middleware;
use super::routes::{analyze_handler, entries_handler, health_handler, insights_handler};
use crate::core::ai::AiProvider;
use crate::core::auth::SessionStore;
use crate::core::journal::{EntryStore, JournalService};
use crate::core::moderation::ModerationProvider;

/// Journal service wired with runtime-selected adapters.
pub type AppJournalService =
    JournalService<Box<dyn AiProvider>, Box<dyn ModerationProvider>, Box<dyn EntryStore>>;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub journal: Arc<AppJournalService>,
    pub sessions: Arc<dyn SessionStore>,
    pub recent_entries_limit: usize,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/journal/analyze", post(analyze_handler))
        .route("/api/journal/entries", get(entries_handler))
        .route("/api/journal/insights", get(insights_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// TESTS
// ============================================================================
