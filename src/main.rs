// Entry point of the journaling API.
//
// **Architecture Overview:**
// - `core/` = Business logic (moderation gate, AI analysis, journal pipeline)
// - `infra/` = Implementations of core traits (SQLite stores, OpenAI client)
// - `http/` = axum adapter (routes, session middleware, error mapping)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Serve the HTTP router

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "http/http_layer.rs"]
mod http;
#[path = "infra/infra_layer.rs"]
mod infra;

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::core::ai::{AiProvider, AiService};
use crate::core::journal::{EntryStore, JournalService};
use crate::core::moderation::{ModerationGate, ModerationProvider, RemoteModerationAdapter};
use crate::http::{build_router, AppState};
use crate::infra::ai::OpenAiClient;
use crate::infra::auth::SqliteSessionStore;
use crate::infra::journal::SqliteEntryStore;

/// Lifetime of the development session seeded at startup.
const DEV_SESSION_DAYS: i64 = 30;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lumina_journal=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    tracing::info!("Starting Lumina journal API");

    // Database
    let pool = SqlitePoolOptions::new()
        .connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to connect to {}", config.database_url))?;

    let entry_store = SqliteEntryStore::new(pool.clone());
    entry_store
        .migrate()
        .await
        .context("Failed to migrate journal entries")?;

    let session_store = SqliteSessionStore::new(pool);
    session_store
        .migrate()
        .await
        .context("Failed to migrate sessions")?;

    if let Some((token, user_id)) = &config.dev_session {
        let expires_at = Utc::now() + ChronoDuration::days(DEV_SESSION_DAYS);
        session_store
            .insert_session(token, user_id, expires_at)
            .await
            .context("Failed to seed development session")?;
        tracing::warn!(user_id = %user_id, "Development session seeded");
    }

    // AI provider (chat + moderation share one HTTP client)
    let openai = OpenAiClient::new(
        &config.openai_api_key,
        config.openai_base_url.clone(),
        config.request_timeout,
        config.moderation_timeout,
    )
    .context("Failed to build OpenAI client")?;

    let remote = if config.remote_moderation_enabled {
        let provider: Box<dyn ModerationProvider> = Box::new(openai.clone());
        RemoteModerationAdapter::new(provider)
    } else {
        tracing::warn!("Remote moderation disabled, only local rules apply");
        RemoteModerationAdapter::disabled()
    };

    let ai_provider: Box<dyn AiProvider> = Box::new(openai);
    let ai_service = AiService::new(ai_provider, config.openai_model.clone());

    let store: Box<dyn EntryStore> = Box::new(entry_store);
    let journal = JournalService::new(ModerationGate::new(remote), ai_service, store);

    let state = AppState {
        journal: Arc::new(journal),
        sessions: Arc::new(session_store),
        recent_entries_limit: config.recent_entries_limit,
    };

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
