use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::infra::ai::DEFAULT_BASE_URL;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub request_timeout: Duration,
    /// Skip the remote moderation layer entirely when false
    pub remote_moderation_enabled: bool,
    pub moderation_timeout: Duration,
    /// Default page size for the recent entries endpoint
    pub recent_entries_limit: usize,
    /// Token/user pair seeded into the session table at startup (development)
    pub dev_session: Option<(String, String)>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        dotenv::dotenv().ok();

        let dev_session = match (env::var("DEV_SESSION_TOKEN"), env::var("DEV_SESSION_USER")) {
            (Ok(token), Ok(user)) => Some((token, user)),
            _ => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://lumina.db?mode=rwc".to_string()),
            port: parse_or("PORT", 8080)?,
            openai_api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            request_timeout: Duration::from_secs(parse_or("OPENAI_TIMEOUT_SECS", 60)?),
            remote_moderation_enabled: parse_or("REMOTE_MODERATION_ENABLED", true)?,
            moderation_timeout: Duration::from_secs(parse_or("MODERATION_TIMEOUT_SECS", 5)?),
            recent_entries_limit: parse_or("RECENT_ENTRIES_LIMIT", 5)?,
            dev_session,
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", name, value)),
        Err(_) => Ok(default),
    }
}
