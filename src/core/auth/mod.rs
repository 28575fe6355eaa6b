// Core auth module - who is making the request.
//
// Sessions are issued by an external authentication provider; this crate
// only resolves a bearer token to a user.

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Session lookup failed: {0}")]
    Lookup(String),
}

/// An authenticated user, resolved from a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

/// Resolves session tokens to users.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns `None` for unknown or expired tokens.
    async fn find_user(&self, token: &str) -> Result<Option<AuthUser>, AuthError>;
}

#[async_trait]
impl SessionStore for Box<dyn SessionStore> {
    async fn find_user(&self, token: &str) -> Result<Option<AuthUser>, AuthError> {
        (**self).find_user(token).await
    }
}
