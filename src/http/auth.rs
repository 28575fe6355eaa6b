use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::app::AppState;
use super::error::ApiError;

/// Middleware to resolve the session and populate the auth user
///
/// This middleware:
/// 1. Extracts the session token from the Authorization header
/// 2. Looks it up in the session store
/// 3. Stores `AuthUser` in request extensions
///
/// It does NOT block anonymous requests; handlers decide whether a user is required.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(&request) {
        match state.sessions.find_user(&token).await {
            Ok(Some(user)) => {
                request.extensions_mut().insert(user);
            }
            Ok(None) => tracing::debug!("Unknown or expired session token"),
            Err(e) => return ApiError::internal("Failed to verify session", e).into_response(),
        }
    }

    next.run(request).await
}

fn bearer_token(request: &Request) -> Option<String> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Remove "Bearer " prefix
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
