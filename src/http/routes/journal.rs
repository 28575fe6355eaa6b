use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::core::ai::EntryAnalysis;
use crate::core::auth::AuthUser;
use crate::core::journal::{Insights, JournalEntry, RecentEntry, SubmissionOutcome};
use crate::http::app::AppState;
use crate::http::error::ApiError;

/// Upper bound for `?limit=` on the entries endpoint.
const MAX_ENTRIES_PAGE: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub content: String,
    #[serde(default)]
    pub recent_entries: Option<Vec<RecentEntry>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub analysis: EntryAnalysis,
    pub follow_up_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EntriesQuery {
    pub limit: Option<usize>,
}

/// Submit a journal entry.
///
/// 401 without a session, 400 when moderation rejects the entry, 500 when
/// the body is unreadable or analysis or storage fails. The entry is stored
/// only on 200.
pub async fn analyze_handler(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Extension(user) = user.ok_or(ApiError::Unauthorized)?;
    let Json(request) = body.map_err(|e| ApiError::internal("Failed to analyze entry", e))?;
    let recent = request.recent_entries.unwrap_or_default();

    let outcome = state
        .journal
        .submit(&user.user_id, &request.content, &recent)
        .await
        .map_err(|e| ApiError::internal("Failed to analyze entry", e))?;

    match outcome {
        SubmissionOutcome::Rejected(verdict) => Err(ApiError::Rejected(verdict)),
        SubmissionOutcome::Accepted(entry) => Ok(Json(AnalyzeResponse {
            analysis: entry.analysis,
            follow_up_prompt: entry.follow_up_prompt,
        })),
    }
}

/// Most recent entries for the signed-in user, newest first.
pub async fn entries_handler(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Query(query): Query<EntriesQuery>,
) -> Result<Json<Vec<JournalEntry>>, ApiError> {
    let Extension(user) = user.ok_or(ApiError::Unauthorized)?;
    let limit = query
        .limit
        .unwrap_or(state.recent_entries_limit)
        .clamp(1, MAX_ENTRIES_PAGE);

    let entries = state
        .journal
        .recent_entries(&user.user_id, limit)
        .await
        .map_err(|e| ApiError::internal("Failed to load entries", e))?;

    Ok(Json(entries))
}

/// Mood chart and top themes for the signed-in user.
pub async fn insights_handler(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
) -> Result<Json<Insights>, ApiError> {
    let Extension(user) = user.ok_or(ApiError::Unauthorized)?;

    let insights = state
        .journal
        .insights(&user.user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to load insights", e))?;

    Ok(Json(insights))
}
