//! Per-user compression history and counters.
//!
//! Every route is scoped to the signed-in user: the `X-User-Id` header must be
//! present and name the user in the path.

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::compress::session_from_headers;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use slimify_core::constants::MAX_HISTORY_LIMIT;
use slimify_core::models::{CompressionRecord, UserExport, UserStats};
use slimify_core::AppError;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

const DEFAULT_HISTORY_LIMIT: i64 = 10;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct HistoryQuery {
    /// Number of records to return (default 10, max 1000)
    pub limit: Option<i64>,
}

impl HistoryQuery {
    fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT)
    }
}

/// 401 without a session, 403 when the session belongs to someone else.
pub(crate) fn require_owner(headers: &HeaderMap, user_id: &str) -> Result<(), AppError> {
    let session = session_from_headers(headers)
        .ok_or_else(|| AppError::Unauthorized("Sign-in required".to_string()))?;

    if session.user_id != user_id {
        tracing::warn!(
            session_user = %session.user_id,
            path_user = %user_id,
            "History access for another user refused"
        );
        return Err(AppError::Forbidden(
            "History belongs to another user".to_string(),
        ));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/compressions",
    tag = "history",
    params(
        ("user_id" = String, Path, description = "User ID"),
        ("X-User-Id" = String, Header, description = "Signed-in user; must match user_id"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "Most recent compressions first", body = Vec<CompressionRecord>),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Session belongs to another user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers))]
pub async fn list_compressions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<CompressionRecord>>, HttpAppError> {
    require_owner(&headers, &user_id)?;
    let records = state.store.list_recent(&user_id, query.limit()).await?;
    Ok(Json(records))
}

#[utoipa::path(
    delete,
    path = "/api/users/{user_id}/compressions/{record_id}",
    tag = "history",
    params(
        ("user_id" = String, Path, description = "User ID"),
        ("record_id" = Uuid, Path, description = "Compression record ID"),
        ("X-User-Id" = String, Header, description = "Signed-in user; must match user_id")
    ),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Session belongs to another user", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers))]
pub async fn delete_compression(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((user_id, record_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, HttpAppError> {
    require_owner(&headers, &user_id)?;
    if !state.store.delete_record(&user_id, record_id).await? {
        return Err(AppError::NotFound("Compression record not found".to_string()).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/stats",
    tag = "history",
    params(
        ("user_id" = String, Path, description = "User ID"),
        ("X-User-Id" = String, Header, description = "Signed-in user; must match user_id")
    ),
    responses(
        (status = 200, description = "User counters, zeroed before the first compression", body = UserStats),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Session belongs to another user", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers))]
pub async fn get_user_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Result<Json<UserStats>, HttpAppError> {
    require_owner(&headers, &user_id)?;
    let stats = state
        .store
        .user_stats(&user_id)
        .await?
        .unwrap_or_else(|| UserStats::empty(user_id.as_str()));
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/export",
    tag = "history",
    params(
        ("user_id" = String, Path, description = "User ID"),
        ("X-User-Id" = String, Header, description = "Signed-in user; must match user_id")
    ),
    responses(
        (status = 200, description = "Stats and history of the user", body = UserExport),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Session belongs to another user", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers))]
pub async fn export_user_data(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Result<Json<UserExport>, HttpAppError> {
    require_owner(&headers, &user_id)?;
    let user = state
        .store
        .user_stats(&user_id)
        .await?
        .unwrap_or_else(|| UserStats::empty(user_id.as_str()));
    let compressions = state.store.list_recent(&user_id, MAX_HISTORY_LIMIT).await?;

    tracing::info!(records = compressions.len(), "User data exported");

    Ok(Json(UserExport {
        user,
        compressions,
        export_date: Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use slimify_core::ErrorMetadata;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(HistoryQuery { limit: None }.limit(), 10);
        assert_eq!(HistoryQuery { limit: Some(0) }.limit(), 1);
        assert_eq!(HistoryQuery { limit: Some(5000) }.limit(), 1000);
        assert_eq!(HistoryQuery { limit: Some(25) }.limit(), 25);
    }

    #[test]
    fn owner_check() {
        let mut headers = HeaderMap::new();
        assert_eq!(
            require_owner(&headers, "u1").unwrap_err().http_status_code(),
            401
        );

        headers.insert("x-user-id", HeaderValue::from_static("u2"));
        assert_eq!(
            require_owner(&headers, "u1").unwrap_err().http_status_code(),
            403
        );
        assert!(require_owner(&headers, "u2").is_ok());
    }
}
