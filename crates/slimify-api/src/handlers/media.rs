//! Serves published files back by key, for backends without their own public URLs.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use slimify_core::models::guess_content_type;
use slimify_storage::validate_key;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/media/{key}",
    tag = "proxy",
    params(("key" = String, Path, description = "Storage key, e.g. slimifypdf/users/u1/file.pdf")),
    responses(
        (status = 200, description = "File content"),
        (status = 400, description = "Invalid key", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_media(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    validate_key(&key)?;
    let data = state.storage.download(&key).await?;

    Ok((
        [
            (header::CONTENT_TYPE, guess_content_type(&key)),
            (header::CACHE_CONTROL, "private, max-age=3600"),
        ],
        data,
    ))
}
