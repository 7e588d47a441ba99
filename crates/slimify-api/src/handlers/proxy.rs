//! Media proxy endpoints: `POST /api/upload` and `DELETE /api/delete`.
//!
//! Both answer errors with `{success:false, error}` instead of the usual
//! [`crate::error::ErrorResponse`], and any other method with `405`.

use crate::error::{ProxyError, ProxyErrorBody, ProxyJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use slimify_core::models::guess_content_type;
use slimify_services::SyncError;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadRequest {
    /// Base64 file content. A `data:<type>;base64,` prefix is accepted.
    pub file: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub public_id: String,
    pub size: u64,
    pub format: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteRequest {
    pub public_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MethodNotAllowed {
    pub message: String,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Split an optional data URI header from the payload and decode it.
/// Returns the bytes and the content type named in the header, if any.
pub(crate) fn decode_file(raw: &str) -> Result<(Bytes, Option<String>), ProxyError> {
    let raw = raw.trim();
    let (content_type, payload) = match raw.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| ProxyError::bad_request("Malformed data URI"))?;
            if !header.ends_with(";base64") {
                return Err(ProxyError::bad_request("Data URI must be base64 encoded"));
            }
            let content_type = header
                .split(';')
                .next()
                .filter(|ct| !ct.is_empty())
                .map(String::from);
            (content_type, payload)
        }
        None => (None, raw),
    };

    let data = STANDARD
        .decode(payload)
        .map_err(|e| ProxyError::bad_request(format!("Invalid base64 file content: {}", e)))?;

    if data.is_empty() {
        return Err(ProxyError::bad_request("File is empty"));
    }

    Ok((Bytes::from(data), content_type))
}

#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "proxy",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "File published to the media host", body = UploadResponse),
        (status = 400, description = "Missing field or invalid base64", body = ProxyErrorBody),
        (status = 405, description = "Method not allowed", body = MethodNotAllowed),
        (status = 500, description = "Media host failure", body = ProxyErrorBody)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "proxy_upload"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    ProxyJson(request): ProxyJson<UploadRequest>,
) -> Result<Json<UploadResponse>, ProxyError> {
    let (Some(file), Some(user_id), Some(file_name)) = (
        required(request.file),
        required(request.user_id),
        required(request.file_name),
    ) else {
        return Err(ProxyError::bad_request(
            "file, userId and fileName are required",
        ));
    };

    let (data, declared_type) = decode_file(&file)?;
    let content_type =
        declared_type.unwrap_or_else(|| guess_content_type(&file_name).to_string());

    let upload = state
        .media_host
        .upload(&user_id, &file_name, &content_type, data);
    let media = match tokio::time::timeout(state.upload_timeout, upload).await {
        Ok(result) => result?,
        Err(_) => return Err(SyncError::Timeout(state.upload_timeout.as_secs()).into()),
    };

    tracing::info!(
        user_id = %user_id,
        public_id = %media.public_id,
        size_bytes = media.size,
        "File uploaded through proxy"
    );

    Ok(Json(UploadResponse {
        success: true,
        url: media.url,
        public_id: media.public_id,
        size: media.size,
        format: media.format,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/delete",
    tag = "proxy",
    request_body = DeleteRequest,
    responses(
        (status = 200, description = "File deleted", body = DeleteResponse),
        (status = 400, description = "Missing public_id or nothing to delete", body = ProxyErrorBody),
        (status = 405, description = "Method not allowed", body = MethodNotAllowed),
        (status = 500, description = "Media host failure", body = ProxyErrorBody)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "proxy_delete"))]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    ProxyJson(request): ProxyJson<DeleteRequest>,
) -> Result<Json<DeleteResponse>, ProxyError> {
    let public_id = required(request.public_id)
        .ok_or_else(|| ProxyError::bad_request("Public ID is required"))?;

    if !state.media_host.delete(&public_id).await? {
        return Err(ProxyError::bad_request("Failed to delete file"));
    }

    tracing::info!(public_id = %public_id, "File deleted through proxy");

    Ok(Json(DeleteResponse {
        success: true,
        message: "File deleted successfully".to_string(),
    }))
}

/// Fallback for the proxy paths.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(MethodNotAllowed {
            message: "Method not allowed".to_string(),
        }),
    )
}
