use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use slimify_core::constants::DEFAULT_OUTPUT_NAME;
use slimify_core::models::{
    guess_content_type, CandidateFile, CompressionMethod, QualityTier, SessionContext, SyncState,
};
use slimify_core::{format_file_size, format_signed_file_size, AppError};
use slimify_processing::{BatchReport, BatchSummary, FileOutcome};
use std::sync::Arc;
use utoipa::ToSchema;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

#[derive(Debug, Serialize, ToSchema)]
pub struct RejectedFile {
    pub file_name: String,
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Compressed,
    Failed,
    Cancelled,
}

/// One processed file. Size fields are absent when compression failed.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileResultResponse {
    pub file_name: String,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_size_formatted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed_size_formatted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<CompressionMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_state: Option<SyncState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub compressed_count: usize,
    pub failed_count: usize,
    pub cancelled_count: usize,
    pub total_original: u64,
    pub total_compressed: u64,
    pub bytes_saved: i64,
    pub percent_saved: i64,
    pub total_original_formatted: String,
    pub total_compressed_formatted: String,
    pub bytes_saved_formatted: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompressResponse {
    pub accepted: usize,
    pub rejected: Vec<RejectedFile>,
    pub results: Vec<FileResultResponse>,
    pub summary: SummaryResponse,
}

impl From<&FileOutcome> for FileResultResponse {
    fn from(outcome: &FileOutcome) -> Self {
        let mut response = FileResultResponse {
            file_name: outcome.file_name().to_string(),
            status: FileStatus::Cancelled,
            output_name: None,
            original_size: None,
            compressed_size: None,
            original_size_formatted: None,
            compressed_size_formatted: None,
            compression_ratio: None,
            method: None,
            sync_state: None,
            remote_url: None,
            remote_id: None,
            error: None,
        };

        match outcome {
            FileOutcome::Compressed(result) => {
                response.status = FileStatus::Compressed;
                response.output_name = Some(result.output_name.clone());
                response.original_size = Some(result.original_size);
                response.compressed_size = Some(result.compressed_size);
                response.original_size_formatted = Some(format_file_size(result.original_size));
                response.compressed_size_formatted =
                    Some(format_file_size(result.compressed_size));
                response.compression_ratio = Some(result.compression_ratio);
                response.method = Some(result.method);
                response.sync_state = Some(result.sync_state);
                response.remote_url = result.remote_url.clone();
                response.remote_id = result.remote_id.clone();
            }
            FileOutcome::Failed { error, .. } => {
                response.status = FileStatus::Failed;
                response.error = Some(error.clone());
            }
            FileOutcome::Cancelled { .. } => {}
        }

        response
    }
}

impl From<&BatchSummary> for SummaryResponse {
    fn from(summary: &BatchSummary) -> Self {
        SummaryResponse {
            compressed_count: summary.compressed_count,
            failed_count: summary.failed_count,
            cancelled_count: summary.cancelled_count,
            total_original: summary.total_original,
            total_compressed: summary.total_compressed,
            bytes_saved: summary.bytes_saved,
            percent_saved: summary.percent_saved,
            total_original_formatted: format_file_size(summary.total_original),
            total_compressed_formatted: format_file_size(summary.total_compressed),
            bytes_saved_formatted: format_signed_file_size(summary.bytes_saved),
        }
    }
}

impl From<BatchReport> for CompressResponse {
    fn from(report: BatchReport) -> Self {
        CompressResponse {
            accepted: report.outcomes.len(),
            rejected: report
                .rejected
                .iter()
                .map(|r| RejectedFile {
                    file_name: r.file_name.clone(),
                    reason: r.to_string(),
                })
                .collect(),
            results: report.outcomes.iter().map(FileResultResponse::from).collect(),
            summary: SummaryResponse::from(&report.summary),
        }
    }
}

/// Session taken from the `X-User-Id` / `X-User-Email` headers set by the auth proxy.
pub(crate) fn session_from_headers(headers: &HeaderMap) -> Option<SessionContext> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())?;

    let session = SessionContext::new(user_id);
    match headers
        .get(USER_EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        Some(email) => Some(session.with_email(email)),
        None => Some(session),
    }
}

struct CompressForm {
    files: Vec<CandidateFile>,
    quality: Option<String>,
    output_name: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<CompressForm, AppError> {
    let mut form = CompressForm {
        files: Vec::new(),
        quality: None,
        output_name: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "files" | "files[]" | "file" => {
                let name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                let declared = field
                    .content_type()
                    .map(|s| s.to_string())
                    .filter(|ct| ct != "application/octet-stream");
                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;

                let content_type =
                    declared.unwrap_or_else(|| guess_content_type(&name).to_string());
                form.files.push(CandidateFile::new(name, content_type, data));
            }
            "quality" | "output_name" => {
                let value = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read field {}: {}", field_name, e))
                })?;
                let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
                if field_name == "quality" {
                    form.quality = value;
                } else {
                    form.output_name = value;
                }
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(form)
}

#[utoipa::path(
    post,
    path = "/api/compress",
    tag = "compression",
    params(
        ("X-User-Id" = Option<String>, Header, description = "Signed-in user; enables upload and history"),
        ("X-User-Email" = Option<String>, Header, description = "Email of the signed-in user")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Batch processed", body = CompressResponse),
        (status = 400, description = "No acceptable files or invalid form", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, multipart), fields(operation = "compress"))]
pub async fn compress_files(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<CompressResponse>, HttpAppError> {
    let form = read_form(multipart).await?;

    let tier = match form.quality.as_deref() {
        Some(raw) => raw
            .parse::<QualityTier>()
            .map_err(|e| AppError::InvalidInput(e.to_string()))?,
        None => state.config.default_quality(),
    };
    let output_base = form
        .output_name
        .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string());
    let session = session_from_headers(&headers);

    tracing::info!(
        file_count = form.files.len(),
        tier = %tier,
        signed_in = session.is_some(),
        "Compression batch received"
    );

    let mut pipeline = state.pipeline();
    let report = pipeline
        .select_and_run(
            &state.validator,
            form.files,
            tier,
            &output_base,
            session.as_ref(),
        )
        .await?;

    Ok(Json(CompressResponse::from(report)))
}
