//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use slimify_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Slimify API",
        version = "0.1.0",
        description = "PDF and image compression with optional publishing to a media host. The /api/upload and /api/delete proxy endpoints answer errors as {success:false, error}; all other endpoints use ErrorResponse."
    ),
    paths(
        // Media proxy
        handlers::proxy::upload_file,
        handlers::proxy::delete_file,
        handlers::media::get_media,
        // Compression
        handlers::compress::compress_files,
        // History
        handlers::history::list_compressions,
        handlers::history::delete_compression,
        handlers::history::get_user_stats,
        handlers::history::export_user_data,
        // Health
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::CompressionRecord,
            models::UserStats,
            models::UserExport,
            models::CompressionMethod,
            models::SyncState,
            models::QualityTier,
            handlers::proxy::UploadRequest,
            handlers::proxy::UploadResponse,
            handlers::proxy::DeleteRequest,
            handlers::proxy::DeleteResponse,
            handlers::proxy::MethodNotAllowed,
            handlers::compress::CompressResponse,
            handlers::compress::FileResultResponse,
            handlers::compress::FileStatus,
            handlers::compress::RejectedFile,
            handlers::compress::SummaryResponse,
            handlers::history::HistoryQuery,
            handlers::health::HealthCheckResponse,
            error::ErrorResponse,
            error::ProxyErrorBody,
        )
    ),
    tags(
        (name = "proxy", description = "Upload to and delete from the media host"),
        (name = "compression", description = "Validate and compress a batch of files"),
        (name = "history", description = "Compression history and user counters"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_proxy_paths() {
        let spec = openapi_spec();
        assert!(spec.paths.paths.contains_key("/api/upload"));
        assert!(spec.paths.paths.contains_key("/api/delete"));
        assert!(spec.paths.paths.contains_key("/api/users/{user_id}/stats"));
    }
}
