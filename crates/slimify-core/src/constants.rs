//! Shared constants.

/// Extensions accepted by default when `ALLOWED_EXTENSIONS` is not set.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "png", "jpg", "jpeg"];

/// Default per-file size limit in megabytes.
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 50;

/// Top-level folder under which user uploads are stored on the media host.
pub const DEFAULT_STORAGE_FOLDER: &str = "slimifypdf";

/// Default bound on a single media-host upload.
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;

/// Output base name used when the caller does not supply one.
pub const DEFAULT_OUTPUT_NAME: &str = "compressed-file";

/// Upper bound for history listing and export.
pub const MAX_HISTORY_LIMIT: i64 = 1000;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
