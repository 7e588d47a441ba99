use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// How the compressed size was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CompressionMethod {
    /// PDF re-serialized with object and stream compaction.
    PdfRewrite,
    /// Size estimated from the quality multiplier; bytes are unchanged.
    Simulated,
}

impl Display for CompressionMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CompressionMethod::PdfRewrite => write!(f, "pdf_rewrite"),
            CompressionMethod::Simulated => write!(f, "simulated"),
        }
    }
}

/// Remote lifecycle of a result.
///
/// `Local -> Uploading -> {Synced | UploadFailed} -> MetadataWritten`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    #[default]
    Local,
    Uploading,
    Synced,
    UploadFailed,
    MetadataWritten,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompressionResult {
    pub original_name: String,
    /// Name used for download and remote storage: `{base}-{index+1}.{ext}`.
    pub output_name: String,
    pub original_size: u64,
    pub compressed_size: u64,
    /// Integer percent saved, rounded half-up. Negative when the output grew.
    pub compression_ratio: i64,
    pub file_type: String,
    #[serde(skip)]
    pub blob: Bytes,
    pub remote_url: Option<String>,
    pub remote_id: Option<String>,
    pub method: CompressionMethod,
    pub sync_state: SyncState,
}

impl CompressionResult {
    /// Bytes saved by this file. May be negative.
    pub fn bytes_saved(&self) -> i64 {
        self.original_size as i64 - self.compressed_size as i64
    }
}

/// Round half toward positive infinity (2.5 -> 3, -2.5 -> -2), matching the usual `Math.round` behaviour.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// `round((original - compressed) / original * 100)`, or 0 for an empty original.
pub fn compression_ratio(original: u64, compressed: u64) -> i64 {
    if original == 0 {
        return 0;
    }
    let saved = original as f64 - compressed as f64;
    round_half_up(saved * 100.0 / original as f64) as i64
}

/// Output file name for the file at `index` (zero-based) of a batch.
pub fn output_file_name(base: &str, index: usize, extension: &str) -> String {
    format!("{}-{}.{}", base, index + 1, extension)
}
