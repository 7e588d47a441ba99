//! Per-file compression worker.
//!
//! PDFs are re-serialized with unreferenced objects pruned and streams deflated.
//! Every other type, and any PDF that fails to parse or save, takes the simulated
//! path: the size is estimated from the quality multiplier and the bytes are kept.

use bytes::Bytes;
use slimify_core::models::{
    compression_ratio, round_half_up, CandidateFile, CompressionMethod, CompressionResult,
    QualityTier, SyncState,
};
use slimify_core::AppError;

#[derive(Debug, thiserror::Error)]
pub enum CompressionError {
    #[error("PDF rewrite failed: {0}")]
    Pdf(String),

    #[error("Compression worker failed: {0}")]
    Worker(String),
}

impl From<CompressionError> for AppError {
    fn from(err: CompressionError) -> Self {
        AppError::Compression(err.to_string())
    }
}

/// Turns one candidate file into a compression result.
///
/// Implementations are synchronous and CPU-bound; the pipeline runs them on the
/// blocking thread pool.
pub trait FileCompressor: Send + Sync {
    fn compress(
        &self,
        file: &CandidateFile,
        tier: QualityTier,
        output_name: &str,
    ) -> Result<CompressionResult, CompressionError>;
}

/// Default compressor: lopdf rewrite for PDFs, multiplier simulation for the rest.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCompressor;

impl DocumentCompressor {
    pub fn new() -> Self {
        Self
    }
}

impl FileCompressor for DocumentCompressor {
    fn compress(
        &self,
        file: &CandidateFile,
        tier: QualityTier,
        output_name: &str,
    ) -> Result<CompressionResult, CompressionError> {
        let start = std::time::Instant::now();

        if file.is_pdf() {
            match rewrite_pdf(&file.bytes) {
                Ok(output) => {
                    let result = build_result(
                        file,
                        output_name,
                        Bytes::from(output),
                        None,
                        CompressionMethod::PdfRewrite,
                    );
                    tracing::info!(
                        file_name = %file.name,
                        original_size = result.original_size,
                        compressed_size = result.compressed_size,
                        ratio = result.compression_ratio,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "PDF rewritten"
                    );
                    return Ok(result);
                }
                Err(e) => {
                    tracing::warn!(
                        file_name = %file.name,
                        error = %e,
                        "PDF rewrite failed, falling back to size estimate"
                    );
                }
            }
        }

        let estimated = simulated_size(file.size, tier);
        let result = build_result(
            file,
            output_name,
            file.bytes.clone(),
            Some(estimated),
            CompressionMethod::Simulated,
        );

        tracing::debug!(
            file_name = %file.name,
            tier = %tier,
            original_size = result.original_size,
            compressed_size = result.compressed_size,
            "Size estimated from quality multiplier"
        );

        Ok(result)
    }
}

/// `round(original_size * multiplier)`
pub fn simulated_size(original_size: u64, tier: QualityTier) -> u64 {
    round_half_up(original_size as f64 * tier.multiplier()) as u64
}

fn build_result(
    file: &CandidateFile,
    output_name: &str,
    blob: Bytes,
    size_override: Option<u64>,
    method: CompressionMethod,
) -> CompressionResult {
    let compressed_size = size_override.unwrap_or(blob.len() as u64);
    CompressionResult {
        original_name: file.name.clone(),
        output_name: output_name.to_string(),
        original_size: file.size,
        compressed_size,
        compression_ratio: compression_ratio(file.size, compressed_size),
        file_type: file.content_type.clone(),
        blob,
        remote_url: None,
        remote_id: None,
        method,
        sync_state: SyncState::Local,
    }
}

#[cfg(feature = "pdf")]
fn rewrite_pdf(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    use std::io::Cursor;

    let mut doc =
        lopdf::Document::load_mem(data).map_err(|e| CompressionError::Pdf(e.to_string()))?;

    doc.prune_objects();
    doc.delete_zero_length_streams();
    doc.compress();
    doc.renumber_objects();

    let mut output = Cursor::new(Vec::new());
    doc.save_to(&mut output)
        .map_err(|e| CompressionError::Pdf(e.to_string()))?;

    Ok(output.into_inner())
}

#[cfg(not(feature = "pdf"))]
fn rewrite_pdf(_data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    Err(CompressionError::Pdf(
        "PDF support not available (pdf feature not enabled)".to_string(),
    ))
}
