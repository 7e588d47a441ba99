//! Progress callbacks for a running batch.

use crate::pipeline::{BatchSummary, FileOutcome};

/// Receives plain progress data from the pipeline. All methods default to no-ops.
///
/// `index` is zero-based; `total` is the number of files in the batch.
pub trait ProgressReporter: Send + Sync {
    fn on_file_started(&self, _index: usize, _total: usize, _file_name: &str) {}

    fn on_file_finished(&self, _index: usize, _total: usize, _outcome: &FileOutcome) {}

    fn on_batch_finished(&self, _summary: &BatchSummary) {}
}

/// Ignores all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {}

/// Emits progress as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn on_file_started(&self, index: usize, total: usize, file_name: &str) {
        tracing::info!(
            file = index + 1,
            total,
            file_name = %file_name,
            "Compressing file"
        );
    }

    fn on_file_finished(&self, index: usize, total: usize, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Compressed(result) => tracing::info!(
                file = index + 1,
                total,
                file_name = %result.original_name,
                compressed_size = result.compressed_size,
                ratio = result.compression_ratio,
                method = %result.method,
                "File compressed"
            ),
            FileOutcome::Failed { file_name, error } => tracing::warn!(
                file = index + 1,
                total,
                file_name = %file_name,
                error = %error,
                "File failed"
            ),
            FileOutcome::Cancelled { file_name } => tracing::info!(
                file = index + 1,
                total,
                file_name = %file_name,
                "File skipped after cancellation"
            ),
        }
    }

    fn on_batch_finished(&self, summary: &BatchSummary) {
        tracing::info!(
            compressed = summary.compressed_count,
            failed = summary.failed_count,
            cancelled = summary.cancelled_count,
            total_original = summary.total_original,
            total_compressed = summary.total_compressed,
            percent_saved = summary.percent_saved,
            "Batch finished"
        );
    }
}
