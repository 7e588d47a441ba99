//! Batch orchestration: validation, per-file compression, optional remote
//! persistence and aggregation.
//!
//! Files run strictly one at a time in input order. A failure in one file is recorded
//! and the batch moves on; only an empty selection stops a batch before it starts.

use async_trait::async_trait;
use slimify_core::constants::DEFAULT_OUTPUT_NAME;
use slimify_core::models::{
    compression_ratio, output_file_name, CandidateFile, CompressionResult, QualityTier,
    SessionContext,
};
use slimify_core::AppError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::compression::{DocumentCompressor, FileCompressor};
use crate::progress::{NoopReporter, ProgressReporter};
use crate::validator::{FileValidator, Rejection};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Nothing survived validation. Carries the reasons for each rejected file.
    #[error("Please select files to compress")]
    NoFilesSelected { rejected: Vec<Rejection> },
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Persists a finished result somewhere outside the process.
///
/// Called once per successful file, before the next file starts. Implementations
/// report failures through the returned result's `sync_state` and never fail the batch.
#[async_trait]
pub trait ResultPersister: Send + Sync {
    async fn persist(
        &self,
        result: CompressionResult,
        session: Option<&SessionContext>,
    ) -> CompressionResult;
}

/// What happened to one input file.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    Compressed(CompressionResult),
    Failed { file_name: String, error: String },
    /// Not started because the batch was cancelled.
    Cancelled { file_name: String },
}

impl FileOutcome {
    pub fn file_name(&self) -> &str {
        match self {
            FileOutcome::Compressed(result) => &result.original_name,
            FileOutcome::Failed { file_name, .. } => file_name,
            FileOutcome::Cancelled { file_name } => file_name,
        }
    }

    pub fn result(&self) -> Option<&CompressionResult> {
        match self {
            FileOutcome::Compressed(result) => Some(result),
            _ => None,
        }
    }
}

/// Totals over the successfully compressed files of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub compressed_count: usize,
    pub failed_count: usize,
    pub cancelled_count: usize,
    pub total_original: u64,
    pub total_compressed: u64,
    /// `total_original - total_compressed`; negative when the batch grew.
    pub bytes_saved: i64,
    /// Overall percent saved, rounded half-up. 0 for an empty total.
    pub percent_saved: i64,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        let mut summary = BatchSummary::default();

        for outcome in outcomes {
            match outcome {
                FileOutcome::Compressed(result) => {
                    summary.compressed_count += 1;
                    summary.total_original += result.original_size;
                    summary.total_compressed += result.compressed_size;
                }
                FileOutcome::Failed { .. } => summary.failed_count += 1,
                FileOutcome::Cancelled { .. } => summary.cancelled_count += 1,
            }
        }

        summary.bytes_saved = summary.total_original as i64 - summary.total_compressed as i64;
        summary.percent_saved = compression_ratio(summary.total_original, summary.total_compressed);
        summary
    }
}

/// Output of a batch. `outcomes` has one entry per accepted input file, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    pub rejected: Vec<Rejection>,
    pub summary: BatchSummary,
}

impl BatchReport {
    pub fn results(&self) -> impl Iterator<Item = &CompressionResult> {
        self.outcomes.iter().filter_map(FileOutcome::result)
    }
}

/// Runs batches of files through a [`FileCompressor`].
///
/// The pipeline owns the results of its latest batch; nothing is shared globally.
pub struct CompressionPipeline {
    compressor: Arc<dyn FileCompressor>,
    persister: Option<Arc<dyn ResultPersister>>,
    reporter: Arc<dyn ProgressReporter>,
    cancel: CancellationToken,
    results: Vec<CompressionResult>,
}

impl CompressionPipeline {
    pub fn new(compressor: Arc<dyn FileCompressor>) -> Self {
        Self {
            compressor,
            persister: None,
            reporter: Arc::new(NoopReporter),
            cancel: CancellationToken::new(),
            results: Vec::new(),
        }
    }

    pub fn with_persister(mut self, persister: Arc<dyn ResultPersister>) -> Self {
        self.persister = Some(persister);
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Cancellation is checked between files, never in the middle of one.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Successful results of the most recent batch, in input order.
    pub fn results(&self) -> &[CompressionResult] {
        &self.results
    }

    /// Validate `files` and run the accepted ones.
    pub async fn select_and_run(
        &mut self,
        validator: &FileValidator,
        files: Vec<CandidateFile>,
        tier: QualityTier,
        output_base: &str,
        session: Option<&SessionContext>,
    ) -> Result<BatchReport, PipelineError> {
        let validation = validator.validate(files);

        if validation.accepted.is_empty() {
            tracing::info!(
                rejected = validation.rejected.len(),
                "No files accepted for compression"
            );
            return Err(PipelineError::NoFilesSelected {
                rejected: validation.rejected,
            });
        }

        let mut report = self
            .run(validation.accepted, tier, output_base, session)
            .await;
        report.rejected = validation.rejected;
        Ok(report)
    }

    /// Compress `files` in order. Replaces the results of any previous batch.
    #[tracing::instrument(skip(self, files, session), fields(file_count = files.len(), tier = %tier))]
    pub async fn run(
        &mut self,
        files: Vec<CandidateFile>,
        tier: QualityTier,
        output_base: &str,
        session: Option<&SessionContext>,
    ) -> BatchReport {
        self.results.clear();

        let base = normalize_output_base(output_base);
        let total = files.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, file) in files.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                let outcome = FileOutcome::Cancelled {
                    file_name: file.name,
                };
                self.reporter.on_file_finished(index, total, &outcome);
                outcomes.push(outcome);
                continue;
            }

            self.reporter.on_file_started(index, total, &file.name);

            let extension = file.extension().unwrap_or_else(|| "bin".to_string());
            let output_name = output_file_name(&base, index, &extension);
            let file_name = file.name.clone();

            let outcome = match self.compress_one(file, tier, output_name).await {
                Ok(result) => {
                    let result = match &self.persister {
                        Some(persister) => persister.persist(result, session).await,
                        None => result,
                    };
                    self.results.push(result.clone());
                    FileOutcome::Compressed(result)
                }
                Err(error) => {
                    tracing::error!(file_name = %file_name, error = %error, "Compression failed");
                    FileOutcome::Failed { file_name, error }
                }
            };

            self.reporter.on_file_finished(index, total, &outcome);
            outcomes.push(outcome);
        }

        let summary = BatchSummary::from_outcomes(&outcomes);
        self.reporter.on_batch_finished(&summary);

        BatchReport {
            outcomes,
            rejected: Vec::new(),
            summary,
        }
    }

    async fn compress_one(
        &self,
        file: CandidateFile,
        tier: QualityTier,
        output_name: String,
    ) -> Result<CompressionResult, String> {
        let compressor = Arc::clone(&self.compressor);

        tokio::task::spawn_blocking(move || compressor.compress(&file, tier, &output_name))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    "Compression worker panicked".to_string()
                } else {
                    format!("Compression worker failed: {}", e)
                }
            })?
            .map_err(|e| e.to_string())
    }
}

impl Default for CompressionPipeline {
    fn default() -> Self {
        Self::new(Arc::new(DocumentCompressor))
    }
}

/// Output names become single path segments; an empty base falls back to the default.
fn normalize_output_base(base: &str) -> String {
    let cleaned: String = base
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();

    if cleaned.is_empty() {
        DEFAULT_OUTPUT_NAME.to_string()
    } else {
        cleaned
    }
}
