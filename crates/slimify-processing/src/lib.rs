//! Slimify Processing Library
//!
//! The compression pipeline: file validation, the per-file compression worker and the
//! orchestrator that runs a batch one file at a time.

pub mod compression;
pub mod pipeline;
pub mod progress;
pub mod validator;

pub use compression::{CompressionError, DocumentCompressor, FileCompressor};
pub use pipeline::{
    BatchReport, BatchSummary, CompressionPipeline, FileOutcome, PipelineError, ResultPersister,
};
pub use progress::{NoopReporter, ProgressReporter, TracingReporter};
pub use validator::{FileValidator, Rejection, ValidationError, ValidationOutcome};
