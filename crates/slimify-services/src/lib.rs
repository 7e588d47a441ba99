//! Slimify Services Layer
//!
//! Business services that sit between the HTTP layer and the lower crates: the media
//! host used by the upload/delete proxy and the remote sync gateway that persists
//! compression results for signed-in users. Processing, storage and db types are
//! re-exported so the API crate can depend on this facade.

pub mod services;

pub use services::media_host::{MediaHost, StorageMediaHost, UploadedMedia};
pub use services::sync_gateway::{RemoteSyncGateway, SyncError};
pub use slimify_db::{CompressionStore, InMemoryCompressionStore, PgCompressionStore};
pub use slimify_processing::{
    BatchReport, BatchSummary, CompressionPipeline, DocumentCompressor, FileOutcome,
    FileValidator, NoopReporter, PipelineError, ProgressReporter, Rejection, ResultPersister,
    TracingReporter,
};
pub use slimify_storage::{create_storage, Storage, StorageError, StorageResult};
#[cfg(feature = "storage-local")]
pub use slimify_storage::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use slimify_storage::S3Storage;
