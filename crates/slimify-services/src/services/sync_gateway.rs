//! Remote sync gateway
//!
//! Persists a finished compression for a signed-in user: the file goes to the media
//! host, then a history record is written, then the user's counters are bumped.
//! Each step is independent. A failed step is logged and the next one still runs;
//! nothing is retried or rolled back.

use async_trait::async_trait;
use slimify_core::models::{CompressionResult, NewCompressionRecord, SessionContext, SyncState};
use slimify_core::constants::DEFAULT_UPLOAD_TIMEOUT_SECS;
use slimify_core::AppError;
use slimify_db::CompressionStore;
use slimify_processing::ResultPersister;
use slimify_storage::StorageError;
use std::sync::Arc;
use std::time::Duration;

use super::media_host::{MediaHost, UploadedMedia};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Invalid media key: {0}")]
    InvalidKey(String),

    #[error("Media host error: {0}")]
    Storage(StorageError),

    #[error("Upload timed out after {0} seconds")]
    Timeout(u64),
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::InvalidKey(msg) => AppError::BadRequest(msg),
            SyncError::Storage(StorageError::NotFound(key)) => AppError::NotFound(key),
            SyncError::Storage(e) => AppError::Storage(e.to_string()),
            SyncError::Timeout(secs) => AppError::UploadTimeout(secs),
        }
    }
}

pub struct RemoteSyncGateway {
    media_host: Arc<dyn MediaHost>,
    store: Arc<dyn CompressionStore>,
    upload_timeout: Duration,
}

impl RemoteSyncGateway {
    pub fn new(media_host: Arc<dyn MediaHost>, store: Arc<dyn CompressionStore>) -> Self {
        Self {
            media_host,
            store,
            upload_timeout: Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS),
        }
    }

    pub fn with_upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = timeout;
        self
    }

    async fn upload(
        &self,
        session: &SessionContext,
        result: &CompressionResult,
    ) -> Result<UploadedMedia, SyncError> {
        let upload = self.media_host.upload(
            &session.user_id,
            &result.output_name,
            &result.file_type,
            result.blob.clone(),
        );

        match tokio::time::timeout(self.upload_timeout, upload).await {
            Ok(uploaded) => uploaded,
            Err(_) => Err(SyncError::Timeout(self.upload_timeout.as_secs())),
        }
    }

    async fn bump_stats(&self, session: &SessionContext, bytes_saved: i64) -> Result<(), AppError> {
        self.store
            .ensure_user(&session.user_id, session.email.as_deref())
            .await?;
        self.store
            .increment_user_stats(&session.user_id, bytes_saved)
            .await
    }
}

#[async_trait]
impl ResultPersister for RemoteSyncGateway {
    #[tracing::instrument(skip_all, fields(file_name = %result.original_name, user_id))]
    async fn persist(
        &self,
        mut result: CompressionResult,
        session: Option<&SessionContext>,
    ) -> CompressionResult {
        let Some(session) = session else {
            return result;
        };
        tracing::Span::current().record("user_id", session.user_id.as_str());

        let start = std::time::Instant::now();
        result.sync_state = SyncState::Uploading;

        match self.upload(session, &result).await {
            Ok(media) => {
                tracing::info!(
                    public_id = %media.public_id,
                    size_bytes = media.size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Compressed file uploaded"
                );
                result.remote_url = Some(media.url);
                result.remote_id = Some(media.public_id);
                result.sync_state = SyncState::Synced;
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Upload failed, continuing without a remote copy"
                );
                result.sync_state = SyncState::UploadFailed;
            }
        }

        // Counters only move for a compression that has a record.
        let record = NewCompressionRecord::from_result(&session.user_id, &result);
        match self.store.insert_record(record).await {
            Ok(stored) => {
                tracing::debug!(record_id = %stored.id, "Compression record written");
                result.sync_state = SyncState::MetadataWritten;

                if let Err(e) = self.bump_stats(session, result.bytes_saved()).await {
                    tracing::error!(
                        error = %e,
                        record_id = %stored.id,
                        "Failed to update user stats, record kept"
                    );
                }
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    error_type = "PersistenceFailed",
                    "Failed to write compression record, user stats left unchanged"
                );
            }
        }

        result
    }
}
