//! Media host: where compressed files are published for download.

use async_trait::async_trait;
use bytes::Bytes;
use slimify_core::models::file_extension;
use slimify_storage::{user_storage_key, validate_key, Storage, StorageError};
use std::sync::Arc;

use super::sync_gateway::SyncError;

/// A file published on the media host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub url: String,
    /// Identifier used to delete the file later: `{folder}/users/{user_id}/{file_name}`.
    pub public_id: String,
    pub size: u64,
    /// Lowercase extension of the file name, or `bin`.
    pub format: String,
}

#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Publish `data` as `file_name` in the user's folder, replacing any file with
    /// the same name.
    async fn upload(
        &self,
        user_id: &str,
        file_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<UploadedMedia, SyncError>;

    /// Remove a published file. Returns false when there was nothing to delete.
    async fn delete(&self, public_id: &str) -> Result<bool, SyncError>;
}

/// [`MediaHost`] on top of any [`Storage`] backend.
#[derive(Clone)]
pub struct StorageMediaHost {
    storage: Arc<dyn Storage>,
    folder: String,
}

impl StorageMediaHost {
    pub fn new(storage: Arc<dyn Storage>, folder: impl Into<String>) -> Self {
        Self {
            storage,
            folder: folder.into().trim_matches('/').to_string(),
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    fn owns(&self, public_id: &str) -> bool {
        public_id
            .strip_prefix(&self.folder)
            .map(|rest| rest.starts_with('/'))
            .unwrap_or(false)
    }
}

#[async_trait]
impl MediaHost for StorageMediaHost {
    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    async fn upload(
        &self,
        user_id: &str,
        file_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<UploadedMedia, SyncError> {
        let key = user_storage_key(&self.folder, user_id, file_name).map_err(SyncError::from)?;
        let size = data.len() as u64;

        let url = self
            .storage
            .upload_with_key(&key, data, content_type)
            .await?;

        Ok(UploadedMedia {
            url,
            public_id: key,
            size,
            format: file_extension(file_name).unwrap_or_else(|| "bin".to_string()),
        })
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, public_id: &str) -> Result<bool, SyncError> {
        validate_key(public_id)?;

        if !self.owns(public_id) {
            tracing::warn!(public_id = %public_id, "Refusing to delete outside the media folder");
            return Ok(false);
        }

        if !self.storage.exists(public_id).await? {
            return Ok(false);
        }

        self.storage.delete(public_id).await?;
        Ok(true)
    }
}

impl From<StorageError> for SyncError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(msg) => SyncError::InvalidKey(msg),
            other => SyncError::Storage(other),
        }
    }
}
