use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::result::CompressionResult;

/// A persisted history entry for one compressed file.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CompressionRecord {
    pub id: Uuid,
    pub user_id: String,
    pub original_name: String,
    pub original_size: i64,
    pub compressed_size: i64,
    pub compression_ratio: i32,
    pub file_type: String,
    pub compressed_at: DateTime<Utc>,
    pub download_url: Option<String>,
    /// Media-host URL. Mirrors `download_url` for records written by the gateway.
    pub cloudinary_url: Option<String>,
    pub public_id: Option<String>,
}

/// Fields supplied by the writer; `id` and `compressed_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCompressionRecord {
    pub user_id: String,
    pub original_name: String,
    pub original_size: i64,
    pub compressed_size: i64,
    pub compression_ratio: i32,
    pub file_type: String,
    pub download_url: Option<String>,
    pub cloudinary_url: Option<String>,
    pub public_id: Option<String>,
}

impl NewCompressionRecord {
    pub fn from_result(user_id: &str, result: &CompressionResult) -> Self {
        Self {
            user_id: user_id.to_string(),
            original_name: result.original_name.clone(),
            original_size: result.original_size as i64,
            compressed_size: result.compressed_size as i64,
            compression_ratio: result.compression_ratio as i32,
            file_type: result.file_type.clone(),
            download_url: result.remote_url.clone(),
            cloudinary_url: result.remote_url.clone(),
            public_id: result.remote_id.clone(),
        }
    }

    pub fn bytes_saved(&self) -> i64 {
        self.original_size - self.compressed_size
    }
}

/// Per-user counters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserStats {
    pub user_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub total_files: i64,
    /// Sum of `original - compressed` over all files. May be negative.
    pub space_saved: i64,
    pub monthly_files: i64,
    pub created_at: DateTime<Utc>,
}

impl UserStats {
    /// Zeroed counters for a user who has not compressed anything yet.
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            display_name: None,
            total_files: 0,
            space_saved: 0,
            monthly_files: 0,
            created_at: Utc::now(),
        }
    }
}

/// Everything stored for a user, as returned by the export endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserExport {
    pub user: UserStats,
    pub compressions: Vec<CompressionRecord>,
    pub export_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompressionMethod, SyncState};
    use bytes::Bytes;

    #[test]
    fn empty_stats_are_zeroed() {
        let stats = UserStats::empty("u1");
        assert_eq!(stats.user_id, "u1");
        assert_eq!(stats.total_files, 0);
        assert_eq!(stats.space_saved, 0);
        assert_eq!(stats.monthly_files, 0);
        assert!(stats.email.is_none());
    }

    #[test]
    fn record_mirrors_remote_url() {
        let result = CompressionResult {
            original_name: "a.pdf".to_string(),
            output_name: "compressed-file-1.pdf".to_string(),
            original_size: 1000,
            compressed_size: 1200,
            compression_ratio: -20,
            file_type: "application/pdf".to_string(),
            blob: Bytes::new(),
            remote_url: Some("http://media/a.pdf".to_string()),
            remote_id: Some("slimifypdf/users/u1/compressed-file-1.pdf".to_string()),
            method: CompressionMethod::PdfRewrite,
            sync_state: SyncState::Synced,
        };

        let record = NewCompressionRecord::from_result("u1", &result);
        assert_eq!(record.download_url, record.cloudinary_url);
        assert_eq!(record.bytes_saved(), -200);
        assert_eq!(record.compression_ratio, -20);
    }
}
