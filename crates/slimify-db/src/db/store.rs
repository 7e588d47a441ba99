use async_trait::async_trait;
use slimify_core::models::{CompressionRecord, NewCompressionRecord, UserStats};
use slimify_core::AppError;
use uuid::Uuid;

/// Storage for compression history and user counters.
///
/// Writing a record and bumping the user's counters are separate calls with no
/// transaction between them; callers decide how to handle a partial failure.
#[async_trait]
pub trait CompressionStore: Send + Sync {
    /// Create the user row with zeroed counters if it does not exist yet.
    /// A missing email is filled in when one is supplied later.
    async fn ensure_user(&self, user_id: &str, email: Option<&str>) -> Result<UserStats, AppError>;

    /// Insert a history record. The store assigns `id` and `compressed_at`.
    async fn insert_record(
        &self,
        record: NewCompressionRecord,
    ) -> Result<CompressionRecord, AppError>;

    /// Add one file to `total_files` and `monthly_files` and `bytes_saved` to
    /// `space_saved`. Fails with `NotFound` for an unknown user.
    async fn increment_user_stats(&self, user_id: &str, bytes_saved: i64) -> Result<(), AppError>;

    /// Most recent records first.
    async fn list_recent(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<CompressionRecord>, AppError>;

    /// Delete one of the user's records. Returns false if it did not exist.
    async fn delete_record(&self, user_id: &str, record_id: Uuid) -> Result<bool, AppError>;

    async fn user_stats(&self, user_id: &str) -> Result<Option<UserStats>, AppError>;

    /// Connectivity check used by the health endpoint.
    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    /// Short backend name reported by the health endpoint.
    fn backend_name(&self) -> &'static str;
}
