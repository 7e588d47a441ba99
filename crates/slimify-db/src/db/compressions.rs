use async_trait::async_trait;
use slimify_core::models::{CompressionRecord, NewCompressionRecord, UserStats};
use slimify_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::store::CompressionStore;

const RECORD_COLUMNS: &str = "id, user_id, original_name, original_size, compressed_size, \
     compression_ratio, file_type, compressed_at, download_url, cloudinary_url, public_id";

const USER_COLUMNS: &str =
    "user_id, email, display_name, total_files, space_saved, monthly_files, created_at";

/// Postgres repository for compression history and user stats
#[derive(Clone)]
pub struct PgCompressionStore {
    pool: PgPool,
}

impl PgCompressionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompressionStore for PgCompressionStore {
    #[tracing::instrument(skip(self, email), fields(db.table = "users", db.operation = "upsert"))]
    async fn ensure_user(&self, user_id: &str, email: Option<&str>) -> Result<UserStats, AppError> {
        let user = sqlx::query_as::<Postgres, UserStats>(&format!(
            r#"
            INSERT INTO users (user_id, email)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE
                SET email = COALESCE(users.email, EXCLUDED.email)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "compressions", db.operation = "insert", user_id = %record.user_id))]
    async fn insert_record(
        &self,
        record: NewCompressionRecord,
    ) -> Result<CompressionRecord, AppError> {
        let inserted = sqlx::query_as::<Postgres, CompressionRecord>(&format!(
            r#"
            INSERT INTO compressions (
                id, user_id, original_name, original_size, compressed_size,
                compression_ratio, file_type, download_url, cloudinary_url, public_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            RECORD_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&record.user_id)
        .bind(&record.original_name)
        .bind(record.original_size)
        .bind(record.compressed_size)
        .bind(record.compression_ratio)
        .bind(&record.file_type)
        .bind(&record.download_url)
        .bind(&record.cloudinary_url)
        .bind(&record.public_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "update"))]
    async fn increment_user_stats(&self, user_id: &str, bytes_saved: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET total_files = total_files + 1,
                monthly_files = monthly_files + 1,
                space_saved = space_saved + $2
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(bytes_saved)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User not found: {}", user_id)));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "compressions", db.operation = "select"))]
    async fn list_recent(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<CompressionRecord>, AppError> {
        let records = sqlx::query_as::<Postgres, CompressionRecord>(&format!(
            "SELECT {} FROM compressions WHERE user_id = $1 ORDER BY compressed_at DESC LIMIT $2",
            RECORD_COLUMNS
        ))
        .bind(user_id)
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    #[tracing::instrument(skip(self), fields(db.table = "compressions", db.operation = "delete", db.record_id = %record_id))]
    async fn delete_record(&self, user_id: &str, record_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM compressions WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(record_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    async fn user_stats(&self, user_id: &str) -> Result<Option<UserStats>, AppError> {
        let user = sqlx::query_as::<Postgres, UserStats>(&format!(
            "SELECT {} FROM users WHERE user_id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
