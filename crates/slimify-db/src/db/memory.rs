//! In-memory compression store.

use async_trait::async_trait;
use chrono::Utc;
use slimify_core::models::{CompressionRecord, NewCompressionRecord, UserStats};
use slimify_core::AppError;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::CompressionStore;

/// Keeps users and records in maps behind a [`RwLock`].
///
/// Used by the server when `DATABASE_URL` is not set, and by tests that need a
/// store without a database. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryCompressionStore {
    users: RwLock<HashMap<String, UserStats>>,
    records: RwLock<Vec<CompressionRecord>>,
}

impl InMemoryCompressionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl CompressionStore for InMemoryCompressionStore {
    async fn ensure_user(&self, user_id: &str, email: Option<&str>) -> Result<UserStats, AppError> {
        let mut users = self.users.write().await;
        let user = users
            .entry(user_id.to_string())
            .or_insert_with(|| UserStats {
                user_id: user_id.to_string(),
                email: None,
                display_name: None,
                total_files: 0,
                space_saved: 0,
                monthly_files: 0,
                created_at: Utc::now(),
            });
        if user.email.is_none() {
            user.email = email.map(String::from);
        }
        Ok(user.clone())
    }

    async fn insert_record(
        &self,
        record: NewCompressionRecord,
    ) -> Result<CompressionRecord, AppError> {
        let stored = CompressionRecord {
            id: Uuid::new_v4(),
            user_id: record.user_id,
            original_name: record.original_name,
            original_size: record.original_size,
            compressed_size: record.compressed_size,
            compression_ratio: record.compression_ratio,
            file_type: record.file_type,
            compressed_at: Utc::now(),
            download_url: record.download_url,
            cloudinary_url: record.cloudinary_url,
            public_id: record.public_id,
        };
        self.records.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn increment_user_stats(&self, user_id: &str, bytes_saved: i64) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User not found: {}", user_id)))?;
        user.total_files += 1;
        user.monthly_files += 1;
        user.space_saved += bytes_saved;
        Ok(())
    }

    async fn list_recent(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<CompressionRecord>, AppError> {
        let records = self.records.read().await;
        // Records are appended in time order; walk backwards for newest first.
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn delete_record(&self, user_id: &str, record_id: Uuid) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !(r.user_id == user_id && r.id == record_id));
        Ok(records.len() < before)
    }

    async fn user_stats(&self, user_id: &str) -> Result<Option<UserStats>, AppError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(user_id: &str, name: &str, original: i64, compressed: i64) -> NewCompressionRecord {
        NewCompressionRecord {
            user_id: user_id.to_string(),
            original_name: name.to_string(),
            original_size: original,
            compressed_size: compressed,
            compression_ratio: 0,
            file_type: "application/pdf".to_string(),
            download_url: None,
            cloudinary_url: None,
            public_id: None,
        }
    }

    #[tokio::test]
    async fn ensure_user_is_idempotent_and_fills_email() {
        let store = InMemoryCompressionStore::new();
        let created = store.ensure_user("u1", None).await.unwrap();
        assert_eq!(created.total_files, 0);
        assert!(created.email.is_none());

        let again = store.ensure_user("u1", Some("a@b.c")).await.unwrap();
        assert_eq!(again.email.as_deref(), Some("a@b.c"));
        assert_eq!(again.created_at, created.created_at);

        let kept = store.ensure_user("u1", Some("other@b.c")).await.unwrap();
        assert_eq!(kept.email.as_deref(), Some("a@b.c"));
    }

    #[tokio::test]
    async fn increments_counters_with_negative_savings() {
        let store = InMemoryCompressionStore::new();
        store.ensure_user("u1", None).await.unwrap();
        store.increment_user_stats("u1", 500).await.unwrap();
        store.increment_user_stats("u1", -200).await.unwrap();

        let stats = store.user_stats("u1").await.unwrap().unwrap();
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.monthly_files, 2);
        assert_eq!(stats.space_saved, 300);
    }

    #[tokio::test]
    async fn increment_for_unknown_user_fails() {
        let store = InMemoryCompressionStore::new();
        let err = store.increment_user_stats("ghost", 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn lists_newest_first_with_limit() {
        let store = InMemoryCompressionStore::new();
        for name in ["a.pdf", "b.pdf", "c.pdf"] {
            store.insert_record(new_record("u1", name, 10, 8)).await.unwrap();
        }
        store.insert_record(new_record("u2", "x.pdf", 10, 8)).await.unwrap();

        let recent = store.list_recent("u1", 2).await.unwrap();
        let names: Vec<_> = recent.iter().map(|r| r.original_name.as_str()).collect();
        assert_eq!(names, vec!["c.pdf", "b.pdf"]);
    }

    #[tokio::test]
    async fn delete_is_scoped_to_user() {
        let store = InMemoryCompressionStore::new();
        let record = store.insert_record(new_record("u1", "a.pdf", 10, 8)).await.unwrap();

        assert!(!store.delete_record("u2", record.id).await.unwrap());
        assert!(store.delete_record("u1", record.id).await.unwrap());
        assert!(!store.delete_record("u1", record.id).await.unwrap());
        assert_eq!(store.record_count().await, 0);
    }
}
