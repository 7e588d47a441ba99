//! Test helpers: build the router over local storage and the in-memory store.
//!
//! No database or network is needed: `cargo test -p slimify-api`.

pub mod fixtures;

use axum_test::TestServer;
use slimify_api::setup::{build_state, routes};
use slimify_core::models::QualityTier;
use slimify_core::{AppConfig, BaseConfig, Config, StorageBackend};
use slimify_services::{InMemoryCompressionStore, LocalStorage};
use std::sync::Arc;
use tempfile::TempDir;

pub const MEDIA_BASE_URL: &str = "http://localhost:4000/media";

/// Test application: server plus the resources it owns.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryCompressionStore>,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config(storage_path: &str, max_file_size_bytes: usize) -> Config {
    Config(Box::new(AppConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            db_timeout_seconds: 5,
            environment: "test".to_string(),
            request_timeout_secs: 30,
        },
        database_url: None,
        storage_backend: Some(StorageBackend::Local),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: Some(storage_path.to_string()),
        local_storage_base_url: Some(MEDIA_BASE_URL.to_string()),
        max_file_size_bytes,
        allowed_extensions: ["pdf", "doc", "docx", "png", "jpg", "jpeg"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        default_quality: QualityTier::Medium,
        upload_timeout_secs: 5,
        storage_folder: "slimifypdf".to_string(),
    }))
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_limit(1024 * 1024).await
}

pub async fn setup_test_app_with_limit(max_file_size_bytes: usize) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage_path = temp_dir.path().to_string_lossy().to_string();
    let config = test_config(&storage_path, max_file_size_bytes);

    let storage = LocalStorage::new(temp_dir.path(), MEDIA_BASE_URL.to_string())
        .await
        .expect("Failed to create local storage");
    let store = Arc::new(InMemoryCompressionStore::new());

    let state = build_state(config, Arc::new(storage), store.clone());
    let app = routes::app_routes(state);
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        store,
        temp_dir,
    }
}
