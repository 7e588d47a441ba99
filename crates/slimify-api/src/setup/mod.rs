//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use slimify_core::Config;
use slimify_processing::{DocumentCompressor, FileValidator};
use slimify_services::{CompressionStore, MediaHost, Storage, StorageMediaHost};
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let store = database::setup_store(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let state = build_state(config.clone(), storage, store);
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Wire the shared state from already constructed backends.
pub fn build_state(
    config: Config,
    storage: Arc<dyn Storage>,
    store: Arc<dyn CompressionStore>,
) -> Arc<AppState> {
    let media_host: Arc<dyn MediaHost> = Arc::new(StorageMediaHost::new(
        storage.clone(),
        config.storage_folder(),
    ));

    Arc::new(AppState {
        validator: FileValidator::from_config(&config),
        compressor: Arc::new(DocumentCompressor::new()),
        upload_timeout: Duration::from_secs(config.upload_timeout_secs()),
        storage,
        media_host,
        store,
        config,
    })
}
