//! Storage setup and initialization

use anyhow::{Context, Result};
use slimify_core::Config;
use slimify_services::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = %storage.backend_type(),
        folder = %config.storage_folder(),
        "Storage initialized successfully"
    );

    Ok(storage)
}
