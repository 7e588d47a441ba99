//! Application state shared by all handlers.

use slimify_core::Config;
use slimify_processing::{CompressionPipeline, FileCompressor, FileValidator, TracingReporter};
use slimify_services::{CompressionStore, MediaHost, RemoteSyncGateway, Storage};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub media_host: Arc<dyn MediaHost>,
    pub store: Arc<dyn CompressionStore>,
    pub validator: FileValidator,
    pub compressor: Arc<dyn FileCompressor>,
    pub upload_timeout: Duration,
}

impl AppState {
    /// A fresh pipeline for one request. Results of signed-in users go through the
    /// sync gateway; anonymous results pass through it untouched.
    pub fn pipeline(&self) -> CompressionPipeline {
        let gateway = RemoteSyncGateway::new(self.media_host.clone(), self.store.clone())
            .with_upload_timeout(self.upload_timeout);

        CompressionPipeline::new(self.compressor.clone())
            .with_persister(Arc::new(gateway))
            .with_reporter(Arc::new(TracingReporter))
    }
}
