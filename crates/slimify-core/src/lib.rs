//! Slimify Core Library
//!
//! This crate provides core domain models, error types, configuration, and the size
//! formatter that are shared across all Slimify components.

pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{AppConfig, BaseConfig, Config};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use format::{format_file_size, format_signed_file_size};
pub use storage_types::StorageBackend;
// Note: Storage, StorageError, StorageResult live in the slimify-storage crate
