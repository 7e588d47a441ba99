//! Slimify Storage Library
//!
//! Object storage used as the media host for compressed files. It provides the
//! `Storage` trait and implementations for S3 (via `object_store`) and the local
//! filesystem.
//!
//! # Storage key format
//!
//! User files live under `{folder}/users/{user_id}/{file_name}`, where `folder`
//! defaults to `slimifypdf`. The key doubles as the public id returned to clients.
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{user_storage_key, validate_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use slimify_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
