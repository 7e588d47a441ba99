//! Slimify DB Library
//!
//! Persistence for compression history records and per-user statistics.
//! [`CompressionStore`] is implemented for Postgres and for an in-memory map used
//! when no database is configured and in tests.

pub mod db;

pub use db::{CompressionStore, InMemoryCompressionStore, PgCompressionStore};
