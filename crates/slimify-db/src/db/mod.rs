//! Database repositories for data access layer
//
// Store trait shared by all backends
mod store;
//
// Postgres-backed repository
pub mod compressions;
//
// In-memory backend
pub mod memory;

pub use compressions::PgCompressionStore;
pub use memory::InMemoryCompressionStore;
pub use store::CompressionStore;
