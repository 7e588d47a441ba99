//! Data models for the application
//!
//! Input files, quality tiers, per-file compression results, the session context and
//! the persisted history/statistics records.

mod file;
mod quality;
mod record;
mod result;
mod session;

pub use file::*;
pub use quality::*;
pub use record::*;
pub use result::*;
pub use session::*;
