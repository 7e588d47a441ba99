//! API constants

/// Request bodies may hold this many files at the configured per-file limit.
pub const MAX_FILES_PER_REQUEST: usize = 10;
