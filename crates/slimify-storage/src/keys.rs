//! Shared key generation for storage backends.
//!
//! Key format: `{folder}/users/{user_id}/{file_name}`.

use crate::{StorageError, StorageResult};

/// Build the storage key (and public id) for a user's file.
///
/// `user_id` and `file_name` must be single path segments.
pub fn user_storage_key(folder: &str, user_id: &str, file_name: &str) -> StorageResult<String> {
    check_segment("user id", user_id)?;
    check_segment("file name", file_name)?;

    let key = format!("{}/users/{}/{}", folder.trim_matches('/'), user_id, file_name);
    validate_key(&key)?;
    Ok(key)
}

/// Reject keys that are empty, absolute or contain `..`.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.trim().is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

fn check_segment(what: &str, value: &str) -> StorageResult<()> {
    if value.trim().is_empty() {
        return Err(StorageError::InvalidKey(format!("{} is empty", what)));
    }
    if value.contains('/') || value.contains('\\') || value == "." || value.contains("..") {
        return Err(StorageError::InvalidKey(format!(
            "{} must be a single path segment: {}",
            what, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_user_scoped_key() {
        let key = user_storage_key("slimifypdf", "user-1", "compressed-file-1.pdf").unwrap();
        assert_eq!(key, "slimifypdf/users/user-1/compressed-file-1.pdf");
    }

    #[test]
    fn trims_folder_slashes() {
        let key = user_storage_key("/media/", "u", "a.png").unwrap();
        assert_eq!(key, "media/users/u/a.png");
    }

    #[test]
    fn rejects_traversal() {
        assert!(user_storage_key("slimifypdf", "..", "a.pdf").is_err());
        assert!(user_storage_key("slimifypdf", "u", "../a.pdf").is_err());
        assert!(user_storage_key("slimifypdf", "u/v", "a.pdf").is_err());
        assert!(user_storage_key("slimifypdf", "", "a.pdf").is_err());
        assert!(validate_key("/etc/passwd").is_err());
    }
}
