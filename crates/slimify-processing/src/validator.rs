use slimify_core::constants::{DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE_MB};
use slimify_core::models::{file_extension, CandidateFile};
use slimify_core::{AppError, Config};
use std::fmt;

/// Why a file was not accepted for compression
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Unsupported file type: {name}")]
    UnsupportedType { name: String },

    #[error("File too large: {name} (max {max_mb}MB)")]
    FileTooLarge { name: String, max_mb: u64 },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnsupportedType { name } => AppError::UnsupportedFileType(name),
            ValidationError::FileTooLarge { name, max_mb } => {
                AppError::PayloadTooLarge(format!("{} (max {}MB)", name, max_mb))
            }
        }
    }
}

/// A file that failed validation, with the reason shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub file_name: String,
    pub reason: ValidationError,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

/// Files split into the ones to compress and the ones to report.
/// Both lists keep input order.
#[derive(Debug, Default)]
pub struct ValidationOutcome {
    pub accepted: Vec<CandidateFile>,
    pub rejected: Vec<Rejection>,
}

/// Filters candidate files by extension allow-list and size limit.
///
/// Validation has no side effects; a rejected file never stops the others.
#[derive(Debug, Clone)]
pub struct FileValidator {
    max_file_size: u64,
    allowed_extensions: Vec<String>,
}

impl FileValidator {
    pub fn new(max_file_size: u64, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_file_size_bytes() as u64,
            config.allowed_extensions().to_vec(),
        )
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Check one file. The extension is checked before the size.
    pub fn validate_file(&self, file: &CandidateFile) -> Result<(), ValidationError> {
        let allowed = file_extension(&file.name)
            .map(|ext| self.allowed_extensions.contains(&ext))
            .unwrap_or(false);
        if !allowed {
            return Err(ValidationError::UnsupportedType {
                name: file.name.clone(),
            });
        }

        if file.size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                name: file.name.clone(),
                max_mb: self.max_file_size / (1024 * 1024),
            });
        }

        Ok(())
    }

    pub fn validate(&self, files: Vec<CandidateFile>) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::default();

        for file in files {
            match self.validate_file(&file) {
                Ok(()) => outcome.accepted.push(file),
                Err(reason) => {
                    tracing::debug!(file_name = %file.name, reason = %reason, "File rejected");
                    outcome.rejected.push(Rejection {
                        file_name: file.name,
                        reason,
                    });
                }
            }
        }

        outcome
    }
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new(
            (DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024) as u64,
            DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn file(name: &str, size: u64) -> CandidateFile {
        let mut file = CandidateFile::from_name(name, Bytes::new());
        file.size = size;
        file
    }

    #[test]
    fn accepts_allowed_extensions_case_insensitively() {
        let validator = FileValidator::default();
        assert!(validator.validate_file(&file("Report.PDF", 10)).is_ok());
        assert!(validator.validate_file(&file("photo.JpEg", 10)).is_ok());
    }

    #[test]
    fn size_limit_is_inclusive() {
        let validator = FileValidator::new(100, vec!["pdf".to_string()]);
        assert!(validator.validate_file(&file("a.pdf", 100)).is_ok());
        assert_eq!(
            validator.validate_file(&file("a.pdf", 101)),
            Err(ValidationError::FileTooLarge {
                name: "a.pdf".to_string(),
                max_mb: 0,
            })
        );
    }

    #[test]
    fn rejection_messages() {
        let validator = FileValidator::default();
        let outcome = validator.validate(vec![
            file("notes.txt", 10),
            file("huge.pdf", 51 * 1024 * 1024),
        ]);

        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected[0].to_string(), "Unsupported file type: notes.txt");
        assert_eq!(outcome.rejected[1].to_string(), "File too large: huge.pdf (max 50MB)");
    }

    #[test]
    fn extension_is_checked_before_size() {
        let validator = FileValidator::new(1, vec!["pdf".to_string()]);
        let err = validator.validate_file(&file("big.exe", 1000)).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedType { .. }));
    }

    #[test]
    fn files_without_extension_are_rejected() {
        let validator = FileValidator::default();
        assert!(validator.validate_file(&file("README", 10)).is_err());
    }

    #[test]
    fn keeps_input_order_and_continues_after_rejects() {
        let validator = FileValidator::default();
        let outcome = validator.validate(vec![
            file("a.pdf", 1),
            file("b.gif", 1),
            file("c.png", 1),
            file("d.docx", 1),
        ]);

        let accepted: Vec<_> = outcome.accepted.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(accepted, vec!["a.pdf", "c.png", "d.docx"]);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.accepted.len() + outcome.rejected.len(), 4);
        assert_eq!(outcome.rejected[0].file_name, "b.gif");
    }

    #[test]
    fn oversized_image_is_rejected_next_to_valid_pdfs() {
        let validator = FileValidator::default();
        let input = vec![
            file("one.pdf", 2 * 1024 * 1024),
            file("scan.png", 60 * 1024 * 1024),
            file("two.pdf", 50 * 1024 * 1024),
        ];
        let total = input.len();
        let outcome = validator.validate(input);

        let accepted: Vec<_> = outcome.accepted.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(accepted, vec!["one.pdf", "two.pdf"]);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].file_name, "scan.png");
        assert_eq!(
            outcome.rejected[0].reason,
            ValidationError::FileTooLarge {
                name: "scan.png".to_string(),
                max_mb: 50,
            }
        );
        assert_eq!(outcome.accepted.len() + outcome.rejected.len(), total);
    }

    #[test]
    fn converts_to_app_error() {
        let err: AppError = ValidationError::UnsupportedType {
            name: "x.txt".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::UnsupportedFileType(_)));
    }
}
