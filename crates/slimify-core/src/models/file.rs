use bytes::Bytes;

use crate::constants::PDF_CONTENT_TYPE;

/// A user-selected file waiting to be validated and compressed.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub bytes: Bytes,
}

impl CandidateFile {
    /// Build a candidate whose size is the length of `bytes`.
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Build a candidate and infer its content type from the file name.
    pub fn from_name(name: impl Into<String>, bytes: Bytes) -> Self {
        let name = name.into();
        let content_type = guess_content_type(&name).to_string();
        Self::new(name, content_type, bytes)
    }

    /// Lowercase substring after the last `.`, if the name has one.
    pub fn extension(&self) -> Option<String> {
        file_extension(&self.name)
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type.eq_ignore_ascii_case(PDF_CONTENT_TYPE)
    }
}

/// Lowercase substring after the last `.` of `name`.
pub fn file_extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Content type for the extensions the pipeline knows about.
pub fn guess_content_type(name: &str) -> &'static str {
    match file_extension(name).as_deref() {
        Some("pdf") => PDF_CONTENT_TYPE,
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}
