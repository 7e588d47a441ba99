//! Slimify command-line tools: local batch compression and a client for the server.

pub mod client;

use anyhow::{Context, Result};
use bytes::Bytes;
use slimify_core::{format_file_size, format_signed_file_size};
use slimify_core::models::{CandidateFile, CompressionResult};
use slimify_processing::{BatchSummary, FileOutcome, ProgressReporter};
use std::path::{Path, PathBuf};

pub use client::ApiClient;

/// Initialize tracing for CLI binaries. Logs go to stderr so stdout stays parseable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// `--max-size` in bytes. Saturates instead of wrapping on absurd values.
pub fn size_limit_bytes(max_size_mb: u64) -> u64 {
    max_size_mb.saturating_mul(1024 * 1024)
}

/// Read a local file into a candidate. The content type is inferred from the name.
pub async fn read_candidate(path: &Path) -> Result<CandidateFile> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("File path has no usable file name: {}", path.display()))?;

    Ok(CandidateFile::from_name(name, Bytes::from(data)))
}

/// Write each result blob to `dir/{output_name}`. Returns the written paths in order.
pub async fn write_results(results: &[CompressionResult], dir: &Path) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut written = Vec::with_capacity(results.len());
    for result in results {
        let path = dir.join(&result.output_name);
        tokio::fs::write(&path, &result.blob)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), size_bytes = result.blob.len(), "Wrote compressed file");
        written.push(path);
    }
    Ok(written)
}

/// One table row per processed file.
pub fn outcome_line(outcome: &FileOutcome) -> String {
    let name = truncate_string(outcome.file_name(), 32);
    match outcome {
        FileOutcome::Compressed(result) => format!(
            "{:<32}  {:>10} -> {:>10}  {:>4}%  {}",
            name,
            format_file_size(result.original_size),
            format_file_size(result.compressed_size),
            result.compression_ratio,
            result.output_name,
        ),
        FileOutcome::Failed { error, .. } => format!("{:<32}  failed: {}", name, error),
        FileOutcome::Cancelled { .. } => format!("{:<32}  cancelled", name),
    }
}

pub fn summary_line(summary: &BatchSummary) -> String {
    let mut line = format!(
        "{} compressed: {} -> {} (saved {}, {}%)",
        summary.compressed_count,
        format_file_size(summary.total_original),
        format_file_size(summary.total_compressed),
        format_signed_file_size(summary.bytes_saved),
        summary.percent_saved,
    );
    if summary.failed_count > 0 {
        line.push_str(&format!(", {} failed", summary.failed_count));
    }
    if summary.cancelled_count > 0 {
        line.push_str(&format!(", {} cancelled", summary.cancelled_count));
    }
    line
}

/// Prints `[n/total]` progress lines to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_file_started(&self, index: usize, total: usize, file_name: &str) {
        eprintln!("[{}/{}] Compressing {}...", index + 1, total, file_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slimify_core::models::{CompressionMethod, SyncState};

    fn result(name: &str, original: u64, compressed: u64) -> CompressionResult {
        CompressionResult {
            original_name: name.to_string(),
            output_name: "out-1.pdf".to_string(),
            original_size: original,
            compressed_size: compressed,
            compression_ratio: 40,
            file_type: "application/pdf".to_string(),
            blob: Bytes::from_static(b"%PDF-1.5"),
            remote_url: None,
            remote_id: None,
            method: CompressionMethod::Simulated,
            sync_state: SyncState::Local,
        }
    }

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("abc", 3), "abc");
    }

    #[test]
    fn size_limit_saturates() {
        assert_eq!(size_limit_bytes(50), 52_428_800);
        assert_eq!(size_limit_bytes(u64::MAX), u64::MAX);
    }

    #[test]
    fn outcome_lines() {
        let line = outcome_line(&FileOutcome::Compressed(result("a.pdf", 1000, 600)));
        assert!(line.contains("1000 Bytes"));
        assert!(line.contains("600 Bytes"));
        assert!(line.contains("40%"));
        assert!(line.ends_with("out-1.pdf"));

        let line = outcome_line(&FileOutcome::Failed {
            file_name: "b.pdf".to_string(),
            error: "broken".to_string(),
        });
        assert!(line.starts_with("b.pdf"));
        assert!(line.ends_with("failed: broken"));
    }

    #[test]
    fn summary_mentions_failures_only_when_present() {
        let mut summary = BatchSummary {
            compressed_count: 2,
            total_original: 2048,
            total_compressed: 1024,
            bytes_saved: 1024,
            percent_saved: 50,
            ..Default::default()
        };
        assert_eq!(
            summary_line(&summary),
            "2 compressed: 2 KB -> 1 KB (saved 1 KB, 50%)"
        );

        summary.failed_count = 1;
        summary.bytes_saved = -512;
        assert!(summary_line(&summary).contains("saved -512 Bytes"));
        assert!(summary_line(&summary).ends_with(", 1 failed"));
    }

    #[tokio::test]
    async fn reads_and_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("Scan.PDF");
        tokio::fs::write(&input, b"%PDF-1.5 body").await.unwrap();

        let candidate = read_candidate(&input).await.unwrap();
        assert_eq!(candidate.name, "Scan.PDF");
        assert_eq!(candidate.size, 13);
        assert!(candidate.is_pdf());

        let out_dir = dir.path().join("out");
        let written = write_results(&[result("Scan.PDF", 13, 8)], &out_dir)
            .await
            .unwrap();
        assert_eq!(written, vec![out_dir.join("out-1.pdf")]);
        assert_eq!(tokio::fs::read(&written[0]).await.unwrap(), b"%PDF-1.5");
    }

    #[tokio::test]
    async fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_candidate(&dir.path().join("nope.pdf")).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
