//! Slimify CLI: compress files locally or talk to a Slimify server.
//!
//! Remote commands read SLIMIFY_API_URL (or API_URL); `--api-url` overrides both.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use slimify_cli::{
    init_tracing, outcome_line, read_candidate, size_limit_bytes, summary_line, write_results,
    ApiClient, ConsoleReporter,
};
use slimify_core::constants::{
    DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_OUTPUT_NAME,
};
use slimify_core::models::{CompressionResult, QualityTier};
use slimify_processing::{
    CompressionPipeline, DocumentCompressor, FileOutcome, FileValidator, PipelineError,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "slimify", about = "Slimify file compression CLI")]
struct Cli {
    /// Server base URL for remote commands (falls back to API_URL)
    #[arg(long, global = true, env = "SLIMIFY_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress files locally and write the results to a directory
    Compress {
        /// Files to compress
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Quality tier: low, medium or high
        #[arg(long, short, default_value = "medium")]
        quality: QualityTier,
        /// Directory receiving the compressed files
        #[arg(long, short, default_value = ".")]
        output_dir: PathBuf,
        /// Base name of the output files
        #[arg(long, default_value = DEFAULT_OUTPUT_NAME)]
        output_name: String,
        /// Per-file size limit in megabytes
        #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE_MB as u64)]
        max_size_mb: u64,
        /// Print the results as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Publish a file to the media host through the server proxy
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Owner of the upload
        #[arg(long, env = "SLIMIFY_USER_ID")]
        user_id: String,
    },
    /// Remove a file from the media host by its public ID
    Delete {
        public_id: String,
    },
    /// List the most recent compressions of a user
    History {
        user_id: String,
        /// Maximum number of records
        #[arg(long, default_value = "10")]
        limit: i64,
    },
    /// Delete one compression record of a user
    Forget {
        user_id: String,
        record_id: Uuid,
    },
    /// Show the counters of a user
    Stats {
        user_id: String,
    },
    /// Export the stats and history of a user
    Export {
        user_id: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn client(api_url: Option<String>) -> anyhow::Result<ApiClient> {
    match api_url {
        Some(url) => ApiClient::new(url),
        None => ApiClient::from_env(),
    }
}

#[derive(Serialize)]
struct CompressOutput<'a> {
    results: Vec<&'a CompressionResult>,
    rejected: Vec<String>,
    failed: Vec<(&'a str, &'a str)>,
    written: Vec<PathBuf>,
    percent_saved: i64,
}

async fn compress(
    files: Vec<PathBuf>,
    quality: QualityTier,
    output_dir: PathBuf,
    output_name: String,
    max_size_mb: u64,
    json: bool,
) -> anyhow::Result<()> {
    let mut candidates = Vec::with_capacity(files.len());
    for path in &files {
        candidates.push(read_candidate(path).await?);
    }

    let validator = FileValidator::new(
        size_limit_bytes(max_size_mb),
        DEFAULT_ALLOWED_EXTENSIONS
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancelling after the current file...");
            on_ctrl_c.cancel();
        }
    });

    let mut pipeline = CompressionPipeline::new(Arc::new(DocumentCompressor))
        .with_reporter(Arc::new(ConsoleReporter))
        .with_cancellation(cancel);

    let report = match pipeline
        .select_and_run(&validator, candidates, quality, &output_name, None)
        .await
    {
        Ok(report) => report,
        Err(PipelineError::NoFilesSelected { rejected }) => {
            for rejection in &rejected {
                eprintln!("{}", rejection);
            }
            anyhow::bail!("Please select files to compress");
        }
    };

    let written = write_results(pipeline.results(), &output_dir).await?;

    if json {
        let failed = report
            .outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Failed { file_name, error } => {
                    Some((file_name.as_str(), error.as_str()))
                }
                _ => None,
            })
            .collect();
        return print_json(&CompressOutput {
            results: report.results().collect(),
            rejected: report.rejected.iter().map(|r| r.to_string()).collect(),
            failed,
            written,
            percent_saved: report.summary.percent_saved,
        });
    }

    for rejection in &report.rejected {
        println!("skipped: {}", rejection);
    }
    for outcome in &report.outcomes {
        println!("{}", outcome_line(outcome));
    }
    println!("{}", summary_line(&report.summary));
    println!("Wrote {} file(s) to {}", written.len(), output_dir.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compress {
            files,
            quality,
            output_dir,
            output_name,
            max_size_mb,
            json,
        } => {
            compress(files, quality, output_dir, output_name, max_size_mb, json).await?;
        }
        Commands::Upload { file, user_id } => {
            let response = client(cli.api_url)?.upload_file(&file, &user_id).await?;
            print_json(&response)?;
        }
        Commands::Delete { public_id } => {
            let response = client(cli.api_url)?.delete_file(&public_id).await?;
            print_json(&response)?;
        }
        Commands::History { user_id, limit } => {
            let records = client(cli.api_url)?
                .list_compressions(&user_id, Some(limit))
                .await?;
            print_json(&records)?;
        }
        Commands::Forget { user_id, record_id } => {
            client(cli.api_url)?
                .delete_compression(&user_id, record_id)
                .await?;
            print_json(&serde_json::json!({
                "success": true,
                "message": format!("Compression {} deleted", record_id),
            }))?;
        }
        Commands::Stats { user_id } => {
            let stats = client(cli.api_url)?.user_stats(&user_id).await?;
            print_json(&stats)?;
        }
        Commands::Export { user_id } => {
            let export = client(cli.api_url)?.export_user_data(&user_id).await?;
            print_json(&export)?;
        }
    }

    Ok(())
}
