//! Batch processing command for multiple documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use dialscan_core::{Document, DocumentFormat, ScanContext, ScanStatus, Scanner};

use super::load_config;
use super::scan::{OutputFormat, format_numbers, source_name, write_report};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Write a PDF report per document into the output directory
    #[arg(long)]
    reports: bool,
}

/// Result of scanning a single file.
struct ScanResult {
    path: PathBuf,
    ctx: ScanContext,
}

impl ScanResult {
    fn failed(&self) -> bool {
        self.ctx.status == ScanStatus::Failed
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Only files with a supported extension are picked up
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| DocumentFormat::from_path(p).is_ok())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let scanner = Arc::new(Scanner::from_config(&config));
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let result = scan_file(Arc::clone(&scanner), path).await?;

        if result.failed() {
            let error_msg = result.ctx.message.clone().unwrap_or_default();
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                pb.abandon();
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }

        results.push(result);
        pb.inc(1);
    }

    pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| !r.failed()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.failed()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            let stem = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document");

            let output_path = output_dir.join(format!("{}.{}", stem, args.format.extension()));
            let content = format_numbers(&result.ctx, args.format, &config.output)?;
            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());

            if args.reports {
                let report_path = output_dir.join(format!("{}-contacts.pdf", stem));
                write_report(&scanner, &result.ctx.numbers, &report_path)?;
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let total_numbers: usize = successful.iter().map(|r| r.ctx.numbers.len()).sum();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed, {} numbers found",
        style(successful.len()).green(),
        style(failed.len()).red(),
        total_numbers
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.ctx.message.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Scan one file on the blocking pool. Read and decode failures end up in
/// the returned context rather than as an error.
async fn scan_file(scanner: Arc<Scanner>, path: PathBuf) -> anyhow::Result<ScanResult> {
    let result = tokio::task::spawn_blocking(move || {
        let mut ctx = ScanContext::new(source_name(&path));
        let result = Document::open(&path).and_then(|doc| scanner.scan(&doc, &mut ctx));
        if let Err(e) = result {
            // scan() already marked the context; load failures have not
            if ctx.status != ScanStatus::Failed {
                ctx.status = ScanStatus::Failed;
                ctx.message = Some(e.to_string());
            }
        }
        ScanResult { path, ctx }
    })
    .await?;

    Ok(result)
}

fn write_summary(path: &Path, results: &[ScanResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "format",
        "count",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let ctx = &result.ctx;
        let format = ctx.format.map(|f| f.to_string()).unwrap_or_default();

        if result.failed() {
            wtr.write_record([
                ctx.source.as_str(),
                "error",
                &format,
                "",
                &ctx.processing_time_ms.to_string(),
                ctx.message.as_deref().unwrap_or(""),
            ])?;
        } else {
            wtr.write_record([
                ctx.source.as_str(),
                "success",
                &format,
                &ctx.numbers.len().to_string(),
                &ctx.processing_time_ms.to_string(),
                "",
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
