//! Scan command - extract contact numbers from a single document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use dialscan_core::models::config::OutputConfig;
use dialscan_core::{
    CandidateMatch, DialscanConfig, Document, DocumentFormat, ResultSet, ScanContext, Scanner,
    report_file_name,
};

use super::load_config;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input document (.pdf, .doc or .docx)
    #[arg(required = true)]
    input: PathBuf,

    /// Declared MIME type (default: derived from the file extension)
    #[arg(long)]
    mime: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a PDF report to this path
    #[arg(long, conflicts_with = "report_dir")]
    report: Option<PathBuf>,

    /// Write a timestamped PDF report into this directory
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Print every raw rule match to stderr
    #[arg(long)]
    show_candidates: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON scan summary
    Json,
    /// CSV with one number per row
    Csv,
    /// Human-readable summary with a preview
    Text,
    /// One number per line
    List,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text | Self::List => "txt",
        }
    }
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let format = match &args.mime {
        Some(mime) => DocumentFormat::from_mime(mime)?,
        None => DocumentFormat::from_path(&args.input)?,
    };
    let document = Document::new(fs::read(&args.input)?, format);

    info!("Scanning {} as {}", args.input.display(), format);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Extracting text from {}...", format));

    let scanner = Scanner::from_config(&config);
    let source = source_name(&args.input);
    let show_candidates = args.show_candidates;

    let (scanner, ctx, result) = tokio::task::spawn_blocking(move || {
        let mut ctx = ScanContext::new(source);
        let result = if show_candidates {
            scanner.scan_with_candidates(&document, &mut ctx)
        } else {
            scanner.scan(&document, &mut ctx).map(|numbers| (numbers, Vec::new()))
        };
        (scanner, ctx, result)
    })
    .await?;

    pb.finish_and_clear();

    let (numbers, candidates) = result?;

    if show_candidates {
        print_candidates(&candidates);
    }

    let output = format_numbers(&ctx, args.format, &config.output)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else if !output.is_empty() {
        print!("{}", output);
    }

    if let Some(report_path) = report_target(&args, &config) {
        write_report(&scanner, &numbers, &report_path)?;
    }

    debug!("Scan finished in {}ms", ctx.processing_time_ms);
    Ok(())
}

/// Where the PDF report should go, if one was requested.
fn report_target(args: &ScanArgs, config: &DialscanConfig) -> Option<PathBuf> {
    if let Some(path) = &args.report {
        return Some(path.clone());
    }
    args.report_dir
        .as_ref()
        .map(|dir| dir.join(report_file_name(&config.report.file_prefix, chrono::Utc::now())))
}

/// Render and write the PDF report; an empty result set only warns.
pub fn write_report(scanner: &Scanner, numbers: &ResultSet, path: &Path) -> anyhow::Result<()> {
    if numbers.is_empty() {
        eprintln!("{} No contacts to generate PDF", style("!").yellow());
        return Ok(());
    }

    let bytes = scanner.render_report(numbers)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;

    eprintln!(
        "{} Report with {} numbers written to {}",
        style("✓").green(),
        numbers.len(),
        path.display()
    );
    Ok(())
}

pub fn source_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

fn print_candidates(candidates: &[CandidateMatch]) {
    eprintln!("{}", style("Candidates:").bold());
    for c in candidates {
        eprintln!(
            "  {:<16} {:>6}..{:<6} {:?}",
            format!("{:?}", c.rule),
            c.position.0,
            c.position.1,
            c.text
        );
    }
}

/// Render the scan result in the requested format.
pub fn format_numbers(
    ctx: &ScanContext,
    format: OutputFormat,
    output: &OutputConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(ctx)?)),
        OutputFormat::Csv => format_csv(&ctx.numbers),
        OutputFormat::Text => Ok(format_text(&ctx.numbers, output.preview_limit)),
        OutputFormat::List => Ok(ctx
            .numbers
            .iter()
            .map(|n| format!("{}\n", n))
            .collect()),
    }
}

fn format_csv(numbers: &ResultSet) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["number"])?;
    for number in numbers {
        wtr.write_record([number.as_str()])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(numbers: &ResultSet, preview_limit: usize) -> String {
    if numbers.is_empty() {
        return format!("{}\n", dialscan_core::models::NOTHING_FOUND_MESSAGE);
    }

    let preview = numbers.preview(preview_limit);
    let mut output = format!("Found {} contact numbers:\n", numbers.len());
    for number in preview.shown {
        output.push_str(&format!("  {}\n", number));
    }
    if preview.remaining > 0 {
        output.push_str(&format!("  ... and {} more\n", preview.remaining));
    }
    output
}
