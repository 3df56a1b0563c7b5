//! ---
//! tdg_section: "11-simulation"
//! tdg_subsection: "01-bootstrap"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Command-line entry point for telecom dataset generation."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{ArgAction, Parser, ValueEnum};
use tdg_common::config::{AppConfig, DEFAULT_CONFIG_CANDIDATES};
use tdg_common::logging::{init_tracing, LogFormat};
use tdg_common::version::VersionInfo;
use tdg_export::{
    save_dataset, write_file, write_records, write_stream, HttpUploader, LocalTarget,
    OutputFormat, SaveOptions, SaveOutcome, UploadTarget,
};
use tdg_sim::{DatasetGenerator, GenerationProfile, GenerationRequest, TelecomDataset, COLUMNS};
use tracing::info;

const PREVIEW_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
    Parquet,
}

impl FormatArg {
    fn as_str(self) -> &'static str {
        match self {
            FormatArg::Csv => "csv",
            FormatArg::Json => "json",
            FormatArg::Parquet => "parquet",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    about = "Generate synthetic telecom network performance datasets",
    long_about = None
)]
struct Cli {
    /// Number of cell sites to generate [default: 100]
    #[arg(long, allow_negative_numbers = true)]
    sites: Option<i64>,

    /// Number of hourly time chunks per site [default: 50]
    #[arg(long, allow_negative_numbers = true)]
    chunks: Option<i64>,

    /// Output file path. Use '-' for stdout [default: telecom_data.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Explicit output format when the extension is ambiguous
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Random seed for reproducible datasets
    #[arg(long, allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Print the first rows and per-column statistics instead of saving
    #[arg(long, action = ArgAction::SetTrue)]
    preview: bool,

    /// Pre-signed object-storage URL that receives the dataset via HTTP PUT
    #[arg(long, env = "TDG_UPLOAD_URL")]
    upload_url: Option<String>,

    /// Upload timeout in seconds [default: 60]
    #[arg(long)]
    upload_timeout_secs: Option<u64>,

    /// Fail instead of writing locally when the upload fails
    #[arg(long, action = ArgAction::SetTrue)]
    no_fallback: bool,

    /// Configuration file (overrides TDG_CONFIG and the default locations)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Console log format
    #[arg(long, value_enum)]
    log_format: Option<LogFormatArg>,

    /// Print extended version information and exit
    #[arg(short = 'V', long = "version", action = ArgAction::SetTrue)]
    version: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.version {
        println!("{}", VersionInfo::current().extended());
        return Ok(());
    }

    let (config, source) = resolve_config(&cli)?;
    init_tracing("tdg-gen", &config.logging)?;
    if let Some(path) = &source {
        info!(config_path = %path.display(), "configuration loaded");
    }

    let profile = GenerationProfile::with_overrides(&config.profile)
        .context("invalid generation profile overrides")?;
    let generator = DatasetGenerator::new(profile);
    let request = GenerationRequest::from(&config.generation);

    if cli.preview {
        let dataset = generator.generate(&request)?;
        return print_preview(io::stdout().lock(), &dataset);
    }

    let options = save_options(&config)?;
    match &options {
        SaveOptions {
            upload: None,
            local: Some(local),
            ..
        } => {
            let rows = stream_to_local(&generator, &request, local)?;
            info!(destination = %local, rows, columns = COLUMNS.len(), "dataset saved");
        }
        _ => {
            let dataset = generator.generate(&request)?;
            let outcome = save_dataset(dataset.records(), &options, &HttpUploader)?;
            if let SaveOutcome::FellBack { target, .. } = &outcome {
                eprintln!("upload failed, dataset written to {target}");
            }
        }
    }
    Ok(())
}

/// Load configuration and apply command-line overrides on top of it.
fn resolve_config(cli: &Cli) -> Result<(AppConfig, Option<PathBuf>)> {
    let (mut config, source) = match &cli.config {
        Some(path) => (AppConfig::from_path(path)?, Some(path.clone())),
        None => {
            let loaded = AppConfig::load_with_source(&DEFAULT_CONFIG_CANDIDATES)?;
            (loaded.config, loaded.source)
        }
    };

    if let Some(sites) = cli.sites {
        config.generation.sites = sites;
    }
    if let Some(chunks) = cli.chunks {
        config.generation.chunks = chunks;
    }
    if let Some(seed) = cli.seed {
        config.generation.seed = Some(seed);
    }
    if let Some(output) = &cli.output {
        config.output.path = Some(output.clone());
    }
    if let Some(format) = cli.format {
        config.output.format = Some(format.as_str().to_owned());
    }
    if let Some(url) = &cli.upload_url {
        config.upload.url = Some(url.clone());
    }
    if let Some(secs) = cli.upload_timeout_secs {
        config.upload.timeout = Duration::from_secs(secs);
    }
    if cli.no_fallback {
        config.upload.fallback_to_local = false;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::StructuredJson,
        };
    }

    config.validate()?;
    Ok((config, source))
}

fn save_options(config: &AppConfig) -> Result<SaveOptions> {
    let explicit = config
        .output
        .format
        .as_deref()
        .map(str::parse::<OutputFormat>)
        .transpose()?;
    let local = config
        .output
        .path
        .as_deref()
        .map(|path| LocalTarget::resolve(path, explicit))
        .transpose()?;
    let upload = config
        .upload
        .url
        .as_deref()
        .map(|url| UploadTarget::parse(url, config.upload.timeout))
        .transpose()?;
    Ok(SaveOptions {
        local,
        upload,
        fallback_to_local: config.upload.fallback_to_local,
    })
}

/// Encode rows straight into the local target as they are synthesized.
fn stream_to_local(
    generator: &DatasetGenerator,
    request: &GenerationRequest,
    target: &LocalTarget,
) -> Result<usize> {
    let now = Local::now().naive_local();
    let rows = match target {
        LocalTarget::Stdout(format) => {
            generator.with_stream(request, now, |_, stream| -> tdg_export::Result<usize> {
                write_stream(io::stdout().lock(), *format, stream)
            })?
        }
        LocalTarget::File { path, format } => {
            generator
                .with_stream(request, now, |_, stream| -> tdg_export::Result<usize> {
                    // Created only once the request has been validated, and
                    // moved into place only after the last row.
                    write_file(path, |out| write_stream(out, *format, stream))
                })
                .with_context(|| format!("failed to write dataset to {}", path.display()))?
        }
    };
    Ok(rows)
}

fn print_preview<W: Write>(mut out: W, dataset: &TelecomDataset) -> Result<()> {
    let head = dataset.head(PREVIEW_ROWS);
    writeln!(
        out,
        "first {} of {} records ({} sites)",
        head.len(),
        dataset.len(),
        dataset.sites().len()
    )?;
    write_records(&mut out, OutputFormat::Csv, head)?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<18} {:>7} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11}",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    )?;
    for summary in dataset.describe() {
        writeln!(
            out,
            "{:<18} {:>7} {:>11.3} {:>11.3} {:>11.3} {:>11.3} {:>11.3} {:>11.3} {:>11.3}",
            summary.column,
            summary.count,
            summary.mean,
            summary.std,
            summary.min,
            summary.p25,
            summary.median,
            summary.p75,
            summary.max
        )?;
    }
    out.flush()?;
    Ok(())
}
