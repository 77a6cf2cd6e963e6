use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use edge_stream::ExecutionMode;
use edge_stream::batch::run_batch;
use edge_stream::config::BatchConfig;
use log::{info, warn};
use std::path::PathBuf;

/// How the pipeline stages are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Fused single-threaded chain
    Sequential,
    /// Three tasks joined by bounded channels
    Staged,
}

impl From<Mode> for ExecutionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Sequential => ExecutionMode::Sequential,
            Mode::Staged => ExecutionMode::Staged,
        }
    }
}

/// Runs the streaming Sobel edge pipeline over every image in a directory.
#[derive(Parser, Debug)]
#[command(name = "edge_batch", version, long_about = None)]
struct Args {
    /// Directory of input images (jpg, jpeg, png by default)
    input_dir: PathBuf,

    /// Directory that receives the edge maps
    output_dir: PathBuf,

    /// Optional TOML configuration; command-line flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Images processed concurrently (default: number of logical CPUs)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Stage scheduling
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Capacity of each inter-stage channel in staged mode
    #[arg(long)]
    channel_capacity: Option<usize>,

    /// Prefix for output file names
    #[arg(long)]
    prefix: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Argument Parsing & Logging ---
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    // --- 2. Configuration ---
    let mut config = match &args.config {
        Some(path) => BatchConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => BatchConfig::default(),
    };
    config.input_dir = args.input_dir;
    config.output_dir = args.output_dir;
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(mode) = args.mode {
        config.pipeline.mode = mode.into();
    }
    if let Some(capacity) = args.channel_capacity {
        config.pipeline.channel_capacity = capacity;
    }
    if let Some(prefix) = args.prefix {
        config.output_prefix = prefix;
    }
    config.validate().context("invalid configuration")?;

    // --- 3. Batch Run ---
    let report = run_batch(&config)
        .await
        .with_context(|| format!("batch over {} failed", config.input_dir.display()))?;

    // --- 4. Summary ---
    if report.images_processed == 0 {
        warn!("no images were processed from {}", config.input_dir.display());
    } else {
        println!("{report}");
    }
    if report.images_failed > 0 {
        warn!("{} images were skipped", report.images_failed);
    }
    info!("edge maps written to {}", config.output_dir.display());
    Ok(())
}
