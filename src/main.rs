//! filetree - scan a directory and print it as a box-drawing tree.
//!
//! Usage:
//!   filetree [PATH]                 Print the tree of PATH (default: .)
//!   filetree [PATH] --save          Save to file_tree_<timestamp>.txt (.json with --format json)
//!   filetree [PATH] -o tree.txt     Save to a chosen file
//!   filetree [PATH] --format json   Emit the scan as JSON
//!   filetree --help                 Show help

mod settings;

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

use filetree_render::{RenderOptions, TreeRenderer, save, timestamped_file_name};
use filetree_scan::{ScanConfig, ScanContext, ScanError, ScanProgress, TreeScanner};

use crate::settings::Settings;

/// Exit status for a scan that was cancelled or ran out of time.
const EXIT_INTERRUPTED: u8 = 2;

#[derive(Parser)]
#[command(
    name = "filetree",
    version,
    about = "Scan a directory and render it as a text tree",
    long_about = "filetree walks a directory, applying depth, hidden-file and size \
                  limits, and prints the result as a box-drawing tree that can be \
                  pasted into documents or chat prompts.\n\n\
                  Defaults come from ~/.config/filetree/config.toml when present; \
                  flags override them."
)]
struct Cli {
    /// Directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Maximum depth to expand
    #[arg(short = 'd', long, conflicts_with = "unlimited_depth")]
    max_depth: Option<u32>,

    /// Expand without a configured depth limit
    #[arg(long)]
    unlimited_depth: bool,

    /// Include entries starting with '.'
    #[arg(short = 'a', long)]
    show_hidden: bool,

    /// Keep filesystem order instead of directories first
    #[arg(long)]
    no_sort: bool,

    /// Show file sizes
    #[arg(short = 's', long)]
    show_size: bool,

    /// Give up after this many seconds (0 = no limit)
    #[arg(short = 't', long)]
    timeout: Option<u64>,

    /// Settings file to use instead of the per-user one
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Write the output to this file
    #[arg(short, long, conflicts_with = "save")]
    output: Option<PathBuf>,

    /// Write the output to a timestamped file
    #[arg(long)]
    save: bool,

    /// Report progress on stderr while scanning
    #[arg(long)]
    progress: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

impl Cli {
    /// Apply command line overrides on top of the loaded policy.
    fn scan_config(&self, base: ScanConfig) -> ScanConfig {
        let mut config = base;
        if self.unlimited_depth {
            config.max_depth = None;
        } else if let Some(depth) = self.max_depth {
            config.max_depth = Some(depth);
        }
        config.show_hidden |= self.show_hidden;
        config.show_size |= self.show_size;
        if self.no_sort {
            config.sort_directories_first = false;
        }
        config
    }

    /// Where to write the output, or `None` for stdout.
    fn destination<Tz>(&self, output_dir: Option<&Path>, now: &DateTime<Tz>) -> Option<PathBuf>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        if let Some(path) = &self.output {
            return Some(path.clone());
        }
        self.save.then(|| {
            let name = timestamped_file_name(now, self.format.extension());
            output_dir.unwrap_or(Path::new("")).join(name)
        })
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;
    let config = cli.scan_config(settings.scan.clone());
    tracing::debug!(?config, "resolved scan configuration");

    let timeout = Duration::from_secs(cli.timeout.unwrap_or(settings.timeout_secs));
    let ctx = if timeout.is_zero() {
        ScanContext::new()
    } else {
        ScanContext::with_timeout(timeout)
    };

    let scanner = TreeScanner::new(config);
    let progress_task = cli.progress.then(|| report_progress(scanner.subscribe()));

    // Ctrl-C stops the scan cooperatively instead of killing the process.
    let cancel = ctx.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let outcome = scanner.scan_async(ctx, cli.path.clone()).await;
    signal_task.abort();
    if let Some(task) = progress_task {
        task.abort();
    }

    let result = match outcome {
        Ok(result) => result,
        Err(ScanError::Cancelled) => {
            eprintln!("Scan cancelled");
            return Ok(ExitCode::from(EXIT_INTERRUPTED));
        }
        Err(ScanError::DeadlineExceeded) => {
            eprintln!("Scan timed out (directory too large)");
            return Ok(ExitCode::from(EXIT_INTERRUPTED));
        }
        Err(err) => return Err(err).wrap_err("Scan failed"),
    };

    let text = match cli.format {
        OutputFormat::Text => {
            let options = RenderOptions {
                show_size: scanner.config().show_size,
            };
            TreeRenderer::new(options).render(Some(&result.root))
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&result)?;
            json.push('\n');
            json
        }
    };

    let destination = cli.destination(settings.output_dir.as_deref(), &chrono::Local::now());
    match destination {
        Some(path) => {
            save(&path, &text).wrap_err("Failed to save file tree")?;
            eprintln!("File tree saved to {}", path.display());
        }
        None => print!("{text}"),
    }

    eprintln!(
        "Scanned {} items from: {} in {:.2}s",
        result.node_count,
        result.root_path.display(),
        result.scan_duration.as_secs_f64()
    );
    if result.has_warnings() {
        eprintln!("{} warning(s) during scan", result.warnings.len());
    }

    Ok(ExitCode::SUCCESS)
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print progress snapshots to stderr until the scanner goes away.
fn report_progress(mut progress_rx: broadcast::Receiver<ScanProgress>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match progress_rx.recv().await {
                Ok(progress) if progress.finished => break,
                Ok(progress) => eprintln!(
                    "Scanning... {} items ({} dirs), {}",
                    progress.nodes_scanned,
                    progress.dirs_scanned,
                    progress.current_path.display()
                ),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    })
}
