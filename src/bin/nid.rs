//! nid command line tool
//!
//! Queries the wiki for the selected relationship targets, builds one graph,
//! optionally samples it, and writes the D3 document.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `NID_API_URL`, `NID_USER_AGENT`, `NID_TIMEOUT_SECS`, `NID_RATE_LIMIT_MS`,
//!   `NID_CACHE_TTL_SECS`, `NID_CACHE_ENTRIES`, `NID_PAGE_SIZE`: query client
//! - `RUST_LOG`: Log filter, overrides `--verbose` when set
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for terminals (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! nid drops production -o ./out/ -s 500 -v
//! ```
//!
//! `-v` alone logs at debug; `-vv` logs everything.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nid::{build, connect, write_document, ClientConfig, Target, TargetSelection};

#[derive(Parser)]
#[command(name = "nid", version, about = "Generate a D3 graph of item relationships")]
struct Cli {
    /// Relationships to include
    #[arg(value_enum, ignore_case = true)]
    targets: Vec<TargetArg>,

    /// Output file, or a directory to write graph.json into
    #[arg(short, long, default_value = nid::DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Keep a connected sample of this many nodes; non-positive keeps everything
    #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
    sample: i64,

    /// Log level; the bare flag means debug
    #[arg(
        short,
        long,
        value_enum,
        num_args = 0..=1,
        default_value = "warn",
        default_missing_value = "debug"
    )]
    verbose: LogLevel,

    /// Log everything
    #[arg(long = "vv", hide = true)]
    very_verbose: bool,
}

impl Cli {
    fn log_level(&self) -> LogLevel {
        if self.very_verbose {
            LogLevel::Trace
        } else {
            self.verbose
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetArg {
    All,
    Drops,
    Production,
}

impl From<TargetArg> for TargetSelection {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::All => TargetSelection::All,
            TargetArg::Drops => TargetSelection::Only(Target::Drops),
            TargetArg::Production => TargetSelection::Only(Target::Production),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    // `-vv` reads as `-v v`
    #[value(alias = "v")]
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Off => "off",
        }
    }
}

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing(level: LogLevel) {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("nid={}", level.as_str()).into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig::from_env();
    info!(
        api_url = %config.api_url,
        page_size = config.page_size,
        rate_limit = ?config.rate_limit,
        "Starting nid"
    );

    let service = connect(&config).context("failed to create query client")?;

    let selections: Vec<TargetSelection> = cli.targets.into_iter().map(Into::into).collect();
    let graph = build(&service, &selections, config.page_size)
        .await
        .context("failed to build graph")?;

    let stats = graph.stats();
    info!(
        nodes = stats.nodes,
        edges = stats.edges,
        dangling_edges = stats.dangling_edges,
        islands = stats.islands,
        fingerprint = %graph.fingerprint(),
        "Built graph"
    );

    let document = match usize::try_from(cli.sample) {
        Ok(sample_size) if sample_size > 0 => {
            let sampled = graph.sample(sample_size);
            if sampled.num_nodes() < sample_size {
                warn!(
                    requested = sample_size,
                    selected = sampled.num_nodes(),
                    "Sample is smaller than requested"
                );
            }
            sampled.to_d3()
        }
        _ => graph.to_d3(),
    };

    let path = write_document(&cli.output, &document)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!(path = %path.display(), "Done");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level());
    run(cli).await
}
