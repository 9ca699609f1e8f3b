//! Command-line argument definitions.
//!
//! Single-command surface: `scour <target>` with optional tuning flags.
//! Concurrency is clamped by the scanner, not rejected here, so wild
//! values degrade gracefully instead of failing the run.

use crate::scanner::DEFAULT_CONCURRENCY;
use crate::types::{PortError, PortRange};
use clap::Parser;
use std::time::Duration;

/// Scour - a concurrent TCP connect port scanner.
///
/// Resolves a hostname or IP address and probes a port range for open
/// TCP ports, reporting each with its well-known service name.
#[derive(Parser, Debug)]
#[command(name = "scour")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP connect port scanner", long_about = None)]
pub struct Cli {
    /// Target host, IP address, or URL
    ///
    /// A leading "http://" or "https://" and anything after the first
    /// "/" are stripped before resolution.
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Number of concurrent probes (clamped to a maximum of 648)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Lowest port to scan
    #[arg(long, default_value_t = 1, value_name = "PORT")]
    pub min_port: u16,

    /// Highest port to scan
    #[arg(long, default_value_t = 65535, value_name = "PORT")]
    pub max_port: u16,

    /// Per-probe connection timeout in milliseconds
    #[arg(short = 't', long = "timeout", default_value_t = 1000, value_name = "MS")]
    pub timeout_ms: u64,

    /// Output format for results
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Plain)]
    pub output: OutputFormat,

    /// Suppress the banner and live progress
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Cli {
    /// Validate the configured port bounds into a range.
    pub fn port_range(&self) -> Result<PortRange, PortError> {
        PortRange::from_bounds(self.min_port, self.max_port)
    }

    /// Per-probe timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    Plain,
    /// JSON structured output
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
        }
    }
}
