//! Scour binary entry point.
//!
//! Flow: parse arguments, resolve the target (failing fast if it does
//! not resolve), scan the configured range with a bounded pool of
//! probes, then print the report.

use anyhow::Result;
use clap::Parser;
use scour::cli::{Cli, OutputFormat};
use scour::output::{self, ProgressReporter};
use scour::scanner::{run_scan, ScanOptions, TcpProber};
use scour::types::ScanTarget;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let range = cli.port_range()?;
    let show_ui = !cli.quiet && cli.output == OutputFormat::Plain;

    if show_ui {
        output::print_banner();
    }

    // Resolution failure aborts here, before any probe is dispatched
    let target = ScanTarget::resolve(&cli.target).await?;

    if show_ui {
        output::print_scan_header(&target.host, &target.ip.to_string(), range.len());
    }

    let prober = Arc::new(TcpProber::new(target.ip, cli.timeout()));
    let options = ScanOptions::new(cli.concurrency);

    let reporter = if show_ui {
        ProgressReporter::new(range.len() as u64)
    } else {
        ProgressReporter::hidden()
    };

    let report = run_scan(prober, &target, range, options, &reporter).await;

    output::print_report(&report, cli.output)?;

    Ok(())
}
