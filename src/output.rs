//! Output formatting and live progress.
//!
//! Produces the human-readable report with colors, the JSON report, and
//! the indicatif progress bar that observes the scan as it runs.

use crate::cli::OutputFormat;
use crate::error::CliResult;
use crate::scanner::{ProgressObserver, ScanReport};
use crate::services;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, Write};

const BANNER: &str = r"
  ___  ___ ___  _   _ _ __
 / __|/ __/ _ \| | | | '__|
 \__ \ (_| (_) | |_| | |
 |___/\___\___/ \__,_|_|
";

/// Print the startup banner.
pub fn print_banner() {
    println!("{}", style(BANNER).cyan());
    println!(
        "  {} v{}\n",
        style("scour").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
}

/// Print the resolved target line before scanning begins.
pub fn print_scan_header(host: &str, ip: &str, ports: usize) {
    println!(
        "{} IP address for {}: {}",
        style("•").dim(),
        style(host).white().bold(),
        style(ip).yellow()
    );
    println!(
        "{} Scanning {} ports...",
        style("•").dim(),
        style(ports).white().bold()
    );
    println!();
}

/// Print an error message to stderr.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Live progress bar driven by the scan coordinator.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a visible progress bar sized to the scan.
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
                .unwrap()
                .progress_chars("=>-"),
        );
        Self { bar }
    }

    /// Create a reporter that renders nothing (quiet mode, JSON output).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl ProgressObserver for ProgressReporter {
    fn on_outcome(&self, completed: usize, _total: usize) {
        self.bar.set_position(completed as u64);
    }

    fn on_finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Format and print a completed scan report.
pub fn print_report(report: &ScanReport, format: OutputFormat) -> CliResult<()> {
    let stdout = io::stdout();
    let out = stdout.lock();

    match format {
        OutputFormat::Plain => write_plain(out, report)?,
        OutputFormat::Json => write_json(out, report)?,
    }
    Ok(())
}

/// Write the report in human-readable plain text.
fn write_plain<W: Write>(mut out: W, report: &ScanReport) -> io::Result<()> {
    writeln!(
        out,
        "{} ports scanned on {} in {:.2}s",
        report.ports_scanned,
        report.ip_address,
        report.duration_ms as f64 / 1000.0
    )?;
    writeln!(out)?;

    if report.is_clear() {
        writeln!(out, "{}", style("No open ports found.").dim())?;
        return Ok(());
    }

    writeln!(out, "{}", style("Open ports:").bold())?;
    for port in &report.open_ports {
        writeln!(
            out,
            "  {:>5}/tcp  {}  {}",
            style(port).green().bold(),
            style("open").green(),
            services::name_for(port.as_u16())
        )?;
    }

    Ok(())
}

/// Serializable view of the report with service names attached.
#[derive(Serialize)]
struct JsonReport<'a> {
    host: &'a str,
    ip_address: &'a str,
    ports_scanned: usize,
    duration_ms: u64,
    open_ports: Vec<JsonPort>,
}

#[derive(Serialize)]
struct JsonPort {
    port: u16,
    service: &'static str,
}

/// Write the report as pretty JSON.
fn write_json<W: Write>(mut out: W, report: &ScanReport) -> CliResult<()> {
    let view = JsonReport {
        host: &report.host,
        ip_address: &report.ip_address,
        ports_scanned: report.ports_scanned,
        duration_ms: report.duration_ms,
        open_ports: report
            .open_ports
            .iter()
            .map(|p| JsonPort {
                port: p.as_u16(),
                service: services::name_for(p.as_u16()),
            })
            .collect(),
    };

    serde_json::to_writer_pretty(&mut out, &view)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Port, PortRange};

    fn sample_report(open: &[u16]) -> ScanReport {
        ScanReport {
            host: "example.com".to_string(),
            ip_address: "93.184.216.34".to_string(),
            range: PortRange::from_bounds(1, 1000).unwrap(),
            ports_scanned: 1000,
            open_ports: open.iter().map(|&p| Port::new_unchecked(p)).collect(),
            duration_ms: 1234,
        }
    }

    #[test]
    fn test_write_json_includes_service_names() {
        let report = sample_report(&[22, 12345]);
        let mut buf = Vec::new();
        write_json(&mut buf, &report).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["ip_address"], "93.184.216.34");
        assert_eq!(json["open_ports"][0]["port"], 22);
        assert_eq!(json["open_ports"][0]["service"], "ssh");
        assert_eq!(json["open_ports"][1]["service"], "Unknown");
    }

    #[test]
    fn test_write_plain_lists_open_ports() {
        let report = sample_report(&[22, 80]);
        let mut buf = Vec::new();
        write_plain(&mut buf, &report).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("22/tcp"));
        assert!(text.contains("ssh"));
        assert!(text.contains("http"));
        assert!(!text.contains("No open ports found"));
    }

    #[test]
    fn test_write_plain_reports_clear_scan() {
        let report = sample_report(&[]);
        let mut buf = Vec::new();
        write_plain(&mut buf, &report).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("No open ports found."));
    }

    #[test]
    fn test_progress_reporter_tracks_position() {
        let reporter = ProgressReporter::hidden();
        reporter.on_outcome(1, 10);
        reporter.on_outcome(2, 10);
        assert_eq!(reporter.bar.position(), 2);
        reporter.on_finish();
        assert!(reporter.bar.is_finished());
    }
}
