//! # Scour - A Concurrent TCP Connect Port Scanner
//!
//! Scour resolves a hostname or IP address and probes a configurable
//! port range with a bounded pool of concurrent TCP connection
//! attempts, reporting open ports with their well-known service names.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use scour::scanner::{scan, NullObserver, ScanOptions, TcpProber};
//! use scour::types::PortRange;
//! use std::net::IpAddr;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let target: IpAddr = "192.168.1.1".parse().unwrap();
//!     let prober = Arc::new(TcpProber::new(target, Duration::from_secs(1)));
//!     let range = PortRange::from_bounds(1, 1024).unwrap();
//!
//!     let open = scan(prober, range, ScanOptions::new(64), &NullObserver).await;
//!     for port in open {
//!         println!("{} is open", port);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Validated port, range, and target types
//! - [`scanner`] - The probe contract and the bounded-concurrency coordinator
//! - [`services`] - Static well-known-port to service-name mapping
//! - [`output`] - Report formatting and live progress
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Error types

pub mod cli;
pub mod error;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, CliResult};
pub use scanner::{run_scan, scan, ProbeOutcome, Prober, ScanOptions, ScanReport, TcpProber};
pub use types::{Port, PortRange, ScanTarget};
