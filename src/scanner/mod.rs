//! Scan coordination.
//!
//! Drives many concurrent port probes over a port range, bounded by a
//! concurrency budget, and aggregates the outcomes into the set of open
//! ports. Progress is reported through an observer so the coordinator
//! has no UI dependency of its own.

pub mod tcp;

pub use tcp::TcpProber;

use crate::types::{Port, PortRange, ScanTarget};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info};

/// Hard ceiling on concurrent probes, bounding socket/file-descriptor
/// usage no matter what the user asks for.
pub const MAX_CONCURRENCY: usize = 648;

/// Default number of concurrent probes.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Outcome of probing a single port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub port: Port,
    pub open: bool,
}

/// A single bounded-time connection attempt against one port.
///
/// Probes are infallible by contract: timeouts, refusals, and transport
/// errors all collapse to "not open". A firewall-dropped packet and a
/// closed port are indistinguishable to a connect-scan.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, port: Port) -> ProbeOutcome;
}

/// Receives one event per aggregated probe outcome.
///
/// `completed` counts monotonically from 1 to `total`; it reaches
/// `total` exactly once, after which `on_finish` fires.
pub trait ProgressObserver: Send + Sync {
    fn on_outcome(&self, completed: usize, total: usize);

    fn on_finish(&self) {}
}

/// Observer that discards all progress events.
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_outcome(&self, _completed: usize, _total: usize) {}
}

/// Tunables for a scan run.
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    concurrency: usize,
}

impl ScanOptions {
    /// Build options with the given concurrency budget, silently clamped
    /// into [1, MAX_CONCURRENCY].
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.clamp(1, MAX_CONCURRENCY),
        }
    }

    /// Effective number of probes allowed in flight at once.
    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

/// Summary of a completed scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub host: String,
    pub ip_address: String,
    pub range: PortRange,
    pub ports_scanned: usize,
    pub open_ports: Vec<Port>,
    pub duration_ms: u64,
}

impl ScanReport {
    /// True when no open port was found in the range.
    pub fn is_clear(&self) -> bool {
        self.open_ports.is_empty()
    }
}

/// Probe every port in `range` and return the sorted set of open ports.
///
/// At most `options.concurrency()` probes are in flight at any moment;
/// a semaphore permit gates each probe, so ranges far larger than the
/// budget never pile up sockets. Outcomes are aggregated by this single
/// consumer in completion order, and the function returns only once
/// every port in the range has produced exactly one outcome.
pub async fn scan<P>(
    prober: Arc<P>,
    range: PortRange,
    options: ScanOptions,
    observer: &dyn ProgressObserver,
) -> Vec<Port>
where
    P: Prober + ?Sized + 'static,
{
    let total = range.len();
    let semaphore = Arc::new(Semaphore::new(options.concurrency()));

    debug!(
        range = %range,
        concurrency = options.concurrency(),
        "dispatching probes"
    );

    let mut outcomes = stream::iter(range.iter())
        .map(|port| {
            let prober = Arc::clone(&prober);
            let sem = Arc::clone(&semaphore);

            async move {
                // Permit held for the probe's whole lifetime; this is
                // what bounds in-flight sockets to the budget.
                let _permit = sem.acquire().await.unwrap();
                prober.probe(port).await
            }
        })
        // Buffer generously; the semaphore controls actual concurrency.
        .buffer_unordered(MAX_CONCURRENCY);

    let mut open = Vec::new();
    let mut completed = 0usize;

    while let Some(outcome) = outcomes.next().await {
        completed += 1;
        if outcome.open {
            open.push(outcome.port);
        }
        observer.on_outcome(completed, total);
    }
    observer.on_finish();

    open.sort_unstable();
    open
}

/// Execute a full scan against a resolved target and build the report.
pub async fn run_scan<P>(
    prober: Arc<P>,
    target: &ScanTarget,
    range: PortRange,
    options: ScanOptions,
    observer: &dyn ProgressObserver,
) -> ScanReport
where
    P: Prober + ?Sized + 'static,
{
    let start = Instant::now();
    let ports_scanned = range.len();

    let open_ports = scan(prober, range, options, observer).await;
    let duration = start.elapsed();

    info!(
        host = %target.host,
        open = open_ports.len(),
        scanned = ports_scanned,
        elapsed_ms = duration.as_millis() as u64,
        "scan complete"
    );

    ScanReport {
        host: target.host.clone(),
        ip_address: target.ip.to_string(),
        range,
        ports_scanned,
        open_ports,
        duration_ms: duration.as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Prober with a scripted set of open ports that tracks how many
    /// probes run at once.
    struct FakeProber {
        open: HashSet<u16>,
        delay: Duration,
        in_flight: AtomicUsize,
        high_water: AtomicUsize,
        probed: Mutex<Vec<u16>>,
    }

    impl FakeProber {
        fn new(open: &[u16], delay: Duration) -> Self {
            Self {
                open: open.iter().copied().collect(),
                delay,
                in_flight: AtomicUsize::new(0),
                high_water: AtomicUsize::new(0),
                probed: Mutex::new(Vec::new()),
            }
        }

        fn high_water(&self) -> usize {
            self.high_water.load(Ordering::SeqCst)
        }

        fn probed(&self) -> Vec<u16> {
            self.probed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Prober for FakeProber {
        async fn probe(&self, port: Port) -> ProbeOutcome {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.high_water.fetch_max(now, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.probed.lock().unwrap().push(port.as_u16());
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            ProbeOutcome {
                port,
                open: self.open.contains(&port.as_u16()),
            }
        }
    }

    /// Observer recording every tick for later inspection.
    #[derive(Default)]
    struct RecordingObserver {
        ticks: Mutex<Vec<(usize, usize)>>,
        finished: AtomicUsize,
    }

    impl ProgressObserver for RecordingObserver {
        fn on_outcome(&self, completed: usize, total: usize) {
            self.ticks.lock().unwrap().push((completed, total));
        }

        fn on_finish(&self) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn range(min: u16, max: u16) -> PortRange {
        PortRange::from_bounds(min, max).unwrap()
    }

    #[test]
    fn test_concurrency_clamped_to_ceiling() {
        assert_eq!(ScanOptions::new(10_000).concurrency(), 648);
        assert_eq!(ScanOptions::new(648).concurrency(), 648);
        assert_eq!(ScanOptions::new(0).concurrency(), 1);
        assert_eq!(ScanOptions::default().concurrency(), 4);
    }

    #[tokio::test]
    async fn test_every_port_probed_exactly_once() {
        let prober = Arc::new(FakeProber::new(&[], Duration::ZERO));
        let open = scan(
            Arc::clone(&prober),
            range(1, 200),
            ScanOptions::new(16),
            &NullObserver,
        )
        .await;

        assert!(open.is_empty());

        let mut probed = prober.probed();
        probed.sort_unstable();
        let expected: Vec<u16> = (1..=200).collect();
        assert_eq!(probed, expected);
    }

    #[tokio::test]
    async fn test_open_set_is_sorted_subset_of_range() {
        // 9999 is outside the range and must never appear
        let prober = Arc::new(FakeProber::new(&[150, 3, 42, 9999], Duration::ZERO));
        let open = scan(
            prober,
            range(1, 200),
            ScanOptions::new(32),
            &NullObserver,
        )
        .await;

        let ports: Vec<u16> = open.iter().map(|p| p.as_u16()).collect();
        assert_eq!(ports, vec![3, 42, 150]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_in_flight_probes_never_exceed_budget() {
        let prober = Arc::new(FakeProber::new(&[], Duration::from_millis(5)));
        scan(
            Arc::clone(&prober),
            range(1, 100),
            ScanOptions::new(8),
            &NullObserver,
        )
        .await;

        assert!(
            prober.high_water() <= 8,
            "high water was {}",
            prober.high_water()
        );
        assert_eq!(prober.probed().len(), 100);
    }

    #[tokio::test]
    async fn test_budget_of_one_serializes_probes() {
        let prober = Arc::new(FakeProber::new(&[], Duration::from_millis(1)));
        scan(
            Arc::clone(&prober),
            range(1, 20),
            ScanOptions::new(1),
            &NullObserver,
        )
        .await;

        assert_eq!(prober.high_water(), 1);
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_complete() {
        let prober = Arc::new(FakeProber::new(&[7], Duration::ZERO));
        let observer = RecordingObserver::default();

        scan(prober, range(1, 50), ScanOptions::new(10), &observer).await;

        let ticks = observer.ticks.lock().unwrap();
        assert_eq!(ticks.len(), 50);
        for (i, &(completed, total)) in ticks.iter().enumerate() {
            assert_eq!(completed, i + 1);
            assert_eq!(total, 50);
        }
        // 100% is reached exactly once, on the final tick
        assert_eq!(ticks.last(), Some(&(50, 50)));
        assert_eq!(observer.finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_scan_builds_report() {
        let prober = Arc::new(FakeProber::new(&[22, 80], Duration::ZERO));
        let target = ScanTarget::new("scanme.local", IpAddr::V4(Ipv4Addr::LOCALHOST));

        let report = run_scan(
            prober,
            &target,
            range(1, 100),
            ScanOptions::default(),
            &NullObserver,
        )
        .await;

        assert_eq!(report.host, "scanme.local");
        assert_eq!(report.ip_address, "127.0.0.1");
        assert_eq!(report.ports_scanned, 100);
        let ports: Vec<u16> = report.open_ports.iter().map(|p| p.as_u16()).collect();
        assert_eq!(ports, vec![22, 80]);
        assert!(!report.is_clear());
    }

    #[tokio::test]
    async fn test_loopback_scan_finds_only_the_listener() {
        // Bind one listener on an ephemeral port, then scan the
        // three-port window around it. Only the listener may show up.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let prober = Arc::new(TcpProber::new(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            Duration::from_millis(500),
        ));

        let open = scan(
            prober,
            range(port - 1, port + 1),
            ScanOptions::new(3),
            &NullObserver,
        )
        .await;

        let ports: Vec<u16> = open.iter().map(|p| p.as_u16()).collect();
        assert_eq!(ports, vec![port]);
    }
}
