//! TCP connect prober.
//!
//! Determines port openness by completing a full TCP handshake through
//! the operating system's socket API. No data is exchanged; the
//! connection is dropped as soon as it is established. Requires no
//! elevated privileges.

use crate::scanner::{ProbeOutcome, Prober};
use crate::types::Port;
use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Probes ports on a single target with a fixed per-connection timeout.
///
/// Each probe opens exactly one socket and releases it on every exit
/// path; the stream is dropped immediately on success, and failed
/// connects never hand a descriptor back to the caller.
pub struct TcpProber {
    target: IpAddr,
    timeout: Duration,
}

impl TcpProber {
    /// Create a prober for the given target address.
    pub fn new(target: IpAddr, timeout: Duration) -> Self {
        Self { target, timeout }
    }

    /// Target IP address this prober connects to.
    pub fn target(&self) -> IpAddr {
        self.target
    }

    /// Per-probe connection timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn attempt_connect(&self, addr: SocketAddr) -> bool {
        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                // Pure connect-scan: establishment alone proves openness
                drop(stream);
                true
            }
            Ok(Err(e)) => {
                trace!(%addr, error = %e, "connect failed");
                false
            }
            Err(_) => {
                trace!(%addr, "connect timed out");
                false
            }
        }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, port: Port) -> ProbeOutcome {
        let addr = SocketAddr::new(self.target, port.as_u16());
        let open = self.attempt_connect(addr).await;

        ProbeOutcome { port, open }
    }
}
