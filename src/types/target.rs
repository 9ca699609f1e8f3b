//! Target cleaning and resolution.
//!
//! Turns user input like "https://example.com/path", "example.com", or
//! "192.168.1.1" into a single resolved IP address:
//! - strips a leading "http://" or "https://" scheme
//! - keeps only the part before the first "/"
//! - parses IP literals directly (IPv4 and IPv6)
//! - otherwise resolves the hostname over DNS and takes the first address

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// A scan target that has been resolved to an IP address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanTarget {
    /// The cleaned input (hostname or IP string, scheme and path removed).
    pub host: String,
    /// The resolved IP address.
    pub ip: IpAddr,
}

impl ScanTarget {
    /// Create a target from an already-resolved address.
    pub fn new(host: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            host: host.into(),
            ip,
        }
    }

    /// Clean and resolve a raw target string.
    ///
    /// IP literals short-circuit resolution; anything else goes through
    /// DNS, first address wins. Fails before any scanning can start if
    /// the host does not resolve.
    pub async fn resolve(input: &str) -> Result<Self, TargetError> {
        let host = clean_host(input);
        if host.is_empty() {
            return Err(TargetError::InvalidFormat(input.to_string()));
        }

        if let Ok(ip) = host.parse::<IpAddr>() {
            debug!(%ip, "target is an IP literal, skipping DNS");
            return Ok(Self::new(host, ip));
        }

        if !is_valid_hostname(&host) {
            return Err(TargetError::InvalidFormat(host));
        }

        let resolver =
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

        let response = resolver
            .lookup_ip(host.as_str())
            .await
            .map_err(|e| TargetError::ResolutionFailed(host.clone(), e.to_string()))?;

        let ip = response
            .iter()
            .next()
            .ok_or_else(|| TargetError::NoAddressesFound(host.clone()))?;

        debug!(%host, %ip, "resolved target");
        Ok(Self::new(host, ip))
    }

    /// Check if this target is IPv6.
    pub fn is_ipv6(&self) -> bool {
        self.ip.is_ipv6()
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host == self.ip.to_string() {
            write!(f, "{}", self.ip)
        } else {
            write!(f, "{} ({})", self.host, self.ip)
        }
    }
}

/// Error type for target cleaning and resolution.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TargetError {
    #[error("invalid target: {0}")]
    InvalidFormat(String),
    #[error("could not resolve host '{0}': {1}")]
    ResolutionFailed(String, String),
    #[error("no IP addresses found for host '{0}'")]
    NoAddressesFound(String),
}

/// Strip a URL scheme and path from a target string, leaving the host.
///
/// "https://example.com/login" becomes "example.com". Input without a
/// scheme or path passes through unchanged.
pub fn clean_host(input: &str) -> String {
    let trimmed = input.trim();
    let without_scheme = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .unwrap_or(trimmed);

    without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme)
        .to_string()
}

/// Check if a string is a plausible hostname.
fn is_valid_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    // Each label must be 1-63 chars, alphanumeric with interior hyphens
    for label in s.split('.') {
        if label.is_empty() || label.len() > 63 {
            return false;
        }
        if !label.chars().next().is_some_and(|c| c.is_alphanumeric()) {
            return false;
        }
        if !label.chars().last().is_some_and(|c| c.is_alphanumeric()) {
            return false;
        }
        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return false;
        }
    }

    true
}
