//! Pipeline configuration

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a single bundle rebuild run.
#[derive(Debug, Clone)]
pub struct BundleConfig {
    /// Target host presenting the incomplete chain
    pub host: String,
    /// TLS port on the target host
    pub port: u16,
    /// Working directory holding the intermediate artifacts
    pub work_dir: PathBuf,
    /// TCP connect timeout for both TLS connections
    pub connect_timeout: Duration,
    /// Socket read/write timeout while driving a handshake
    pub io_timeout: Duration,
    /// Overall timeout for the issuer HTTP GET
    pub http_timeout: Duration,
    /// Smallest body size accepted as a plausible issuer certificate
    pub min_issuer_len: usize,
}

impl BundleConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 443,
            work_dir: PathBuf::from(".cert_work"),
            connect_timeout: Duration::from_secs(10),
            io_timeout: Duration::from_secs(10),
            http_timeout: Duration::from_secs(15),
            min_issuer_len: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_shape() {
        let config = BundleConfig::new("example.com", 8443);
        assert_eq!(config.host, "example.com");
        assert_eq!(config.port, 8443);
        assert_eq!(config.work_dir, PathBuf::from(".cert_work"));
        assert_eq!(config.min_issuer_len, 200);
        assert_eq!(config.http_timeout, Duration::from_secs(15));
    }
}
