//! TLS connections for the two ends of the pipeline
//!
//! Both stages drive a synchronous rustls handshake over a plain
//! `TcpStream`; the pipeline is strictly sequential, so there is no async
//! runtime involved. `leaf` connects with verification disabled to read the
//! presented chain, `verify` connects trusting only the constructed bundle.

pub mod leaf;
pub mod verify;

use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use rustls::ClientConnection;
use rustls::crypto::CryptoProvider;

use crate::error::BundleError;

pub(crate) fn provider() -> Arc<CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}

/// Failure while connecting or handshaking, before it is mapped onto the
/// stage that owns the connection.
#[derive(Debug)]
pub(crate) enum HandshakeError {
    TimedOut(String),
    /// rustls rejected the peer certificate; carries the verifier's own
    /// diagnostic for the operator.
    Certificate(String),
    Other(String),
}

impl HandshakeError {
    /// Map onto a stage error, sending timeouts to their dedicated variant.
    pub(crate) fn into_stage(self, stage: fn(String) -> BundleError) -> BundleError {
        match self {
            Self::TimedOut(msg) => BundleError::Timeout(msg),
            Self::Certificate(msg) | Self::Other(msg) => stage(msg),
        }
    }
}

/// Open a TCP connection to `host:port` with explicit connect and IO
/// deadlines, trying each resolved address in order.
pub(crate) fn connect_tcp(
    host: &str,
    port: u16,
    connect_timeout: Duration,
    io_timeout: Duration,
) -> Result<TcpStream, HandshakeError> {
    let addrs = (host, port).to_socket_addrs().map_err(|e| {
        HandshakeError::Other(format!("address resolution for {host}:{port} failed: {e}"))
    })?;

    let mut last_err: Option<io::Error> = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, connect_timeout) {
            Ok(stream) => {
                stream
                    .set_read_timeout(Some(io_timeout))
                    .and_then(|()| stream.set_write_timeout(Some(io_timeout)))
                    .map_err(|e| HandshakeError::Other(format!("socket setup failed: {e}")))?;
                tracing::debug!(%addr, "TCP connection established");
                return Ok(stream);
            }
            Err(e) => {
                tracing::debug!(%addr, error = %e, "connect attempt failed");
                last_err = Some(e);
            }
        }
    }

    Err(match last_err {
        Some(e) if e.kind() == io::ErrorKind::TimedOut => {
            HandshakeError::TimedOut(format!("connect to {host}:{port} timed out: {e}"))
        }
        Some(e) => HandshakeError::Other(format!("connect to {host}:{port} failed: {e}")),
        None => HandshakeError::Other(format!("{host}:{port} resolved to no addresses")),
    })
}

/// Drive the handshake to completion. Certificate rejections surface as
/// `HandshakeError::Certificate` with rustls' diagnostic attached.
pub(crate) fn drive_handshake(
    conn: &mut ClientConnection,
    tcp: &mut TcpStream,
) -> Result<(), HandshakeError> {
    while conn.is_handshaking() {
        if let Err(e) = conn.complete_io(tcp) {
            return Err(classify_io_error(e));
        }
    }
    Ok(())
}

fn classify_io_error(e: io::Error) -> HandshakeError {
    match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
            HandshakeError::TimedOut(format!("handshake IO timed out: {e}"))
        }
        io::ErrorKind::InvalidData => {
            // complete_io wraps rustls errors as InvalidData with the
            // original error as source
            match e.get_ref().and_then(|inner| inner.downcast_ref::<rustls::Error>()) {
                Some(rustls::Error::InvalidCertificate(cert_err)) => {
                    HandshakeError::Certificate(format!(
                        "certificate chain rejected: {cert_err:?}"
                    ))
                }
                Some(tls_err) => HandshakeError::Other(format!("TLS failure: {tls_err}")),
                None => HandshakeError::Other(e.to_string()),
            }
        }
        _ => HandshakeError::Other(format!("handshake IO failed: {e}")),
    }
}
