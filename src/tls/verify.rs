//! Bundle verifier: prove the constructed bundle trusts the target host
//!
//! Re-connects to the host with the bundle file as the sole trust anchor
//! set. A completed handshake means rustls accepted the presented chain
//! against those anchors; any rejection carries rustls' own diagnostic so
//! the operator sees why the chain still does not verify.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, ClientConnection, RootCertStore};

use crate::config::BundleConfig;
use crate::error::BundleError;

use super::HandshakeError;

/// Load every certificate in the bundle file into a fresh root store.
fn trust_anchors_from_bundle(bundle_path: &Path) -> Result<RootCertStore, BundleError> {
    let file = File::open(bundle_path)?;
    let mut reader = BufReader::new(file);
    let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut reader)
        .collect::<Result<_, _>>()
        .map_err(|e| {
            BundleError::VerificationFailed(format!(
                "bundle {} is not readable as PEM certificates: {e}",
                bundle_path.display()
            ))
        })?;

    let mut roots = RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(certs);
    if added == 0 {
        return Err(BundleError::VerificationFailed(format!(
            "bundle {} contains no usable trust anchors",
            bundle_path.display()
        )));
    }
    tracing::debug!(added, ignored, "loaded trust anchors from bundle");
    Ok(roots)
}

/// Re-establish a TLS connection to the target, trusting only the bundle.
pub fn verify_with_bundle(config: &BundleConfig, bundle_path: &Path) -> Result<(), BundleError> {
    let roots = trust_anchors_from_bundle(bundle_path)?;
    let tls_config = ClientConfig::builder_with_provider(super::provider())
        .with_safe_default_protocol_versions()
        .map_err(|e| BundleError::VerificationFailed(format!("TLS configuration rejected: {e}")))?
        .with_root_certificates(roots)
        .with_no_client_auth();

    let server_name = ServerName::try_from(config.host.clone()).map_err(|e| {
        BundleError::VerificationFailed(format!("invalid server name {}: {e}", config.host))
    })?;
    let mut conn = ClientConnection::new(Arc::new(tls_config), server_name)
        .map_err(|e| BundleError::VerificationFailed(format!("TLS client setup failed: {e}")))?;

    let mut tcp = super::connect_tcp(
        &config.host,
        config.port,
        config.connect_timeout,
        config.io_timeout,
    )
    .map_err(|e| e.into_stage(BundleError::VerificationFailed))?;

    match super::drive_handshake(&mut conn, &mut tcp) {
        Ok(()) => {
            tracing::info!(
                host = %config.host,
                bundle = %bundle_path.display(),
                "handshake verified against constructed bundle"
            );
            Ok(())
        }
        Err(HandshakeError::TimedOut(msg)) => Err(BundleError::Timeout(msg)),
        Err(HandshakeError::Certificate(diag)) => Err(BundleError::VerificationFailed(format!(
            "{}:{} does not verify with the constructed bundle: {diag}",
            config.host, config.port
        ))),
        Err(HandshakeError::Other(msg)) => Err(BundleError::VerificationFailed(msg)),
    }
}
