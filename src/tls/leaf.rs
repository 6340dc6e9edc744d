//! Leaf fetcher: capture the certificate chain a server presents
//!
//! The target host is by definition not yet trustworthy with the default
//! roots (that is why a bundle is being rebuilt), so this connection runs
//! with a verifier that records nothing and rejects nothing. Trust is
//! evaluated later, by `verify`, against the finished bundle.

use std::sync::Arc;

use rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, ClientConnection, DigitallySignedStruct, SignatureScheme};

use crate::config::BundleConfig;
use crate::error::BundleError;
use crate::normalize::certificate_pem;

/// Accepts any server certificate so the presented chain can be read off
/// the completed handshake. Only the leaf fetcher may use this.
#[derive(Debug)]
struct ChainObserver {
    schemes: Vec<SignatureScheme>,
}

impl ChainObserver {
    fn new(provider: &CryptoProvider) -> Self {
        Self {
            schemes: provider.signature_verification_algorithms.supported_schemes(),
        }
    }
}

impl ServerCertVerifier for ChainObserver {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.schemes.clone()
    }
}

/// Connect to the configured host with SNI and return the first certificate
/// of the presented chain (the leaf) as a single PEM block.
pub fn fetch_leaf_certificate(config: &BundleConfig) -> Result<String, BundleError> {
    let provider = super::provider();
    let observer = Arc::new(ChainObserver::new(&provider));
    let tls_config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| BundleError::Extraction(format!("TLS configuration rejected: {e}")))?
        .dangerous()
        .with_custom_certificate_verifier(observer)
        .with_no_client_auth();

    let server_name = ServerName::try_from(config.host.clone())
        .map_err(|e| BundleError::Extraction(format!("invalid server name {}: {e}", config.host)))?;
    let mut conn = ClientConnection::new(Arc::new(tls_config), server_name)
        .map_err(|e| BundleError::Extraction(format!("TLS client setup failed: {e}")))?;

    let mut tcp = super::connect_tcp(
        &config.host,
        config.port,
        config.connect_timeout,
        config.io_timeout,
    )
    .map_err(|e| e.into_stage(BundleError::Extraction))?;

    super::drive_handshake(&mut conn, &mut tcp)
        .map_err(|e| e.into_stage(BundleError::Extraction))?;

    let chain = conn.peer_certificates().ok_or_else(|| {
        BundleError::Extraction(format!(
            "handshake with {}:{} completed without a certificate chain",
            config.host, config.port
        ))
    })?;
    let leaf = chain.first().ok_or_else(|| {
        BundleError::Extraction(format!(
            "{}:{} presented an empty certificate chain",
            config.host, config.port
        ))
    })?;

    tracing::info!(
        host = %config.host,
        chain_len = chain.len(),
        "extracted leaf certificate from presented chain"
    );
    Ok(certificate_pem(leaf.as_ref()))
}
