//! Issuer normalizer: bring the downloaded bytes into PEM form
//!
//! CA Issuers endpoints usually serve bare DER, occasionally PEM. Both
//! paths must yield a parseable X.509 certificate; bytes that are neither
//! (PKCS#7 bundles, HTML error pages) are a conversion failure.

use ::pem::{EncodeConfig, LineEnding, Pem};
use x509_parser::prelude::*;

use crate::error::BundleError;

const PEM_MARKER: &[u8] = b"-----BEGIN CERTIFICATE-----";

/// Encode DER certificate bytes as one PEM block with LF line endings.
pub(crate) fn certificate_pem(der: &[u8]) -> String {
    let block = Pem::new("CERTIFICATE", der.to_vec());
    ::pem::encode_config(&block, EncodeConfig::new().set_line_ending(LineEnding::LF))
}

fn parse_x509(der: &[u8]) -> Result<(), String> {
    X509Certificate::from_der(der)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Normalize raw issuer bytes to PEM text.
///
/// PEM input is copied verbatim after a parse check, so normalization is
/// the identity transform for already-text bytes. Anything else is assumed
/// to be DER and re-encoded.
pub fn normalize_issuer(raw: &[u8]) -> Result<String, BundleError> {
    if raw.windows(PEM_MARKER.len()).any(|w| w == PEM_MARKER) {
        let text = std::str::from_utf8(raw).map_err(|e| {
            BundleError::Conversion(format!("PEM-marked issuer bytes are not UTF-8: {e}"))
        })?;
        let block = ::pem::parse(text).map_err(|e| {
            BundleError::Conversion(format!("issuer PEM block does not parse: {e}"))
        })?;
        parse_x509(block.contents()).map_err(|e| {
            BundleError::Conversion(format!("issuer PEM is not an X.509 certificate: {e}"))
        })?;
        tracing::debug!("issuer already PEM, copied verbatim");
        return Ok(text.to_string());
    }

    parse_x509(raw).map_err(|e| {
        BundleError::Conversion(format!(
            "issuer bytes are neither PEM nor DER X.509 ({} bytes): {e}",
            raw.len()
        ))
    })?;
    tracing::debug!("issuer was DER, re-encoded as PEM");
    Ok(certificate_pem(raw))
}
