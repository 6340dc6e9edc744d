//! Bundle builder: platform roots plus the fetched issuer
//!
//! The final artifact is plain PEM text so any TLS stack can consume it as
//! a CA file: every platform root certificate first, one blank line, then
//! exactly one issuer certificate block.

use crate::error::BundleError;
use crate::normalize::certificate_pem;

/// Render the platform trust store as concatenated PEM blocks.
///
/// Load errors for individual certificates are logged and skipped, the way
/// the platform store is normally consumed; an empty result is fatal since
/// the bundle would then anchor nothing.
pub fn platform_roots_pem() -> Result<String, BundleError> {
    let loaded = rustls_native_certs::load_native_certs();
    for err in &loaded.errors {
        tracing::warn!(error = %err, "skipping unreadable platform root");
    }
    if loaded.certs.is_empty() {
        return Err(BundleError::Io(std::io::Error::other(
            "platform trust store yielded no root certificates",
        )));
    }

    let mut out = String::new();
    for cert in &loaded.certs {
        out.push_str(&certificate_pem(cert.as_ref()));
    }
    tracing::info!(roots = loaded.certs.len(), "rendered platform root store");
    Ok(out)
}

/// Concatenate the root snapshot and the normalized issuer, separated by a
/// blank line. The roots stay byte-for-byte intact as the bundle's prefix.
pub fn build_bundle(roots_pem: &str, issuer_pem: &str) -> String {
    let mut out = String::with_capacity(roots_pem.len() + issuer_pem.len() + 2);
    out.push_str(roots_pem);
    out.push('\n');
    out.push_str(issuer_pem);
    out.push('\n');
    out
}
