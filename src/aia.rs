//! Issuer locator: pull the CA Issuers URL out of the leaf's AIA extension

use x509_parser::prelude::*;

use crate::error::BundleError;

/// id-ad-caIssuers access method within Authority Information Access.
const ID_AD_CA_ISSUERS: &str = "1.3.6.1.5.5.7.48.2";

/// Parse the leaf certificate and return the first `CA Issuers` URI from
/// its Authority Information Access extension, in extension order.
///
/// Self-signed and root certificates, and some CAs, omit this entry; that
/// is a `MissingAia` failure with no fallback chain discovery.
pub fn locate_issuer_url(leaf_pem: &str) -> Result<String, BundleError> {
    let block = ::pem::parse(leaf_pem)
        .map_err(|e| BundleError::Extraction(format!("leaf artifact is not valid PEM: {e}")))?;
    let (_, cert) = X509Certificate::from_der(block.contents())
        .map_err(|e| BundleError::Extraction(format!("leaf does not parse as X.509: {e}")))?;

    for ext in cert.extensions() {
        if let ParsedExtension::AuthorityInfoAccess(aia) = ext.parsed_extension() {
            for desc in &aia.accessdescs {
                if desc.access_method.to_id_string() == ID_AD_CA_ISSUERS
                    && let GeneralName::URI(uri) = &desc.access_location
                {
                    tracing::debug!(url = %uri, "found CA Issuers access description");
                    return Ok((*uri).to_string());
                }
            }
        }
    }

    Err(BundleError::MissingAia(format!(
        "subject {} carries no CA Issuers URI",
        cert.subject()
    )))
}
