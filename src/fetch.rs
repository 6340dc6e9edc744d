//! Issuer fetcher: download the bytes behind the CA Issuers URL
//!
//! AIA endpoints are static CA infrastructure, so there is no retry here:
//! a failed GET fails the run. Redirects are followed with a small bound
//! and the whole request runs under one deadline.

use std::time::Duration;

use url::Url;

use crate::error::BundleError;

const REDIRECT_LIMIT: usize = 5;
const USER_AGENT: &str = concat!("rebundle/", env!("CARGO_PKG_VERSION"));

/// GET the issuer URL and return the exact response body bytes.
///
/// Bodies below `min_len` are rejected as implausible; empty responses and
/// tiny error pages otherwise masquerade as certificates until the
/// normalizer chokes on them.
pub fn download_issuer(
    issuer_url: &str,
    timeout: Duration,
    min_len: usize,
) -> Result<Vec<u8>, BundleError> {
    let parsed = Url::parse(issuer_url)
        .map_err(|e| BundleError::Download(format!("invalid issuer URL {issuer_url}: {e}")))?;
    tracing::info!(url = %parsed, "downloading issuer certificate");

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(REDIRECT_LIMIT))
        .timeout(timeout)
        .build()
        .map_err(|e| BundleError::Download(format!("HTTP client construction failed: {e}")))?;

    let response = client
        .get(parsed)
        .send()
        .map_err(|e| classify(issuer_url, e))?;
    let status = response.status();
    if !status.is_success() {
        return Err(BundleError::Download(format!("GET {issuer_url}: HTTP {status}")));
    }

    let body = response.bytes().map_err(|e| classify(issuer_url, e))?;
    if body.len() < min_len {
        return Err(BundleError::Download(format!(
            "GET {issuer_url}: {} byte response is too small to be a certificate",
            body.len()
        )));
    }
    tracing::debug!(len = body.len(), "issuer bytes downloaded");
    Ok(body.to_vec())
}

fn classify(issuer_url: &str, e: reqwest::Error) -> BundleError {
    if e.is_timeout() {
        BundleError::Timeout(format!("GET {issuer_url}: {e}"))
    } else {
        BundleError::Download(format!("GET {issuer_url}: {e}"))
    }
}
