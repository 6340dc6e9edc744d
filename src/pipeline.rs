//! The five-stage rebuild pipeline
//!
//! Stages run strictly in sequence and hand typed values to each other in
//! memory; every stage also persists its artifact so a failed run can be
//! diagnosed from disk and any stage re-run against the last good input.

use std::path::PathBuf;

use crate::config::BundleConfig;
use crate::error::BundleError;
use crate::workdir::Workdir;
use crate::{aia, bundle, fetch, normalize, tls};

/// Run the whole pipeline and return the absolute path of the verified
/// trust bundle. Any stage failure aborts the run; no partial bundle is
/// considered valid.
pub fn rebuild_bundle(config: &BundleConfig) -> Result<PathBuf, BundleError> {
    let work = Workdir::create(&config.work_dir)?;
    tracing::info!(host = %config.host, port = config.port, "rebuilding trust bundle");

    let leaf = tls::leaf::fetch_leaf_certificate(config)?;
    work.persist(&work.leaf_pem(), leaf.as_bytes())?;

    let issuer_url = aia::locate_issuer_url(&leaf)?;
    tracing::info!(url = %issuer_url, "located CA Issuers URL");

    let raw = fetch::download_issuer(&issuer_url, config.http_timeout, config.min_issuer_len)?;
    work.persist(&work.issuer_raw(), &raw)?;

    let issuer = normalize::normalize_issuer(&raw)?;
    work.persist(&work.issuer_pem(), issuer.as_bytes())?;

    let roots = bundle::platform_roots_pem()?;
    let bundle_text = bundle::build_bundle(&roots, &issuer);
    let bundle_path = work.bundle_pem();
    work.persist(&bundle_path, bundle_text.as_bytes())?;

    tls::verify::verify_with_bundle(config, &bundle_path)?;

    let absolute = std::fs::canonicalize(&bundle_path)?;
    tracing::info!(bundle = %absolute.display(), "bundle verified against target host");
    Ok(absolute)
}
