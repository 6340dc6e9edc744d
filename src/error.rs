//! Error types for the bundle rebuild pipeline

/// Pipeline error taxonomy. Every variant is fatal: the pipeline is a
/// one-shot batch tool and no stage catches another stage's failure.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("Leaf certificate extraction failed: {0}")]
    Extraction(String),
    #[error("No 'CA Issuers' AIA entry in leaf certificate: {0}")]
    MissingAia(String),
    #[error("Issuer certificate download failed: {0}")]
    Download(String),
    #[error("Issuer certificate conversion failed: {0}")]
    Conversion(String),
    #[error("Bundle verification failed: {0}")]
    VerificationFailed(String),
    #[error("Network operation timed out: {0}")]
    Timeout(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BundleError {
    /// Human-readable name of the pipeline stage a variant belongs to,
    /// surfaced in the final diagnostic so operators know where a run died.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Extraction(_) => "leaf fetch",
            Self::MissingAia(_) => "issuer locate",
            Self::Download(_) => "issuer fetch",
            Self::Conversion(_) => "issuer normalize",
            Self::VerificationFailed(_) => "bundle verify",
            Self::Timeout(_) => "network",
            Self::Io(_) => "artifact io",
        }
    }
}
