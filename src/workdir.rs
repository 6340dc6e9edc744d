//! Working directory and artifact persistence
//!
//! Every stage persists its output before the next stage runs, so a failed
//! run leaves the last good artifact on disk for inspection. Artifacts are
//! written once per run and never mutated afterward.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BundleError;

/// The artifact directory for one rebuild run.
#[derive(Debug, Clone)]
pub struct Workdir {
    dir: PathBuf,
}

impl Workdir {
    /// Create the working directory if it does not exist yet. Existing
    /// artifacts from prior runs are left in place and overwritten stage by
    /// stage.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, BundleError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Leaf certificate as presented by the server, PEM text.
    pub fn leaf_pem(&self) -> PathBuf {
        self.dir.join("leaf.pem")
    }

    /// Raw issuer bytes exactly as downloaded, encoding unknown.
    pub fn issuer_raw(&self) -> PathBuf {
        self.dir.join("issuer.bin")
    }

    /// Issuer certificate after normalization, PEM text.
    pub fn issuer_pem(&self) -> PathBuf {
        self.dir.join("issuer.pem")
    }

    /// Final trust bundle, the durable output of a run.
    pub fn bundle_pem(&self) -> PathBuf {
        self.dir.join("bundle-with-intermediate.pem")
    }

    /// Persist one artifact, overwriting any prior run's copy.
    pub fn persist(&self, path: &Path, bytes: &[u8]) -> Result<(), BundleError> {
        fs::write(path, bytes)?;
        tracing::debug!(path = %path.display(), len = bytes.len(), "persisted artifact");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_paths_live_under_the_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let work = Workdir::create(tmp.path().join("work")).expect("create workdir");
        for path in [
            work.leaf_pem(),
            work.issuer_raw(),
            work.issuer_pem(),
            work.bundle_pem(),
        ] {
            assert!(path.starts_with(tmp.path().join("work")));
        }
        assert!(tmp.path().join("work").is_dir());
    }

    #[test]
    fn persist_overwrites_prior_artifact() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let work = Workdir::create(tmp.path()).expect("create workdir");
        let path = work.leaf_pem();
        work.persist(&path, b"first").expect("first write");
        work.persist(&path, b"second").expect("second write");
        assert_eq!(fs::read(&path).expect("read back"), b"second");
    }
}
