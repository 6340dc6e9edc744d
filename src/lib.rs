//! # rebundle
//!
//! Rebuilds a usable TLS trust bundle for a single host whose server omits
//! its intermediate certificate. The pipeline fetches the leaf over TLS,
//! follows the AIA `CA Issuers` URL to the issuing certificate, normalizes
//! it to PEM, appends it to the platform root store, and proves the result
//! by re-connecting with the bundle as the sole trust anchor set.
//!
//! All stages are synchronous and strictly ordered; any failure aborts the
//! run with a stage-specific [`BundleError`].

pub mod aia;
pub mod bundle;
pub mod config;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod pipeline;
pub mod tls;
pub mod workdir;

pub use config::BundleConfig;
pub use error::BundleError;
pub use pipeline::rebuild_bundle;
pub use workdir::Workdir;
