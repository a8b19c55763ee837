//! # Design
//!
//! - Only run-level failures are errors: a missing upload root, an unreadable or
//!   invalid manifest, or a listing that cannot be fetched.
//! - Per-item remote failures are logged and counted in stage summaries instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use vitrine_cms::CmsError;
use vitrine_config::ConfigError;

/// Result type for pipeline stages.
pub type MediaResult<T> = Result<T, MediaError>;

/// Fatal pipeline errors.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The local upload root does not exist.
    #[error("upload directory {} does not exist", path.display())]
    UploadRootMissing {
        /// Configured root.
        path: PathBuf,
    },
    /// The local upload root is not a directory.
    #[error("upload path {} is not a directory", path.display())]
    UploadRootNotDirectory {
        /// Configured root.
        path: PathBuf,
    },
    /// Directory traversal failed.
    #[error("failed to scan {}: {source}", path.display())]
    Walk {
        /// Root being scanned.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
    /// A manifest could not be read.
    #[error("failed to read manifest {}: {source}", path.display())]
    ManifestRead {
        /// Manifest path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A manifest was not valid JSON for the record schema.
    #[error("manifest {} is malformed: {source}", path.display())]
    ManifestParse {
        /// Manifest path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// A manifest record violated the schema.
    #[error("manifest {} record {index} is invalid: {reason}", path.display())]
    ManifestInvalid {
        /// Manifest path.
        path: PathBuf,
        /// Zero-based record index.
        index: usize,
        /// Static reason for the rejection.
        reason: &'static str,
    },
    /// A manifest could not be serialized.
    #[error("failed to encode manifest {}: {source}", path.display())]
    ManifestEncode {
        /// Manifest path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// A manifest could not be written.
    #[error("failed to write manifest {}: {source}", path.display())]
    ManifestWrite {
        /// Manifest path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The folder layout failed validation.
    #[error(transparent)]
    Layout(#[from] ConfigError),
    /// A remote call the whole run depends on failed.
    #[error("{operation} failed: {source}")]
    Remote {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying client error.
        source: CmsError,
    },
}

impl MediaError {
    pub(crate) fn manifest_invalid(
        path: impl Into<PathBuf>,
        index: usize,
        reason: &'static str,
    ) -> Self {
        Self::ManifestInvalid {
            path: path.into(),
            index,
            reason,
        }
    }
}
