//! Temporary directory fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

/// Scratch workspace holding an upload root and room for manifests.
pub struct UploadTree {
    dir: TempDir,
}

impl UploadTree {
    /// Create an empty tree with an `uploads/` root.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("uploads"))?;
        Ok(Self { dir })
    }

    /// Directory the uploader should scan.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    /// Path beside the upload root, used for manifests.
    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `contents` to `relative` beneath the upload root, creating parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn add(&self, relative: impl AsRef<Path>, contents: &[u8]) -> Result<PathBuf> {
        let target = self.root().join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, contents)?;
        Ok(target)
    }
}
