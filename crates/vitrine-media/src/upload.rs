//! Stage 1: upload every image under a local root and record the remote ids.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use vitrine_cms::MediaLibrary;
use walkdir::WalkDir;

use crate::classify::{content_type_for, is_image_path};
use crate::error::{MediaError, MediaResult};
use crate::manifest::{UploadRecord, validate_file_name, validate_record, write_upload_manifest};

/// Image file discovered beneath the upload root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Absolute (or root-joined) path on disk.
    pub path: PathBuf,
    /// Path relative to the upload root.
    pub relative: PathBuf,
    /// Base file name sent to the media library.
    pub file_name: String,
}

/// Outcome counts for an upload run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    /// Image files found under the root.
    pub discovered: usize,
    /// Files uploaded and recorded in the manifest.
    pub uploaded: usize,
    /// Files skipped after a read or upload failure.
    pub failed: usize,
}

/// Uploads a local tree into the media library.
pub struct Uploader<'a> {
    library: &'a dyn MediaLibrary,
    root: PathBuf,
    manifest_path: PathBuf,
}

impl<'a> Uploader<'a> {
    /// Build an uploader scanning `root` and writing its manifest to `manifest_path`.
    pub fn new(
        library: &'a dyn MediaLibrary,
        root: impl Into<PathBuf>,
        manifest_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            library,
            root: root.into(),
            manifest_path: manifest_path.into(),
        }
    }

    /// Enumerate image files beneath the root, ordered by path.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is missing, not a directory, or cannot be traversed.
    pub fn discover(&self) -> MediaResult<Vec<LocalFile>> {
        self.check_root()?;

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|source| MediaError::Walk {
                path: self.root.clone(),
                source,
            })?;
            if !entry.file_type().is_file() || !is_image_path(entry.path()) {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str() else {
                warn!(path = %entry.path().display(), "skipping file with non UTF-8 name");
                continue;
            };
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or_else(|_| entry.path())
                .to_path_buf();
            files.push(LocalFile {
                path: entry.path().to_path_buf(),
                relative,
                file_name: file_name.to_string(),
            });
        }
        Ok(files)
    }

    /// Upload every discovered file, then write the manifest.
    ///
    /// The manifest is written even when nothing uploaded. Re-running uploads
    /// fresh copies; no existence check precedes an upload.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery fails or the manifest cannot be written.
    /// Per-file failures are logged and counted instead.
    pub async fn run(&self) -> MediaResult<UploadSummary> {
        let files = self.discover()?;
        let mut summary = UploadSummary {
            discovered: files.len(),
            ..UploadSummary::default()
        };
        info!(
            root = %self.root.display(),
            files = files.len(),
            "starting upload"
        );

        let mut records = Vec::with_capacity(files.len());
        for file in &files {
            match self.upload_one(file).await {
                Ok(record) => {
                    info!(
                        file = %file.relative.display(),
                        id = %record.remote_id,
                        url = %record.remote_url,
                        "uploaded"
                    );
                    records.push(record);
                    summary.uploaded += 1;
                }
                Err(error) => {
                    warn!(file = %file.relative.display(), error = %error, "upload failed");
                    summary.failed += 1;
                }
            }
        }

        write_upload_manifest(&self.manifest_path, &records)?;
        info!(
            manifest = %self.manifest_path.display(),
            uploaded = summary.uploaded,
            failed = summary.failed,
            "upload finished"
        );
        Ok(summary)
    }

    async fn upload_one(&self, file: &LocalFile) -> Result<UploadRecord, UploadFailure> {
        validate_file_name(&file.file_name).map_err(UploadFailure::Rejected)?;
        let bytes = tokio::fs::read(&file.path).await.map_err(UploadFailure::Read)?;
        let uploaded = self
            .library
            .upload_file(&file.file_name, content_type_for(&file.path), bytes)
            .await
            .map_err(UploadFailure::Remote)?;
        let record = UploadRecord {
            file_name: file.file_name.clone(),
            remote_id: uploaded.id,
            remote_url: uploaded.url,
        };
        validate_record(&record).map_err(UploadFailure::Rejected)?;
        Ok(record)
    }

    fn check_root(&self) -> MediaResult<()> {
        if !self.root.exists() {
            return Err(MediaError::UploadRootMissing {
                path: self.root.clone(),
            });
        }
        if !self.root.is_dir() {
            return Err(MediaError::UploadRootNotDirectory {
                path: self.root.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
enum UploadFailure {
    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),
    #[error(transparent)]
    Remote(vitrine_cms::CmsError),
    #[error("not recordable in the manifest: {0}")]
    Rejected(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::read_upload_manifest;
    use anyhow::Result;
    use vitrine_test_support::{MemoryLibrary, UploadTree};

    #[test]
    fn discover_filters_and_orders_images() -> Result<()> {
        let tree = UploadTree::new()?;
        tree.add("b/logo_main.PNG", b"png")?;
        tree.add("a/10001_a.jpg", b"jpg")?;
        tree.add("notes.txt", b"txt")?;
        tree.add("a/archive.zip", b"zip")?;
        tree.add("z.webp", b"webp")?;

        let library = MemoryLibrary::new();
        let uploader = Uploader::new(&library, tree.root(), tree.path("m.json"));
        let names: Vec<_> = uploader
            .discover()?
            .into_iter()
            .map(|file| file.relative)
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a/10001_a.jpg"),
                PathBuf::from("b/logo_main.PNG"),
                PathBuf::from("z.webp"),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn missing_root_aborts_without_side_effects() -> Result<()> {
        let tree = UploadTree::new()?;
        let library = MemoryLibrary::new();
        let manifest = tree.path("uploaded-images.json");
        let uploader = Uploader::new(&library, tree.path("absent"), &manifest);

        let result = uploader.run().await;
        assert!(matches!(result, Err(MediaError::UploadRootMissing { .. })));
        assert!(library.uploads().is_empty());
        assert!(!manifest.exists());
        Ok(())
    }

    #[tokio::test]
    async fn root_that_is_a_file_is_rejected() -> Result<()> {
        let tree = UploadTree::new()?;
        let file = tree.add("single.png", b"png")?;
        let library = MemoryLibrary::new();
        let uploader = Uploader::new(&library, file, tree.path("m.json"));
        assert!(matches!(
            uploader.run().await,
            Err(MediaError::UploadRootNotDirectory { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn failed_uploads_are_skipped_and_counted() -> Result<()> {
        let tree = UploadTree::new()?;
        tree.add("10001_a.jpg", b"jpg")?;
        tree.add("broken.png", b"png")?;
        tree.add("logo_main.svg", b"svg")?;

        let library = MemoryLibrary::new();
        library.fail_upload("broken.png");
        let manifest = tree.path("uploaded-images.json");
        let summary = Uploader::new(&library, tree.root(), &manifest)
            .run()
            .await?;

        assert_eq!(
            summary,
            UploadSummary {
                discovered: 3,
                uploaded: 2,
                failed: 1
            }
        );
        let records = read_upload_manifest(&manifest)?;
        let names: Vec<_> = records.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["10001_a.jpg", "logo_main.svg"]);
        assert_eq!(
            library.uploads(),
            vec![
                ("10001_a.jpg".to_string(), "image/jpeg".to_string()),
                ("logo_main.svg".to_string(), "image/svg+xml".to_string()),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn response_without_url_is_not_recorded() -> Result<()> {
        let tree = UploadTree::new()?;
        tree.add("10001_a.jpg", b"jpg")?;
        tree.add("logo_main.png", b"png")?;
        let library = MemoryLibrary::new();
        library.blank_url("logo_main.png");
        let manifest = tree.path("uploaded-images.json");

        let summary = Uploader::new(&library, tree.root(), &manifest)
            .run()
            .await?;

        assert_eq!(summary.uploaded, 1);
        assert_eq!(summary.failed, 1);
        let records = read_upload_manifest(&manifest)?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file_name, "10001_a.jpg");
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn backslash_names_are_skipped_before_upload() -> Result<()> {
        let tree = UploadTree::new()?;
        tree.add("logo\\main.png", b"png")?;
        tree.add("10001_a.jpg", b"jpg")?;
        let library = MemoryLibrary::new();
        let manifest = tree.path("uploaded-images.json");

        let summary = Uploader::new(&library, tree.root(), &manifest)
            .run()
            .await?;

        assert_eq!(
            summary,
            UploadSummary {
                discovered: 2,
                uploaded: 1,
                failed: 1
            }
        );
        assert_eq!(library.file_names(), vec!["10001_a.jpg"]);
        assert_eq!(read_upload_manifest(&manifest)?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn manifest_is_written_when_nothing_uploads() -> Result<()> {
        let tree = UploadTree::new()?;
        tree.add("readme.md", b"text")?;
        let library = MemoryLibrary::new();
        let manifest = tree.path("uploaded-images.json");

        let summary = Uploader::new(&library, tree.root(), &manifest)
            .run()
            .await?;
        assert_eq!(summary.discovered, 0);
        assert!(read_upload_manifest(&manifest)?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn rerun_uploads_duplicates() -> Result<()> {
        let tree = UploadTree::new()?;
        tree.add("10001_a.jpg", b"jpg")?;
        let library = MemoryLibrary::new();
        let uploader = Uploader::new(&library, tree.root(), tree.path("m.json"));

        uploader.run().await?;
        uploader.run().await?;
        assert_eq!(library.file_names(), vec!["10001_a.jpg", "10001_a.jpg"]);
        Ok(())
    }
}
