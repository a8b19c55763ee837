//! Stage 3: ensure the folder hierarchy exists and file survivors into it.
//!
//! # Design
//!
//! - Every folder is searched by `(name, parent)` before it is created, so a
//!   re-run reuses what the previous run made.
//! - Resolved ids are cached per run; a folder whose parent failed is skipped.
//! - Files with no resolved target are reported as unresolved and left in place.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};
use vitrine_cms::{CmsResult, FolderId, MediaLibrary};
use vitrine_config::{FolderLayout, FolderPath};

use crate::classify::{FolderAssignment, folder_for};
use crate::error::MediaResult;
use crate::manifest::read_kept_manifest;

/// Folder ids resolved for one run, keyed by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderResolution {
    ids: BTreeMap<FolderPath, FolderId>,
    /// Folders found remotely.
    pub reused: usize,
    /// Folders created by this run.
    pub created: usize,
    /// Paths left unresolved, including children of failed parents.
    pub failed: usize,
}

impl FolderResolution {
    /// Resolved id for `path`.
    #[must_use]
    pub fn get(&self, path: &FolderPath) -> Option<FolderId> {
        self.ids.get(path).copied()
    }
}

/// Outcome counts for an organize run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrganizeSummary {
    /// Folders found remotely.
    pub folders_reused: usize,
    /// Folders created.
    pub folders_created: usize,
    /// Folder paths that could not be resolved.
    pub folder_failures: usize,
    /// Records read from the kept manifest.
    pub files: usize,
    /// Files moved into their folder.
    pub moved: usize,
    /// Move calls that failed.
    pub move_failed: usize,
    /// Files with no resolvable target folder.
    pub unresolved: usize,
}

/// Moves kept media into the configured hierarchy.
pub struct Organizer<'a> {
    library: &'a dyn MediaLibrary,
    input: PathBuf,
    layout: FolderLayout,
}

impl<'a> Organizer<'a> {
    /// Build an organizer reading `input` with the default layout.
    pub fn new(library: &'a dyn MediaLibrary, input: impl Into<PathBuf>) -> Self {
        Self {
            library,
            input: input.into(),
            layout: FolderLayout::default(),
        }
    }

    /// Replace the folder layout.
    #[must_use]
    pub fn with_layout(mut self, layout: FolderLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Search-then-create every folder in the layout.
    pub async fn resolve_folders(&self) -> FolderResolution {
        let mut resolution = FolderResolution::default();
        for path in self.layout.folder_paths() {
            let parent = match path.parent() {
                None => None,
                Some(parent) => {
                    if let Some(id) = resolution.get(&parent) {
                        Some(id)
                    } else {
                        warn!(folder = %path, parent = %parent, "skipping folder; parent unresolved");
                        resolution.failed += 1;
                        continue;
                    }
                }
            };

            match self.ensure_folder(path.name(), parent).await {
                Ok((id, created)) => {
                    if created {
                        info!(folder = %path, id = %id, "created folder");
                        resolution.created += 1;
                    } else {
                        info!(folder = %path, id = %id, "reusing folder");
                        resolution.reused += 1;
                    }
                    resolution.ids.insert(path, id);
                }
                Err(error) => {
                    warn!(folder = %path, error = %error, "folder resolution failed");
                    resolution.failed += 1;
                }
            }
        }
        resolution
    }

    async fn ensure_folder(
        &self,
        name: &str,
        parent: Option<FolderId>,
    ) -> CmsResult<(FolderId, bool)> {
        if let Some(id) = self.library.find_folder(name, parent).await? {
            return Ok((id, false));
        }
        let id = self.library.create_folder(name, parent).await?;
        Ok((id, true))
    }

    /// Resolve folders, then move every kept file into its target.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is invalid or the kept manifest is
    /// unreadable or invalid. Both are checked before any remote call.
    pub async fn run(&self) -> MediaResult<OrganizeSummary> {
        self.layout.validate()?;
        let kept = read_kept_manifest(&self.input)?;

        let resolution = self.resolve_folders().await;
        let mut summary = OrganizeSummary {
            folders_reused: resolution.reused,
            folders_created: resolution.created,
            folder_failures: resolution.failed,
            files: kept.len(),
            ..OrganizeSummary::default()
        };

        for entry in &kept {
            let record = entry.record();
            let path = match folder_for(&record.file_name, &self.layout) {
                FolderAssignment::Folder(path) => path,
                FolderAssignment::Unmapped { product_id } => {
                    warn!(
                        file = %record.file_name,
                        product_id = %product_id,
                        "no bucket for product id; leaving file in place"
                    );
                    summary.unresolved += 1;
                    continue;
                }
            };
            let Some(folder) = resolution.get(&path) else {
                warn!(
                    file = %record.file_name,
                    folder = %path,
                    "target folder unavailable; leaving file in place"
                );
                summary.unresolved += 1;
                continue;
            };

            match self.library.move_file(record.remote_id, folder).await {
                Ok(()) => {
                    info!(file = %record.file_name, folder = %path, "moved");
                    summary.moved += 1;
                }
                Err(error) => {
                    warn!(
                        file = %record.file_name,
                        folder = %path,
                        error = %error,
                        "move failed"
                    );
                    summary.move_failed += 1;
                }
            }
        }

        info!(
            moved = summary.moved,
            move_failed = summary.move_failed,
            unresolved = summary.unresolved,
            "organize finished"
        );
        Ok(summary)
    }
}
