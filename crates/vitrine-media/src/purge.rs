//! Standalone reset: delete every file stored in the media library.

use serde::Serialize;
use tracing::{info, warn};
use vitrine_cms::MediaLibrary;

use crate::error::{MediaError, MediaResult};

/// Files requested per listing call.
pub const PURGE_PAGE_SIZE: u32 = 1000;

/// Outcome counts for a purge run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurgeSummary {
    /// Files returned by the listing.
    pub listed: usize,
    /// Files deleted.
    pub deleted: usize,
    /// Delete calls that failed.
    pub failed: usize,
}

/// Deletes one page of stored files.
pub struct Purge<'a> {
    library: &'a dyn MediaLibrary,
    page_size: u32,
}

impl<'a> Purge<'a> {
    /// Purge using [`PURGE_PAGE_SIZE`].
    pub fn new(library: &'a dyn MediaLibrary) -> Self {
        Self {
            library,
            page_size: PURGE_PAGE_SIZE,
        }
    }

    /// Override the listing page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// List stored files and delete each one.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Remote`] when the listing fails. Per-file delete
    /// failures are logged and counted.
    pub async fn run(&self) -> MediaResult<PurgeSummary> {
        let files = self
            .library
            .list_files(self.page_size)
            .await
            .map_err(|source| MediaError::Remote {
                operation: "list files",
                source,
            })?;
        let mut summary = PurgeSummary {
            listed: files.len(),
            ..PurgeSummary::default()
        };
        info!(files = files.len(), "purging media library");

        for file in &files {
            match self.library.delete_file(file.id).await {
                Ok(()) => {
                    info!(file = %file.name, id = %file.id, "deleted");
                    summary.deleted += 1;
                }
                Err(error) => {
                    warn!(file = %file.name, id = %file.id, error = %error, "delete failed");
                    summary.failed += 1;
                }
            }
        }

        info!(
            deleted = summary.deleted,
            failed = summary.failed,
            "purge finished"
        );
        Ok(summary)
    }
}
