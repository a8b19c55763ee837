//! Seam between the migration stages and the remote media library.

use async_trait::async_trait;

use crate::error::CmsResult;
use crate::models::{FileId, FolderId, RemoteFile, UploadedFile};

/// Media-library operations used by the migration pipeline.
///
/// [`crate::CmsClient`] is the production implementation; stages take
/// `&dyn MediaLibrary` so they can run against an in-memory double.
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// Upload one file's bytes.
    async fn upload_file(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> CmsResult<UploadedFile>;

    /// Delete a stored file.
    async fn delete_file(&self, id: FileId) -> CmsResult<()>;

    /// Look up a folder by name beneath `parent` (or at the root when `None`).
    async fn find_folder(&self, name: &str, parent: Option<FolderId>)
    -> CmsResult<Option<FolderId>>;

    /// Create a folder beneath `parent` (or at the root when `None`).
    async fn create_folder(&self, name: &str, parent: Option<FolderId>) -> CmsResult<FolderId>;

    /// Assign a stored file to a folder.
    async fn move_file(&self, id: FileId, folder: FolderId) -> CmsResult<()>;

    /// List stored files, up to `page_size` entries.
    async fn list_files(&self, page_size: u32) -> CmsResult<Vec<RemoteFile>>;
}
