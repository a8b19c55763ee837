//! In-memory media library double.
//!
//! Folders are keyed by `(name, parent)` the way the remote service de-facto keys
//! them; `create_folder` does not deduplicate, so a caller that skips the search
//! step produces visible duplicates.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use vitrine_cms::{CmsError, CmsResult, FileId, FolderId, MediaLibrary, RemoteFile, UploadedFile};

/// Folder as stored by [`MemoryLibrary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSnapshot {
    /// Folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder, `None` at the root.
    pub parent: Option<FolderId>,
}

#[derive(Debug, Clone)]
struct StoredFile {
    name: String,
    folder: Option<FolderId>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    files: BTreeMap<FileId, StoredFile>,
    folders: Vec<FolderSnapshot>,
    deleted: Vec<FileId>,
    uploads: Vec<(String, String)>,
    fail_uploads: HashSet<String>,
    blank_urls: HashSet<String>,
    fail_deletes: HashSet<FileId>,
    fail_moves: HashSet<FileId>,
    fail_folders: HashSet<String>,
    fail_listing: bool,
}

impl State {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Thread-safe in-memory implementation of [`MediaLibrary`].
#[derive(Debug, Default)]
pub struct MemoryLibrary {
    state: Mutex<State>,
}

fn injected(operation: &'static str) -> CmsError {
    CmsError::Status {
        operation,
        status: 500,
        body: "injected failure".to_string(),
    }
}

impl MemoryLibrary {
    /// Empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Seed a stored file and return its identifier.
    pub fn seed_file(&self, name: &str) -> FileId {
        let mut state = self.lock();
        let id = FileId(state.allocate());
        state.files.insert(
            id,
            StoredFile {
                name: name.to_string(),
                folder: None,
            },
        );
        id
    }

    /// Seed a folder and return its identifier.
    pub fn seed_folder(&self, name: &str, parent: Option<FolderId>) -> FolderId {
        let mut state = self.lock();
        let id = FolderId(state.allocate());
        state.folders.push(FolderSnapshot {
            id,
            name: name.to_string(),
            parent,
        });
        id
    }

    /// Make uploads of `file_name` fail.
    pub fn fail_upload(&self, file_name: &str) {
        self.lock().fail_uploads.insert(file_name.to_string());
    }

    /// Answer uploads of `file_name` with an empty URL.
    pub fn blank_url(&self, file_name: &str) {
        self.lock().blank_urls.insert(file_name.to_string());
    }

    /// Make deletes of `id` fail.
    pub fn fail_delete(&self, id: FileId) {
        self.lock().fail_deletes.insert(id);
    }

    /// Make moves of `id` fail.
    pub fn fail_move(&self, id: FileId) {
        self.lock().fail_moves.insert(id);
    }

    /// Make every search or create for a folder named `name` fail.
    pub fn fail_folder(&self, name: &str) {
        self.lock().fail_folders.insert(name.to_string());
    }

    /// Make file listing fail.
    pub fn fail_listing(&self) {
        self.lock().fail_listing = true;
    }

    /// All folders, in creation order.
    #[must_use]
    pub fn folders(&self) -> Vec<FolderSnapshot> {
        self.lock().folders.clone()
    }

    /// Identifier of the folder at `path` (segments from the root), if present.
    #[must_use]
    pub fn folder_at(&self, path: &[&str]) -> Option<FolderId> {
        let state = self.lock();
        let mut parent = None;
        for segment in path {
            let found = state
                .folders
                .iter()
                .find(|folder| folder.name == *segment && folder.parent == parent)?;
            parent = Some(found.id);
        }
        parent
    }

    /// Folder currently assigned to `file`.
    #[must_use]
    pub fn folder_of(&self, file: FileId) -> Option<FolderId> {
        self.lock().files.get(&file).and_then(|stored| stored.folder)
    }

    /// Names of stored files, ordered by identifier.
    #[must_use]
    pub fn file_names(&self) -> Vec<String> {
        self.lock()
            .files
            .values()
            .map(|stored| stored.name.clone())
            .collect()
    }

    /// Identifiers deleted so far.
    #[must_use]
    pub fn deleted(&self) -> Vec<FileId> {
        self.lock().deleted.clone()
    }

    /// `(file name, content type)` of every successful upload, in call order.
    #[must_use]
    pub fn uploads(&self) -> Vec<(String, String)> {
        self.lock().uploads.clone()
    }
}

#[async_trait]
impl MediaLibrary for MemoryLibrary {
    async fn upload_file(
        &self,
        file_name: &str,
        content_type: &str,
        _bytes: Vec<u8>,
    ) -> CmsResult<UploadedFile> {
        let mut state = self.lock();
        if state.fail_uploads.contains(file_name) {
            return Err(injected("upload file"));
        }
        let id = FileId(state.allocate());
        state.files.insert(
            id,
            StoredFile {
                name: file_name.to_string(),
                folder: None,
            },
        );
        state
            .uploads
            .push((file_name.to_string(), content_type.to_string()));
        let url = if state.blank_urls.contains(file_name) {
            String::new()
        } else {
            format!("/uploads/{file_name}")
        };
        Ok(UploadedFile { id, url })
    }

    async fn delete_file(&self, id: FileId) -> CmsResult<()> {
        let mut state = self.lock();
        if state.fail_deletes.contains(&id) {
            return Err(injected("delete file"));
        }
        if state.files.remove(&id).is_none() {
            return Err(CmsError::Status {
                operation: "delete file",
                status: 404,
                body: "not found".to_string(),
            });
        }
        state.deleted.push(id);
        Ok(())
    }

    async fn find_folder(
        &self,
        name: &str,
        parent: Option<FolderId>,
    ) -> CmsResult<Option<FolderId>> {
        let state = self.lock();
        if state.fail_folders.contains(name) {
            return Err(injected("search folder"));
        }
        Ok(state
            .folders
            .iter()
            .find(|folder| folder.name == name && folder.parent == parent)
            .map(|folder| folder.id))
    }

    async fn create_folder(&self, name: &str, parent: Option<FolderId>) -> CmsResult<FolderId> {
        let mut state = self.lock();
        if state.fail_folders.contains(name) {
            return Err(injected("create folder"));
        }
        let id = FolderId(state.allocate());
        state.folders.push(FolderSnapshot {
            id,
            name: name.to_string(),
            parent,
        });
        Ok(id)
    }

    async fn move_file(&self, id: FileId, folder: FolderId) -> CmsResult<()> {
        let mut state = self.lock();
        if state.fail_moves.contains(&id) {
            return Err(injected("move file"));
        }
        let stored = state.files.get_mut(&id).ok_or_else(|| CmsError::Status {
            operation: "move file",
            status: 404,
            body: "not found".to_string(),
        })?;
        stored.folder = Some(folder);
        Ok(())
    }

    async fn list_files(&self, page_size: u32) -> CmsResult<Vec<RemoteFile>> {
        let state = self.lock();
        if state.fail_listing {
            return Err(injected("list files"));
        }
        Ok(state
            .files
            .iter()
            .take(usize::try_from(page_size).unwrap_or(usize::MAX))
            .map(|(id, stored)| RemoteFile {
                id: *id,
                name: stored.name.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_folder_does_not_deduplicate() -> anyhow::Result<()> {
        let library = MemoryLibrary::new();
        let first = library.create_folder("Logos", None).await?;
        let second = library.create_folder("Logos", None).await?;
        assert_ne!(first, second);
        assert_eq!(library.folders().len(), 2);
        assert_eq!(library.find_folder("Logos", None).await?, Some(first));
        Ok(())
    }

    #[test]
    fn folder_at_walks_nested_paths() {
        let library = MemoryLibrary::new();
        let root = library.seed_folder("Product Images", None);
        let laser = library.seed_folder("Laser", Some(root));
        assert_eq!(library.folder_at(&["Product Images", "Laser"]), Some(laser));
        assert_eq!(library.folder_at(&["Laser"]), None);
    }

    #[tokio::test]
    async fn injected_failures_surface_as_status_errors() {
        let library = MemoryLibrary::new();
        library.fail_upload("bad.png");
        let result = library.upload_file("bad.png", "image/png", Vec::new()).await;
        assert!(matches!(result, Err(CmsError::Status { status: 500, .. })));
    }
}
