//! Authenticated HTTP plumbing and the media-library calls.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use vitrine_config::CmsEndpoint;

use crate::error::{CmsError, CmsResult, body_excerpt};
use crate::library::MediaLibrary;
use crate::models::{
    CreateFolderRequest, FileId, FolderId, FolderRecord, ItemEnvelope, ListEnvelope,
    MoveFileRequest, RemoteFile, UploadedFile,
};
use crate::pacer::Pacer;

// Relative to the base URL, which always ends in `/`.
pub(crate) const UPLOAD_PATH: &str = "api/upload";
pub(crate) const FILES_PATH: &str = "api/upload/files";
pub(crate) const FOLDERS_PATH: &str = "api/upload/folders";

/// Client for the content API. Cheap to clone.
#[derive(Clone)]
pub struct CmsClient {
    pub(crate) http: Client,
    pub(crate) endpoint: CmsEndpoint,
    pacer: Arc<dyn Pacer>,
}

impl CmsClient {
    /// Build a client around a configured `reqwest` client and a pacer.
    #[must_use]
    pub fn new(endpoint: CmsEndpoint, http: Client, pacer: Arc<dyn Pacer>) -> Self {
        Self {
            http,
            endpoint,
            pacer,
        }
    }

    pub(crate) fn url(&self, path: &str) -> CmsResult<Url> {
        self.endpoint
            .base_url
            .join(path)
            .map_err(|source| CmsError::InvalidPath {
                path: path.to_string(),
                source,
            })
    }

    pub(crate) fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(
            reqwest::header::AUTHORIZATION,
            self.endpoint.token.bearer_header(),
        )
    }

    /// Pace, authorize and send; non-success statuses become errors.
    async fn send(&self, operation: &'static str, request: RequestBuilder) -> CmsResult<Response> {
        self.pacer.pace().await;
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|source| CmsError::transport(operation, source))?;
        ensure_success(operation, response).await
    }
}

async fn ensure_success(operation: &'static str, response: Response) -> CmsResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::FORBIDDEN {
        return Err(CmsError::Forbidden { operation });
    }
    let bytes = response.bytes().await.unwrap_or_default();
    Err(CmsError::Status {
        operation,
        status: status.as_u16(),
        body: body_excerpt(&bytes),
    })
}

async fn decode<T: DeserializeOwned>(operation: &'static str, response: Response) -> CmsResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|source| CmsError::transport(operation, source))?;
    serde_json::from_slice(&bytes).map_err(|source| CmsError::Decode { operation, source })
}

#[async_trait]
impl MediaLibrary for CmsClient {
    async fn upload_file(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> CmsResult<UploadedFile> {
        const OPERATION: &str = "upload file";
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|source| CmsError::transport(OPERATION, source))?;
        let form = Form::new().part("files", part);
        let request = self.http.post(self.url(UPLOAD_PATH)?).multipart(form);

        let response = self.send(OPERATION, request).await?;
        let uploaded: Vec<UploadedFile> = decode(OPERATION, response).await?;
        uploaded
            .into_iter()
            .next()
            .ok_or(CmsError::UnexpectedPayload {
                operation: OPERATION,
                detail: "upload response contained no files",
            })
    }

    async fn delete_file(&self, id: FileId) -> CmsResult<()> {
        let url = self.url(&format!("{FILES_PATH}/{id}"))?;
        self.send("delete file", self.http.delete(url)).await?;
        Ok(())
    }

    async fn find_folder(
        &self,
        name: &str,
        parent: Option<FolderId>,
    ) -> CmsResult<Option<FolderId>> {
        const OPERATION: &str = "search folder";
        let mut url = self.url(FOLDERS_PATH)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("filters[name][$eq]", name);
            match parent {
                Some(parent) => {
                    pairs.append_pair("filters[parent][id][$eq]", &parent.to_string());
                }
                None => {
                    pairs.append_pair("filters[parent][$null]", "true");
                }
            }
        }

        let response = self.send(OPERATION, self.http.get(url)).await?;
        let folders: ListEnvelope<FolderRecord> = decode(OPERATION, response).await?;
        Ok(folders.into_items().first().map(|folder| folder.id))
    }

    async fn create_folder(&self, name: &str, parent: Option<FolderId>) -> CmsResult<FolderId> {
        const OPERATION: &str = "create folder";
        let request = self
            .http
            .post(self.url(FOLDERS_PATH)?)
            .json(&CreateFolderRequest { name, parent });
        let response = self.send(OPERATION, request).await?;
        let created: ItemEnvelope<FolderRecord> = decode(OPERATION, response).await?;
        Ok(created.into_item().id)
    }

    async fn move_file(&self, id: FileId, folder: FolderId) -> CmsResult<()> {
        let url = self.url(&format!("{FILES_PATH}/{id}"))?;
        let request = self.http.put(url).json(&MoveFileRequest { folder });
        self.send("move file", request).await?;
        Ok(())
    }

    async fn list_files(&self, page_size: u32) -> CmsResult<Vec<RemoteFile>> {
        const OPERATION: &str = "list files";
        let mut url = self.url(FILES_PATH)?;
        url.query_pairs_mut()
            .append_pair("pagination[pageSize]", &page_size.to_string());
        let response = self.send(OPERATION, self.http.get(url)).await?;
        let files: ListEnvelope<RemoteFile> = decode(OPERATION, response).await?;
        Ok(files.into_items())
    }
}
