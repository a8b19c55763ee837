//! Wire DTOs exchanged with the media-library endpoints.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Identifier of a stored media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u64);

/// Identifier of a media-library folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(pub u64);

impl Display for FileId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl Display for FolderId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// First element of an upload response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedFile {
    /// Remote identifier.
    pub id: FileId,
    /// Public URL, possibly relative to the CMS host.
    pub url: String,
}

/// Entry of the media-library file listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFile {
    /// Remote identifier.
    pub id: FileId,
    /// Stored file name.
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FolderRecord {
    pub(crate) id: FolderId,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateFolderRequest<'a> {
    pub(crate) name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) parent: Option<FolderId>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MoveFileRequest {
    pub(crate) folder: FolderId,
}

/// Collection responses arrive either wrapped in `{data: [...]}` or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListEnvelope<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub(crate) fn into_items(self) -> Vec<T> {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Single-entity responses arrive either wrapped in `{data: {...}}` or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ItemEnvelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> ItemEnvelope<T> {
    pub(crate) fn into_item(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}
