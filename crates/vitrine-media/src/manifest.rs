//! Inter-stage manifests.
//!
//! Each stage writes its output manifest wholesale at the end of a run and treats
//! its input manifest as read-only. Records keep the `fileName`/`id`/`url` keys of
//! the earlier operator scripts so existing manifests stay readable.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use vitrine_cms::FileId;

use crate::error::{MediaError, MediaResult};

/// Default file name of the upload manifest.
pub const UPLOAD_MANIFEST: &str = "uploaded-images.json";
/// Default file name of the cleanup survivors manifest.
pub const KEPT_MANIFEST: &str = "kept-images.json";

/// One successfully uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    /// Base file name as uploaded.
    #[serde(rename = "fileName")]
    pub file_name: String,
    /// Identifier assigned by the media library.
    #[serde(rename = "id", alias = "remoteId")]
    pub remote_id: FileId,
    /// URL returned by the media library.
    #[serde(rename = "url", alias = "remoteUrl")]
    pub remote_url: String,
}

/// Upload record that survived cleanup classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeptRecord(pub UploadRecord);

impl KeptRecord {
    /// Underlying upload record.
    #[must_use]
    pub const fn record(&self) -> &UploadRecord {
        &self.0
    }
}

impl From<UploadRecord> for KeptRecord {
    fn from(record: UploadRecord) -> Self {
        Self(record)
    }
}

impl AsRef<UploadRecord> for UploadRecord {
    fn as_ref(&self) -> &UploadRecord {
        self
    }
}

impl AsRef<UploadRecord> for KeptRecord {
    fn as_ref(&self) -> &UploadRecord {
        &self.0
    }
}

/// Read and validate an upload manifest.
///
/// # Errors
///
/// Returns a [`MediaError`] when the file is unreadable, malformed, or a record
/// violates the schema.
pub fn read_upload_manifest(path: &Path) -> MediaResult<Vec<UploadRecord>> {
    read_records(path)
}

/// Read and validate a cleanup survivors manifest.
///
/// # Errors
///
/// Same as [`read_upload_manifest`].
pub fn read_kept_manifest(path: &Path) -> MediaResult<Vec<KeptRecord>> {
    read_records(path)
}

/// Write an upload manifest, replacing any previous content.
///
/// # Errors
///
/// Returns a [`MediaError`] when encoding or writing fails.
pub fn write_upload_manifest(path: &Path, records: &[UploadRecord]) -> MediaResult<()> {
    write_records(path, records)
}

/// Write a cleanup survivors manifest, replacing any previous content.
///
/// # Errors
///
/// Returns a [`MediaError`] when encoding or writing fails.
pub fn write_kept_manifest(path: &Path, records: &[KeptRecord]) -> MediaResult<()> {
    write_records(path, records)
}

fn read_records<T>(path: &Path) -> MediaResult<Vec<T>>
where
    T: DeserializeOwned + AsRef<UploadRecord>,
{
    let payload = fs::read(path).map_err(|source| MediaError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<T> =
        serde_json::from_slice(&payload).map_err(|source| MediaError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut seen = HashSet::new();
    for (index, record) in records.iter().enumerate() {
        validate_record(record.as_ref())
            .map_err(|reason| MediaError::manifest_invalid(path, index, reason))?;
        if !seen.insert(record.as_ref().remote_id) {
            return Err(MediaError::manifest_invalid(
                path,
                index,
                "duplicate remote id",
            ));
        }
    }
    Ok(records)
}

/// Schema every manifest record must satisfy.
pub(crate) fn validate_record(record: &UploadRecord) -> Result<(), &'static str> {
    validate_file_name(&record.file_name)?;
    if record.remote_id.0 == 0 {
        return Err("remote id must be positive");
    }
    if record.remote_url.trim().is_empty() {
        return Err("remote url is empty");
    }
    Ok(())
}

/// File-name part of the record schema, checkable before anything is uploaded.
pub(crate) fn validate_file_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("file name is empty");
    }
    if name.contains(['/', '\\']) {
        return Err("file name contains a path separator");
    }
    Ok(())
}

fn write_records<T: Serialize>(path: &Path, records: &[T]) -> MediaResult<()> {
    let payload =
        serde_json::to_string_pretty(records).map_err(|source| MediaError::ManifestEncode {
            path: path.to_path_buf(),
            source,
        })?;
    fs::write(path, payload).map_err(|source| MediaError::ManifestWrite {
        path: path.to_path_buf(),
        source,
    })
}
