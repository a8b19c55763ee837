//! File-name heuristics shared by the pipeline stages.
//!
//! Everything here is a pure function of the name (plus the folder layout for
//! product buckets), so the rules are testable without any I/O.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use vitrine_config::defaults::{BANNERS_FOLDER, GENERAL_FOLDER, LOGOS_FOLDER};
use vitrine_config::{FolderLayout, FolderPath};

/// Extensions the uploader accepts, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// Prefixes of the derived renditions the CMS generates for every upload.
pub const DERIVED_PREFIXES: [&str; 2] = ["thumbnail_", "small_"];

static PRODUCT_PREFIX: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(r"^([0-9]+)_"));

/// Lower-cased extension of `path`, if any.
#[must_use]
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Whether the uploader should pick up `path`.
#[must_use]
pub fn is_image_path(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// MIME type sent with the multipart part for `path`.
#[must_use]
pub fn content_type_for(path: &Path) -> &'static str {
    match extension_of(path).as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Numeric product id prefixing `name` (`10001_front.jpg` → `10001`).
#[must_use]
pub fn product_id(name: &str) -> Option<&str> {
    PRODUCT_PREFIX
        .as_ref()
        .ok()?
        .captures(name)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}

/// How cleanup treats names that match no protection rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CleanupPolicy {
    /// Keep them; only derived renditions are deleted.
    #[default]
    KeepUnprotected,
    /// Delete them as well.
    DeleteUnprotected,
}

/// Rule that decided a cleanup verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupReason {
    /// `thumbnail_` rendition.
    ThumbnailRendition,
    /// `small_` rendition.
    SmallRendition,
    /// Product-numbered image.
    ProductImage,
    /// Logo or banner artwork.
    BrandAsset,
    /// Matched no rule.
    Unprotected,
}

impl CleanupReason {
    /// Stable label for logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ThumbnailRendition => "thumbnail_rendition",
            Self::SmallRendition => "small_rendition",
            Self::ProductImage => "product_image",
            Self::BrandAsset => "brand_asset",
            Self::Unprotected => "unprotected",
        }
    }
}

/// Cleanup decision for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupVerdict {
    /// Delete the remote file.
    Delete(CleanupReason),
    /// Keep the remote file.
    Keep(CleanupReason),
}

impl CleanupVerdict {
    /// Whether the verdict deletes.
    #[must_use]
    pub const fn is_delete(self) -> bool {
        matches!(self, Self::Delete(_))
    }

    /// Rule behind the verdict.
    #[must_use]
    pub const fn reason(self) -> CleanupReason {
        match self {
            Self::Delete(reason) | Self::Keep(reason) => reason,
        }
    }
}

/// Classify `name` for cleanup. Rules apply in order; the first match wins.
#[must_use]
pub fn cleanup_verdict(name: &str, policy: CleanupPolicy) -> CleanupVerdict {
    if name.starts_with(DERIVED_PREFIXES[0]) {
        return CleanupVerdict::Delete(CleanupReason::ThumbnailRendition);
    }
    if name.starts_with(DERIVED_PREFIXES[1]) {
        return CleanupVerdict::Delete(CleanupReason::SmallRendition);
    }
    if product_id(name).is_some() {
        return CleanupVerdict::Keep(CleanupReason::ProductImage);
    }
    if name.contains("logo") || name.contains("banner") {
        return CleanupVerdict::Keep(CleanupReason::BrandAsset);
    }
    match policy {
        CleanupPolicy::KeepUnprotected => CleanupVerdict::Keep(CleanupReason::Unprotected),
        CleanupPolicy::DeleteUnprotected => CleanupVerdict::Delete(CleanupReason::Unprotected),
    }
}

/// Target of a file in the organised library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderAssignment {
    /// File belongs in this folder.
    Folder(FolderPath),
    /// Product-numbered file whose id is in no bucket; left where it is.
    Unmapped {
        /// The unmatched product id.
        product_id: String,
    },
}

/// Folder for `name`: logos, then banners, then product buckets, then general.
#[must_use]
pub fn folder_for(name: &str, layout: &FolderLayout) -> FolderAssignment {
    if name.contains("logo") {
        return FolderAssignment::Folder(FolderPath::root(LOGOS_FOLDER));
    }
    if name.contains("banner") {
        return FolderAssignment::Folder(FolderPath::root(BANNERS_FOLDER));
    }
    if let Some(id) = product_id(name) {
        return layout.bucket_for_product(id).map_or_else(
            || FolderAssignment::Unmapped {
                product_id: id.to_string(),
            },
            FolderAssignment::Folder,
        );
    }
    FolderAssignment::Folder(FolderPath::root(GENERAL_FOLDER))
}
