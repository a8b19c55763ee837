//! Desired folder hierarchy in the remote media library.
//!
//! # Design
//! - Two levels only: root folders, each optionally holding product buckets.
//! - A product bucket owns a list of numeric product ids; a product id lives in at
//!   most one bucket so classification stays a function of the file name.
//! - Validation runs before any remote call so a bad layout never creates folders.

use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::defaults::{BANNERS_FOLDER, GENERAL_FOLDER, LOGOS_FOLDER, PRODUCT_IMAGES_FOLDER};
use crate::error::{ConfigError, ConfigResult};

/// Slash-separated path of a folder inside the layout, e.g. `Product Images/Laser`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FolderPath {
    segments: Vec<String>,
}

impl FolderPath {
    /// Path of a root-level folder.
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Path of a child folder beneath `self`.
    #[must_use]
    pub fn join(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// Final segment.
    #[must_use]
    pub fn name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Path of the containing folder, `None` for roots.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        (self.segments.len() > 1).then(|| Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }
}

impl Display for FolderPath {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.segments.join("/"))
    }
}

/// Named bucket of product ids beneath a root folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBucket {
    /// Folder name of the bucket.
    pub name: String,
    /// Numeric product ids routed into this bucket.
    #[serde(default)]
    pub product_ids: Vec<String>,
}

/// Root-level folder with optional product buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootFolder {
    /// Folder name.
    pub name: String,
    /// Subfolders keyed by product id.
    #[serde(default)]
    pub buckets: Vec<ProductBucket>,
}

/// Complete desired hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderLayout {
    /// Root folders in resolution order.
    pub roots: Vec<RootFolder>,
}

impl Default for FolderLayout {
    fn default() -> Self {
        let bucket = |name: &str, ids: &[&str]| ProductBucket {
            name: name.to_string(),
            product_ids: ids.iter().map(|id| (*id).to_string()).collect(),
        };
        let leaf = |name: &str| RootFolder {
            name: name.to_string(),
            buckets: Vec::new(),
        };
        Self {
            roots: vec![
                RootFolder {
                    name: PRODUCT_IMAGES_FOLDER.to_string(),
                    buckets: vec![
                        bucket("Laser", &["10001", "10002", "10003"]),
                        bucket("CNC", &["10004", "10005", "10006"]),
                        bucket("Anodizing", &["10007", "10008"]),
                        bucket("Other", &["10009", "10010"]),
                    ],
                },
                leaf(BANNERS_FOLDER),
                leaf(LOGOS_FOLDER),
                leaf(GENERAL_FOLDER),
            ],
        }
    }
}

impl FolderLayout {
    /// Parse and validate a layout document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed documents and
    /// [`ConfigError::InvalidLayout`] when validation fails.
    pub fn from_json_file(path: &Path) -> ConfigResult<Self> {
        let payload = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let layout: Self = serde_json::from_str(&payload).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        layout.validate()?;
        Ok(layout)
    }

    /// Check names, sibling uniqueness and product id ownership.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLayout`] describing the first violation.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.roots.is_empty() {
            return Err(ConfigError::layout("roots", "must not be empty", None));
        }

        let mut root_names = HashSet::new();
        let mut product_ids = HashSet::new();
        for root in &self.roots {
            validate_name("roots.name", &root.name)?;
            if !root_names.insert(root.name.as_str()) {
                return Err(ConfigError::layout(
                    "roots.name",
                    "duplicate root folder",
                    Some(root.name.clone()),
                ));
            }

            let mut bucket_names = HashSet::new();
            for bucket in &root.buckets {
                validate_name("buckets.name", &bucket.name)?;
                if !bucket_names.insert(bucket.name.as_str()) {
                    return Err(ConfigError::layout(
                        "buckets.name",
                        "duplicate bucket under the same root",
                        Some(format!("{}/{}", root.name, bucket.name)),
                    ));
                }
                for id in &bucket.product_ids {
                    if id.is_empty() || !id.bytes().all(|byte| byte.is_ascii_digit()) {
                        return Err(ConfigError::layout(
                            "buckets.product_ids",
                            "product ids must be ASCII digits",
                            Some(id.clone()),
                        ));
                    }
                    if !product_ids.insert(id.as_str()) {
                        return Err(ConfigError::layout(
                            "buckets.product_ids",
                            "product id assigned to more than one bucket",
                            Some(id.clone()),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Every folder path in resolution order: each root followed by its buckets.
    #[must_use]
    pub fn folder_paths(&self) -> Vec<FolderPath> {
        let mut paths = Vec::new();
        for root in &self.roots {
            let root_path = FolderPath::root(&root.name);
            let buckets: Vec<FolderPath> = root
                .buckets
                .iter()
                .map(|bucket| root_path.join(&bucket.name))
                .collect();
            paths.push(root_path);
            paths.extend(buckets);
        }
        paths
    }

    /// Bucket folder owning `product_id`, if any.
    #[must_use]
    pub fn bucket_for_product(&self, product_id: &str) -> Option<FolderPath> {
        self.roots.iter().find_map(|root| {
            root.buckets
                .iter()
                .find(|bucket| bucket.product_ids.iter().any(|id| id == product_id))
                .map(|bucket| FolderPath::root(&root.name).join(&bucket.name))
        })
    }
}

fn validate_name(field: &'static str, name: &str) -> ConfigResult<()> {
    if name.trim().is_empty() {
        return Err(ConfigError::layout(field, "must not be empty", None));
    }
    if name.contains('/') {
        return Err(ConfigError::layout(
            field,
            "must not contain '/'",
            Some(name.to_string()),
        ));
    }
    Ok(())
}
