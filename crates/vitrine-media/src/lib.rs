#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
//! Media-library migration pipeline.
//!
//! Stages run strictly in order, each persisting a JSON manifest for the next:
//!
//! 1. [`upload::Uploader`] scans a local tree and uploads every image.
//! 2. [`cleanup::Cleanup`] deletes CMS-derived thumbnails and records survivors.
//! 3. [`organize::Organizer`] ensures the folder hierarchy and files survivors into it.
//!
//! [`purge::Purge`] is a standalone reset that deletes every stored file.
//! Classification rules live in [`classify`] as pure functions of the file name.

pub mod classify;
pub mod cleanup;
pub mod error;
pub mod manifest;
pub mod organize;
pub mod purge;
pub mod upload;

pub use classify::{CleanupPolicy, CleanupReason, CleanupVerdict, FolderAssignment};
pub use cleanup::{Cleanup, CleanupPlan, CleanupSummary};
pub use error::{MediaError, MediaResult};
pub use manifest::{KEPT_MANIFEST, KeptRecord, UPLOAD_MANIFEST, UploadRecord};
pub use organize::{FolderResolution, OrganizeSummary, Organizer};
pub use purge::{PURGE_PAGE_SIZE, Purge, PurgeSummary};
pub use upload::{LocalFile, UploadSummary, Uploader};
