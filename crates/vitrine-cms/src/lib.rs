#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
//! HTTP client for the headless CMS content and media-library endpoints.
//!
//! Layout:
//! - `client.rs`: authenticated request plumbing and the media-library calls
//! - `content.rs`: read-only collection and single-type fetches
//! - `library.rs`: the `MediaLibrary` seam the migration stages depend on
//! - `pacer.rs`: request pacing injected into the client
//! - `models.rs`: wire DTOs
//! - `error.rs`: client error type

pub mod client;
pub mod content;
pub mod error;
pub mod library;
pub mod models;
pub mod pacer;

pub use client::CmsClient;
pub use content::CollectionQuery;
pub use error::{CmsError, CmsResult};
pub use library::MediaLibrary;
pub use models::{FileId, FolderId, RemoteFile, UploadedFile};
pub use pacer::{IntervalPacer, Pacer, Unpaced};
