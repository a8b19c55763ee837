#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]

//! Shared test helpers used across unit and integration suites.
//! Layout: fixtures.rs (temporary upload trees), library.rs (in-memory media library).

pub mod fixtures;
pub mod library;

pub use fixtures::UploadTree;
pub use library::{FolderSnapshot, MemoryLibrary};
