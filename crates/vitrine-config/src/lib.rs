#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
//! Typed configuration for the media migration tooling.
//!
//! Layout:
//! - `model.rs`: endpoint and pacing settings
//! - `token.rs`: validated bearer credential
//! - `layout.rs`: remote folder hierarchy and product buckets
//! - `defaults.rs`: constants carried over from the operator scripts
//! - `error.rs`: configuration error type

pub mod defaults;
pub mod error;
pub mod layout;
pub mod model;
pub mod token;

pub use error::{ConfigError, ConfigResult};
pub use layout::{FolderLayout, FolderPath, ProductBucket, RootFolder};
pub use model::{CmsEndpoint, PacingConfig};
pub use token::ApiToken;
