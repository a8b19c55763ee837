#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::redundant_pub_crate)]

//! Operator CLI for migrating media into a Strapi-style CMS.
//!
//! Layout:
//! - `cli.rs`: argument parsing and command dispatch
//! - `commands/`: command handlers, one per pipeline stage or read surface
//! - `client.rs`: shared HTTP client, context, and error types
//! - `output.rs`: summary renderers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;

pub use cli::run;
