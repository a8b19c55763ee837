#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]
//! Logging primitives shared by the Vitrine media tooling.
//!
//! Every batch stage logs per-item outcomes through `tracing`; this crate owns the
//! subscriber installation and the run-level span so the binaries stay thin.

pub mod context;
pub mod init;

pub use context::{RunContextGuard, record_stage};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
