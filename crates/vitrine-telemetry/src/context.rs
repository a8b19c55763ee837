//! Run-scoped span helpers.
//!
//! # Design
//! - A CLI invocation is one batch run; its span carries the command, trace id and build id.
//! - The guard keeps the span entered until the process finishes the run.

use tracing::{Span, span::Entered};

use crate::init::build_sha;

/// Guard that keeps the run-level span entered for its lifetime.
pub struct RunContextGuard {
    _guard: Entered<'static>,
}

impl RunContextGuard {
    /// Enter the run span for `command`, tagged with the request trace identifier.
    #[must_use]
    pub fn new(command: impl Into<String>, trace_id: impl Into<String>) -> Self {
        let command = command.into();
        let trace_id = trace_id.into();
        let span: &'static Span = Box::leak(Box::new(tracing::info_span!(
            "run",
            command = %command,
            trace_id = %trace_id,
            build_sha = %build_sha(),
            stage = tracing::field::Empty,
        )));
        let guard = span.enter();
        Self { _guard: guard }
    }
}

/// Record the pipeline stage currently executing on the active run span.
pub fn record_stage(stage: &str) {
    Span::current().record("stage", tracing::field::display(stage));
}
