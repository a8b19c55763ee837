use vitrine_media::{Cleanup, CleanupPolicy};
use vitrine_telemetry::record_stage;

use crate::cli::{CleanupArgs, OutputFormat};
use crate::client::{AppContext, CliResult};
use crate::output::render_cleanup_summary;

pub(crate) async fn handle_cleanup(
    ctx: &AppContext,
    args: CleanupArgs,
    format: OutputFormat,
) -> CliResult<()> {
    record_stage("cleanup");
    let policy = if args.delete_unprotected {
        CleanupPolicy::DeleteUnprotected
    } else {
        CleanupPolicy::KeepUnprotected
    };
    let cms = ctx.cms(ctx.pacing.delete);
    let summary = Cleanup::new(&cms, args.input, args.output)
        .with_policy(policy)
        .run()
        .await?;
    render_cleanup_summary(&summary, format)
}
