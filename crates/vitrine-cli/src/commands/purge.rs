use vitrine_media::Purge;
use vitrine_telemetry::record_stage;

use crate::cli::{OutputFormat, PurgeArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_purge_summary;

pub(crate) async fn handle_purge(
    ctx: &AppContext,
    args: PurgeArgs,
    format: OutputFormat,
) -> CliResult<()> {
    if !args.yes {
        return Err(CliError::validation(
            "purge deletes every file in the media library; re-run with --yes to confirm",
        ));
    }
    record_stage("purge");
    let cms = ctx.cms(ctx.pacing.purge);
    let summary = Purge::new(&cms).run().await?;
    render_purge_summary(&summary, format)
}
