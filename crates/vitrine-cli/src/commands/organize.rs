use vitrine_config::FolderLayout;
use vitrine_media::Organizer;
use vitrine_telemetry::record_stage;

use crate::cli::{OrganizeArgs, OutputFormat};
use crate::client::{AppContext, CliResult};
use crate::output::render_organize_summary;

pub(crate) async fn handle_organize(
    ctx: &AppContext,
    args: OrganizeArgs,
    format: OutputFormat,
) -> CliResult<()> {
    record_stage("organize");
    let layout = match &args.layout {
        Some(path) => FolderLayout::from_json_file(path)?,
        None => FolderLayout::default(),
    };
    let cms = ctx.cms(ctx.pacing.organize);
    let summary = Organizer::new(&cms, args.input)
        .with_layout(layout)
        .run()
        .await?;
    render_organize_summary(&summary, format)
}
