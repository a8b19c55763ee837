use std::time::Duration;

use vitrine_cms::CollectionQuery;

use crate::cli::{CollectionArgs, OutputFormat, SingleArgs};
use crate::client::{AppContext, CliResult};
use crate::output::{render_document, render_documents};

pub(crate) async fn handle_collection(
    ctx: &AppContext,
    args: CollectionArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let query = CollectionQuery {
        populate: args.populate,
        sort: args.sort,
        filters: args.filters,
    };
    let entries = ctx
        .cms(Duration::ZERO)
        .fetch_collection(&args.name, &query)
        .await?;
    tracing::debug!(collection = %args.name, entries = entries.len(), "fetched collection");
    render_documents(&entries, format)
}

pub(crate) async fn handle_single(
    ctx: &AppContext,
    args: SingleArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let document = ctx
        .cms(Duration::ZERO)
        .fetch_single_type(&args.name, args.populate.as_deref())
        .await?;
    render_document(document.as_ref(), format)
}
