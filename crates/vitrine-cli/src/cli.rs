//! Command-line surface for the media migration pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;
use uuid::Uuid;
use vitrine_config::defaults::DEFAULT_API_URL;
use vitrine_media::{KEPT_MANIFEST, UPLOAD_MANIFEST};
use vitrine_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, RunContextGuard, init_logging};

use crate::client::{AppContext, CliDependencies, CliResult, parse_filter, parse_url};
use crate::commands::{
    handle_cleanup, handle_collection, handle_layout, handle_organize, handle_purge,
    handle_single, handle_upload,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_UPLOAD_ROOT: &str = "backend-strapi/public/uploads";

/// Parses CLI arguments, executes the requested command, and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();

    let logging = LoggingConfig {
        level: DEFAULT_LOG_LEVEL,
        format: cli.log_format.map_or_else(LogFormat::infer, LogFormat::from),
        build_sha: option_env!("VITRINE_BUILD_SHA").unwrap_or("dev"),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }
    let _run = RunContextGuard::new(command_name, trace_id.as_str());

    let deps = match CliDependencies::new(cli.timeout, &trace_id) {
        Ok(deps) => deps,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    match dispatch(cli, &deps).await {
        Ok(()) => {
            tracing::debug!(command = command_name, "command completed");
            0
        }
        Err(err) => {
            let message = err.display_message();
            tracing::debug!(command = command_name, error = %message, "command failed");
            eprintln!("error: {message}");
            err.exit_code()
        }
    }
}

pub(crate) async fn dispatch(cli: Cli, deps: &CliDependencies) -> CliResult<()> {
    let Cli {
        api_url,
        token,
        output,
        command,
        ..
    } = cli;
    // Credentials are validated before any stage touches the network.
    let connect = || AppContext::new(deps.http.clone(), &api_url, token.as_deref());

    match command {
        Command::Layout(args) => handle_layout(args, output),
        Command::Upload(args) => handle_upload(&connect()?, args, output).await,
        Command::Cleanup(args) => handle_cleanup(&connect()?, args, output).await,
        Command::Organize(args) => handle_organize(&connect()?, args, output).await,
        Command::Purge(args) => handle_purge(&connect()?, args, output).await,
        Command::Content(ContentCommand::Collection(args)) => {
            handle_collection(&connect()?, args, output).await
        }
        Command::Content(ContentCommand::Single(args)) => {
            handle_single(&connect()?, args, output).await
        }
    }
}

#[derive(Parser)]
#[command(
    name = "vitrine",
    about = "Bulk media migration for a Strapi-style content API"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "STRAPI_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    pub(crate) api_url: Url,
    #[arg(long, global = true, env = "STRAPI_TOKEN", hide_env_values = true)]
    pub(crate) token: Option<String>,
    #[arg(
        long,
        global = true,
        env = "VITRINE_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for summaries and fetched content"
    )]
    pub(crate) output: OutputFormat,
    #[arg(long, global = true, env = "VITRINE_LOG_FORMAT", value_enum)]
    pub(crate) log_format: Option<LogFormatArg>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Upload every image under a local directory and record the remote ids.
    Upload(UploadArgs),
    /// Delete derived thumbnails listed in the upload manifest.
    Cleanup(CleanupArgs),
    /// Create the folder hierarchy and move kept files into it.
    Organize(OrganizeArgs),
    /// Delete every file in the media library.
    Purge(PurgeArgs),
    /// Read collection and single-type documents.
    #[command(subcommand)]
    Content(ContentCommand),
    /// Print the effective folder layout.
    Layout(LayoutArgs),
}

#[derive(Subcommand)]
pub(crate) enum ContentCommand {
    /// Fetch the entries of a collection type.
    Collection(CollectionArgs),
    /// Fetch a single-type document.
    Single(SingleArgs),
}

#[derive(Args)]
pub(crate) struct UploadArgs {
    #[arg(long, default_value = DEFAULT_UPLOAD_ROOT, help = "Directory scanned for images")]
    pub(crate) root: PathBuf,
    #[arg(long, default_value = UPLOAD_MANIFEST, help = "Upload manifest to write")]
    pub(crate) manifest: PathBuf,
}

#[derive(Args)]
pub(crate) struct CleanupArgs {
    #[arg(long, default_value = UPLOAD_MANIFEST, help = "Upload manifest to read")]
    pub(crate) input: PathBuf,
    #[arg(id = "kept", long = "kept", default_value = KEPT_MANIFEST, help = "Kept manifest to write")]
    pub(crate) output: PathBuf,
    #[arg(
        long,
        help = "Also delete files that are neither product images nor logos/banners"
    )]
    pub(crate) delete_unprotected: bool,
}

#[derive(Args)]
pub(crate) struct OrganizeArgs {
    #[arg(long, default_value = KEPT_MANIFEST, help = "Kept manifest to read")]
    pub(crate) input: PathBuf,
    #[arg(long, help = "Folder layout JSON; defaults to the built-in hierarchy")]
    pub(crate) layout: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct PurgeArgs {
    #[arg(long, help = "Confirm deletion of every stored file")]
    pub(crate) yes: bool,
}

#[derive(Args)]
pub(crate) struct CollectionArgs {
    #[arg(help = "Collection API name, e.g. products")]
    pub(crate) name: String,
    #[arg(long, help = "Relations to populate, e.g. *")]
    pub(crate) populate: Option<String>,
    #[arg(long, help = "Sort expression, e.g. publish_date:desc")]
    pub(crate) sort: Option<String>,
    #[arg(
        long = "filter",
        value_parser = parse_filter,
        help = "Equality filter as field=value; dotted fields address relations"
    )]
    pub(crate) filters: Vec<(String, String)>,
}

#[derive(Args)]
pub(crate) struct SingleArgs {
    #[arg(help = "Single-type API name, e.g. homepage")]
    pub(crate) name: String,
    #[arg(long, help = "Relations to populate; defaults to *")]
    pub(crate) populate: Option<String>,
}

#[derive(Args, Default)]
pub(crate) struct LayoutArgs {
    #[arg(long, help = "Folder layout JSON to validate and print")]
    pub(crate) layout: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Upload(_) => "upload",
        Command::Cleanup(_) => "cleanup",
        Command::Organize(_) => "organize",
        Command::Purge(_) => "purge",
        Command::Content(ContentCommand::Collection(_)) => "content_collection",
        Command::Content(ContentCommand::Single(_)) => "content_single",
        Command::Layout(_) => "layout",
    }
}
