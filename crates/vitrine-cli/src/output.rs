//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use serde::Serialize;
use serde_json::Value;
use vitrine_config::FolderLayout;
use vitrine_media::{CleanupSummary, OrganizeSummary, PurgeSummary, UploadSummary};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const TITLE_FIELDS: [&str; 4] = ["title", "name", "heading", "slug"];

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

fn render_summary<T: Serialize>(
    summary: &T,
    rows: &[(&str, String)],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(summary)?,
        OutputFormat::Table => print!("{}", format_rows(rows)),
    }
    Ok(())
}

pub(crate) fn format_rows(rows: &[(&str, String)]) -> String {
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(label, value)| format!("{label:<width$}  {value}\n"))
        .collect()
}

pub(crate) fn render_upload_summary(summary: &UploadSummary, format: OutputFormat) -> CliResult<()> {
    render_summary(
        summary,
        &[
            ("discovered", summary.discovered.to_string()),
            ("uploaded", summary.uploaded.to_string()),
            ("failed", summary.failed.to_string()),
        ],
        format,
    )
}

pub(crate) fn render_cleanup_summary(
    summary: &CleanupSummary,
    format: OutputFormat,
) -> CliResult<()> {
    render_summary(
        summary,
        &[
            ("total", summary.total.to_string()),
            ("kept", summary.kept.to_string()),
            ("delete attempted", summary.delete_attempted.to_string()),
            ("deleted", summary.deleted.to_string()),
            (
                "kept manifest",
                if summary.manifest_written {
                    "written"
                } else {
                    "unchanged"
                }
                .to_string(),
            ),
        ],
        format,
    )
}

pub(crate) fn render_organize_summary(
    summary: &OrganizeSummary,
    format: OutputFormat,
) -> CliResult<()> {
    render_summary(
        summary,
        &[
            ("folders reused", summary.folders_reused.to_string()),
            ("folders created", summary.folders_created.to_string()),
            ("folder failures", summary.folder_failures.to_string()),
            ("files", summary.files.to_string()),
            ("moved", summary.moved.to_string()),
            ("move failed", summary.move_failed.to_string()),
            ("unresolved", summary.unresolved.to_string()),
        ],
        format,
    )
}

pub(crate) fn render_purge_summary(summary: &PurgeSummary, format: OutputFormat) -> CliResult<()> {
    render_summary(
        summary,
        &[
            ("listed", summary.listed.to_string()),
            ("deleted", summary.deleted.to_string()),
            ("failed", summary.failed.to_string()),
        ],
        format,
    )
}

pub(crate) fn render_documents(entries: &[Value], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(entries)?,
        OutputFormat::Table => {
            println!("{:<10} TITLE", "ID");
            for entry in entries {
                println!("{}", document_row(entry));
            }
        }
    }
    Ok(())
}

pub(crate) fn render_document(document: Option<&Value>, format: OutputFormat) -> CliResult<()> {
    match (document, format) {
        (Some(document), OutputFormat::Json) => print_json(document)?,
        (None, OutputFormat::Json) => println!("null"),
        (Some(document), OutputFormat::Table) => {
            if let Some(fields) = document.as_object() {
                for (key, value) in fields {
                    println!("{key}: {}", compact(value));
                }
            } else {
                println!("{}", compact(document));
            }
        }
        (None, OutputFormat::Table) => println!("(no document)"),
    }
    Ok(())
}

pub(crate) fn render_layout(layout: &FolderLayout, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(layout)?,
        OutputFormat::Table => {
            for line in layout_lines(layout) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

pub(crate) fn layout_lines(layout: &FolderLayout) -> Vec<String> {
    let mut lines = Vec::new();
    for root in &layout.roots {
        lines.push(root.name.clone());
        for bucket in &root.buckets {
            lines.push(format!(
                "{}/{}  [{}]",
                root.name,
                bucket.name,
                bucket.product_ids.join(", ")
            ));
        }
    }
    lines
}

pub(crate) fn document_row(entry: &Value) -> String {
    let id = entry
        .get("documentId")
        .or_else(|| entry.get("id"))
        .map_or_else(|| "-".to_string(), compact);
    let title = TITLE_FIELDS
        .iter()
        .find_map(|field| entry.get(*field).and_then(Value::as_str))
        .unwrap_or("<untitled>");
    format!("{id:<10} {title}")
}

fn compact(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
