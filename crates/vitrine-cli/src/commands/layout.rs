use vitrine_config::FolderLayout;

use crate::cli::{LayoutArgs, OutputFormat};
use crate::client::CliResult;
use crate::output::render_layout;

pub(crate) fn handle_layout(args: LayoutArgs, format: OutputFormat) -> CliResult<()> {
    let layout = match args.layout {
        Some(path) => FolderLayout::from_json_file(&path)?,
        None => FolderLayout::default(),
    };
    render_layout(&layout, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use serde_json::json;
    use std::fs;

    #[test]
    fn default_layout_renders() {
        assert!(handle_layout(LayoutArgs::default(), OutputFormat::Table).is_ok());
    }

    #[test]
    fn layout_file_is_validated() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("layout.json");
        fs::write(
            &path,
            json!({"roots": [
                {"name": "Products", "buckets": [{"name": "A", "product_ids": ["1"]}]},
                {"name": "Spares", "buckets": [{"name": "B", "product_ids": ["1"]}]}
            ]})
            .to_string(),
        )?;

        let err = handle_layout(
            LayoutArgs {
                layout: Some(path.clone()),
            },
            OutputFormat::Json,
        )
        .err()
        .ok_or_else(|| anyhow!("duplicate product id accepted"))?;
        assert_eq!(err.exit_code(), 2);

        fs::write(&path, json!({"roots": [{"name": "General"}]}).to_string())?;
        handle_layout(LayoutArgs { layout: Some(path) }, OutputFormat::Json)
            .map_err(|err| anyhow!(err.display_message()))?;
        Ok(())
    }
}
