use vitrine_media::Uploader;
use vitrine_telemetry::record_stage;

use crate::cli::{OutputFormat, UploadArgs};
use crate::client::{AppContext, CliResult};
use crate::output::render_upload_summary;

pub(crate) async fn handle_upload(
    ctx: &AppContext,
    args: UploadArgs,
    format: OutputFormat,
) -> CliResult<()> {
    record_stage("upload");
    let cms = ctx.cms(ctx.pacing.upload);
    let summary = Uploader::new(&cms, args.root, args.manifest).run().await?;
    render_upload_summary(&summary, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::context_for;
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use serde_json::json;
    use std::fs;

    #[tokio::test]
    async fn upload_posts_each_image_and_writes_manifest() -> Result<()> {
        let server = MockServer::start_async().await;
        let upload = server.mock(|when, then| {
            when.method(POST)
                .path("/api/upload")
                .header("authorization", "Bearer test-token");
            then.status(200)
                .json_body(json!([{"id": 41, "url": "/uploads/logo_main.png"}]));
        });

        let dir = tempfile::tempdir()?;
        let root = dir.path().join("uploads");
        fs::create_dir_all(root.join("brand"))?;
        fs::write(root.join("brand/logo_main.png"), b"png")?;
        fs::write(root.join("notes.txt"), b"skip")?;
        let manifest = dir.path().join("uploaded-images.json");

        let ctx = context_for(&server)?;
        handle_upload(
            &ctx,
            UploadArgs {
                root,
                manifest: manifest.clone(),
            },
            OutputFormat::Json,
        )
        .await
        .map_err(|err| anyhow!(err.display_message()))?;

        upload.assert();
        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&manifest)?)?;
        assert_eq!(
            written,
            json!([{"fileName": "logo_main.png", "id": 41, "url": "/uploads/logo_main.png"}])
        );
        Ok(())
    }

    #[tokio::test]
    async fn missing_root_is_a_validation_error() -> Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir()?;
        let ctx = context_for(&server)?;

        let err = handle_upload(
            &ctx,
            UploadArgs {
                root: dir.path().join("absent"),
                manifest: dir.path().join("uploaded-images.json"),
            },
            OutputFormat::Table,
        )
        .await
        .err()
        .ok_or_else(|| anyhow!("missing root accepted"))?;

        assert_eq!(err.exit_code(), 2);
        assert!(!dir.path().join("uploaded-images.json").exists());
        Ok(())
    }
}
