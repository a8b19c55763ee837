//! Stage 2: delete derived renditions and record the survivors.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};
use vitrine_cms::MediaLibrary;

use crate::classify::{CleanupPolicy, CleanupReason, CleanupVerdict, cleanup_verdict};
use crate::error::MediaResult;
use crate::manifest::{KeptRecord, UploadRecord, read_upload_manifest, write_kept_manifest};

/// Partition of an upload manifest into delete and keep sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupPlan {
    /// Records to delete, with the rule that selected them.
    pub delete: Vec<(UploadRecord, CleanupReason)>,
    /// Records that survive, in input order.
    pub keep: Vec<KeptRecord>,
}

impl CleanupPlan {
    /// Classify every record by name. Input order is preserved within each set.
    #[must_use]
    pub fn new(records: Vec<UploadRecord>, policy: CleanupPolicy) -> Self {
        let mut plan = Self::default();
        for record in records {
            match cleanup_verdict(&record.file_name, policy) {
                CleanupVerdict::Delete(reason) => plan.delete.push((record, reason)),
                CleanupVerdict::Keep(_) => plan.keep.push(KeptRecord(record)),
            }
        }
        plan
    }

    /// Number of records classified.
    #[must_use]
    pub fn total(&self) -> usize {
        self.delete.len() + self.keep.len()
    }
}

/// Outcome counts for a cleanup run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupSummary {
    /// Records read from the upload manifest.
    pub total: usize,
    /// Records classified as keep.
    pub kept: usize,
    /// Delete calls issued.
    pub delete_attempted: usize,
    /// Delete calls that succeeded.
    pub deleted: usize,
    /// Whether the kept manifest was (re)written.
    pub manifest_written: bool,
}

/// Deletes derived renditions listed in an upload manifest.
pub struct Cleanup<'a> {
    library: &'a dyn MediaLibrary,
    input: PathBuf,
    output: PathBuf,
    policy: CleanupPolicy,
}

impl<'a> Cleanup<'a> {
    /// Build a cleanup reading `input` and writing survivors to `output`.
    pub fn new(
        library: &'a dyn MediaLibrary,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            library,
            input: input.into(),
            output: output.into(),
            policy: CleanupPolicy::default(),
        }
    }

    /// Override the policy for unprotected names.
    #[must_use]
    pub const fn with_policy(mut self, policy: CleanupPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Read the manifest and classify it without touching the library.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest is unreadable or invalid.
    pub fn plan(&self) -> MediaResult<CleanupPlan> {
        let records = read_upload_manifest(&self.input)?;
        Ok(CleanupPlan::new(records, self.policy))
    }

    /// Delete the planned files and persist the kept set.
    ///
    /// The kept manifest reflects classification, not delete outcomes, and is
    /// left untouched when nothing is classified for deletion.
    ///
    /// # Errors
    ///
    /// Returns an error if the input manifest is unreadable or invalid, or the
    /// kept manifest cannot be written.
    pub async fn run(&self) -> MediaResult<CleanupSummary> {
        let plan = self.plan()?;
        let mut summary = CleanupSummary {
            total: plan.total(),
            kept: plan.keep.len(),
            ..CleanupSummary::default()
        };
        info!(
            manifest = %self.input.display(),
            total = summary.total,
            delete = plan.delete.len(),
            kept = summary.kept,
            "cleanup planned"
        );

        if plan.delete.is_empty() {
            info!("nothing to delete; kept manifest left unchanged");
            return Ok(summary);
        }

        for (record, reason) in &plan.delete {
            summary.delete_attempted += 1;
            match self.library.delete_file(record.remote_id).await {
                Ok(()) => {
                    info!(
                        file = %record.file_name,
                        id = %record.remote_id,
                        reason = reason.as_str(),
                        "deleted"
                    );
                    summary.deleted += 1;
                }
                Err(error) => {
                    warn!(
                        file = %record.file_name,
                        id = %record.remote_id,
                        error = %error,
                        "delete failed"
                    );
                }
            }
        }

        write_kept_manifest(&self.output, &plan.keep)?;
        summary.manifest_written = true;
        info!(
            manifest = %self.output.display(),
            deleted = summary.deleted,
            failed = summary.delete_attempted - summary.deleted,
            "cleanup finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{read_kept_manifest, write_upload_manifest};
    use crate::MediaError;
    use anyhow::Result;
    use std::fs;
    use vitrine_cms::FileId;
    use vitrine_test_support::{MemoryLibrary, UploadTree};

    fn seeded(library: &MemoryLibrary, names: &[&str]) -> Vec<UploadRecord> {
        names
            .iter()
            .map(|name| UploadRecord {
                file_name: (*name).to_string(),
                remote_id: library.seed_file(name),
                remote_url: format!("/uploads/{name}"),
            })
            .collect()
    }

    #[test]
    fn plan_partitions_every_record_once() {
        let records: Vec<_> = [
            "thumbnail_10001_a.jpg",
            "10001_a.jpg",
            "small_logo.png",
            "logo_main.png",
            "team.jpg",
        ]
        .iter()
        .zip(1..)
        .map(|(name, id)| UploadRecord {
            file_name: (*name).to_string(),
            remote_id: FileId(id),
            remote_url: String::new(),
        })
        .collect();

        let plan = CleanupPlan::new(records.clone(), CleanupPolicy::KeepUnprotected);
        assert_eq!(plan.total(), records.len());
        let deleted: Vec<_> = plan.delete.iter().map(|(r, _)| r.file_name.as_str()).collect();
        assert_eq!(deleted, vec!["thumbnail_10001_a.jpg", "small_logo.png"]);
        for kept in &plan.keep {
            assert!(records.contains(kept.record()));
        }

        let strict = CleanupPlan::new(records, CleanupPolicy::DeleteUnprotected);
        assert_eq!(strict.delete.len(), 3);
        assert_eq!(strict.keep.len(), 2);
    }

    #[tokio::test]
    async fn deletes_thumbnails_and_writes_survivors() -> Result<()> {
        let tree = UploadTree::new()?;
        let library = MemoryLibrary::new();
        let records = seeded(
            &library,
            &["thumbnail_10001_a.jpg", "10001_a.jpg", "logo_main.png"],
        );
        let input = tree.path("uploaded-images.json");
        let output = tree.path("kept-images.json");
        write_upload_manifest(&input, &records)?;

        let summary = Cleanup::new(&library, &input, &output).run().await?;

        assert_eq!(
            summary,
            CleanupSummary {
                total: 3,
                kept: 2,
                delete_attempted: 1,
                deleted: 1,
                manifest_written: true,
            }
        );
        assert_eq!(library.deleted(), vec![records[0].remote_id]);
        let kept: Vec<_> = read_kept_manifest(&output)?
            .into_iter()
            .map(|k| k.0.file_name)
            .collect();
        assert_eq!(kept, vec!["10001_a.jpg", "logo_main.png"]);
        Ok(())
    }

    #[tokio::test]
    async fn failed_deletes_are_counted_but_not_fatal() -> Result<()> {
        let tree = UploadTree::new()?;
        let library = MemoryLibrary::new();
        let records = seeded(&library, &["thumbnail_a.jpg", "small_a.jpg", "a.jpg"]);
        library.fail_delete(records[0].remote_id);
        let input = tree.path("uploaded-images.json");
        let output = tree.path("kept-images.json");
        write_upload_manifest(&input, &records)?;

        let summary = Cleanup::new(&library, &input, &output).run().await?;

        assert_eq!(summary.delete_attempted, 2);
        assert_eq!(summary.deleted, 1);
        assert_eq!(read_kept_manifest(&output)?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn nothing_to_delete_leaves_kept_manifest_alone() -> Result<()> {
        let tree = UploadTree::new()?;
        let library = MemoryLibrary::new();
        let records = seeded(&library, &["10001_a.jpg", "logo_main.png"]);
        let input = tree.path("uploaded-images.json");
        let output = tree.path("kept-images.json");
        write_upload_manifest(&input, &records)?;
        fs::write(&output, "previous")?;

        let summary = Cleanup::new(&library, &input, &output).run().await?;

        assert!(!summary.manifest_written);
        assert_eq!(summary.delete_attempted, 0);
        assert_eq!(fs::read_to_string(&output)?, "previous");
        assert!(library.deleted().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn delete_unprotected_policy_removes_generic_names() -> Result<()> {
        let tree = UploadTree::new()?;
        let library = MemoryLibrary::new();
        let records = seeded(&library, &["team.jpg", "10001_a.jpg"]);
        let input = tree.path("uploaded-images.json");
        let output = tree.path("kept-images.json");
        write_upload_manifest(&input, &records)?;

        let summary = Cleanup::new(&library, &input, &output)
            .with_policy(CleanupPolicy::DeleteUnprotected)
            .run()
            .await?;

        assert_eq!(summary.deleted, 1);
        assert_eq!(library.file_names(), vec!["10001_a.jpg"]);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_manifest_aborts_before_any_delete() -> Result<()> {
        let tree = UploadTree::new()?;
        let library = MemoryLibrary::new();
        let id = library.seed_file("thumbnail_a.jpg");
        let input = tree.path("uploaded-images.json");
        fs::write(
            &input,
            format!(r#"[{{"fileName": "thumbnail_a.jpg", "id": {id}, "url": "/u"}}, {{"oops": true}}]"#),
        )?;

        let result = Cleanup::new(&library, &input, tree.path("kept-images.json"))
            .run()
            .await;

        assert!(matches!(result, Err(MediaError::ManifestParse { .. })));
        assert!(library.deleted().is_empty());
        Ok(())
    }
}
