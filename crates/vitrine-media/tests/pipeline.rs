//! End-to-end runs of upload, cleanup and organize against the in-memory library.

use anyhow::Result;
use vitrine_config::{FolderLayout, ProductBucket, RootFolder};
use vitrine_media::manifest::{read_kept_manifest, read_upload_manifest};
use vitrine_media::{Cleanup, Organizer, Uploader};
use vitrine_test_support::{MemoryLibrary, UploadTree};

fn laser_layout() -> FolderLayout {
    FolderLayout {
        roots: vec![
            RootFolder {
                name: "Product Images".to_string(),
                buckets: vec![ProductBucket {
                    name: "Laser".to_string(),
                    product_ids: vec!["10001".to_string()],
                }],
            },
            RootFolder {
                name: "Logos".to_string(),
                buckets: Vec::new(),
            },
        ],
    }
}

#[tokio::test]
async fn upload_then_cleanup_keeps_originals_only() -> Result<()> {
    let tree = UploadTree::new()?;
    tree.add("thumbnail_10001_a.jpg", b"thumb")?;
    tree.add("10001_a.jpg", b"original")?;
    tree.add("logo_main.png", b"logo")?;
    let library = MemoryLibrary::new();
    let uploaded = tree.path("uploaded-images.json");
    let kept = tree.path("kept-images.json");

    let upload = Uploader::new(&library, tree.root(), &uploaded).run().await?;
    assert_eq!(upload.uploaded, 3);
    let records = read_upload_manifest(&uploaded)?;
    assert_eq!(records.len(), 3);

    let cleanup = Cleanup::new(&library, &uploaded, &kept).run().await?;
    assert_eq!(cleanup.delete_attempted, 1);
    assert_eq!(cleanup.deleted, 1);
    assert_eq!(cleanup.kept + cleanup.delete_attempted, cleanup.total);

    let thumbnail = records
        .iter()
        .find(|record| record.file_name == "thumbnail_10001_a.jpg")
        .map(|record| record.remote_id);
    assert_eq!(library.deleted().first().copied(), thumbnail);

    let mut survivors: Vec<_> = read_kept_manifest(&kept)?
        .into_iter()
        .map(|record| record.0.file_name)
        .collect();
    survivors.sort();
    assert_eq!(survivors, vec!["10001_a.jpg", "logo_main.png"]);
    Ok(())
}

#[tokio::test]
async fn organize_builds_hierarchy_once_and_files_survivors() -> Result<()> {
    let tree = UploadTree::new()?;
    tree.add("10001_a.jpg", b"original")?;
    tree.add("logo_main.png", b"logo")?;
    tree.add("small_10001_a.jpg", b"small")?;
    let library = MemoryLibrary::new();
    let uploaded = tree.path("uploaded-images.json");
    let kept = tree.path("kept-images.json");

    Uploader::new(&library, tree.root(), &uploaded).run().await?;
    Cleanup::new(&library, &uploaded, &kept).run().await?;

    let organizer = Organizer::new(&library, &kept).with_layout(laser_layout());
    let first = organizer.run().await?;
    assert_eq!(first.folders_created, 3);
    assert_eq!(first.moved, 2);
    assert_eq!(first.unresolved, 0);

    let products = library.folder_at(&["Product Images"]);
    let laser = library.folder_at(&["Product Images", "Laser"]);
    let logos = library.folder_at(&["Logos"]);
    assert!(products.is_some() && laser.is_some() && logos.is_some());
    let roots = library
        .folders()
        .iter()
        .filter(|folder| folder.name == "Product Images")
        .count();
    assert_eq!(roots, 1);

    let records = read_kept_manifest(&kept)?;
    let placement = |name: &str| {
        records
            .iter()
            .find(|record| record.0.file_name == name)
            .and_then(|record| library.folder_of(record.0.remote_id))
    };
    assert_eq!(placement("10001_a.jpg"), laser);
    assert_eq!(placement("logo_main.png"), logos);

    let second = organizer.run().await?;
    assert_eq!(second.folders_created, 0);
    assert_eq!(second.folders_reused, 3);
    assert_eq!(library.folders().len(), 3);
    assert_eq!(placement("10001_a.jpg"), laser);
    assert_eq!(placement("logo_main.png"), logos);
    Ok(())
}

#[tokio::test]
async fn unmapped_product_does_not_abort_the_batch() -> Result<()> {
    let tree = UploadTree::new()?;
    tree.add("99999_x.jpg", b"unknown")?;
    tree.add("logo_main.png", b"logo")?;
    tree.add("thumbnail_99999_x.jpg", b"thumb")?;
    let library = MemoryLibrary::new();
    let uploaded = tree.path("uploaded-images.json");
    let kept = tree.path("kept-images.json");

    Uploader::new(&library, tree.root(), &uploaded).run().await?;
    Cleanup::new(&library, &uploaded, &kept).run().await?;
    let summary = Organizer::new(&library, &kept)
        .with_layout(laser_layout())
        .run()
        .await?;

    assert_eq!(summary.files, 2);
    assert_eq!(summary.unresolved, 1);
    assert_eq!(summary.moved, 1);
    let unknown = read_kept_manifest(&kept)?
        .into_iter()
        .find(|record| record.0.file_name == "99999_x.jpg")
        .map(|record| record.0.remote_id);
    assert!(unknown.is_some());
    assert_eq!(unknown.and_then(|id| library.folder_of(id)), None);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn unrecordable_upload_does_not_block_cleanup() -> Result<()> {
    let tree = UploadTree::new()?;
    tree.add("logo\\main.png", b"logo")?;
    tree.add("10001_a.jpg", b"original")?;
    tree.add("thumbnail_10001_a.jpg", b"thumb")?;
    tree.add("banner_home.jpg", b"banner")?;
    let library = MemoryLibrary::new();
    library.blank_url("banner_home.jpg");
    let uploaded = tree.path("uploaded-images.json");
    let kept = tree.path("kept-images.json");

    let upload = Uploader::new(&library, tree.root(), &uploaded).run().await?;
    assert_eq!(upload.discovered, 4);
    assert_eq!(upload.uploaded, 2);
    assert_eq!(upload.failed, 2);

    let cleanup = Cleanup::new(&library, &uploaded, &kept).run().await?;
    assert_eq!(cleanup.deleted, 1);
    let survivors: Vec<_> = read_kept_manifest(&kept)?
        .into_iter()
        .map(|record| record.0.file_name)
        .collect();
    assert_eq!(survivors, vec!["10001_a.jpg"]);
    Ok(())
}
