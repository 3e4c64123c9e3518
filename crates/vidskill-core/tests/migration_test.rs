mod common;

use common::*;
use std::time::Duration;
use vidskill_core::{CatalogItem, DeployError, plan_migration, run_migration, run_migration_for};

fn bunny() -> CatalogItem {
    CatalogItem::new("big-buck-bunny", "Bug.Buck.Bunny.mp4")
}

fn cache_dir(project: &TestProject) -> std::path::PathBuf {
    project
        .ctx
        .resolve(&project.ctx.project.paths.content_cache_dir)
}

#[tokio::test]
async fn test_remote_copy_clears_download_flag() {
    let project = TestProject::new();
    project.cloud.add_stack(ARTIFACT_STACK, artifact_resources());
    project
        .cloud
        .add_objects(BUCKET, &["content/big-buck-bunny/Bug.Buck.Bunny.mp4"]);

    let entries = plan_migration(
        project.ctx.providers.storage.as_ref(),
        BUCKET,
        &cache_dir(&project),
        vec![bunny()],
    )
    .await
    .unwrap();
    assert!(!entries[0].requires_download);
    assert!(!entries[0].requires_upload);

    let handle = run_migration_for(&project.ctx, BUCKET, vec![bunny()])
        .await
        .unwrap();
    let status = handle.status();
    assert!(status.complete && status.success);
    handle.wait(Duration::from_millis(10)).await.unwrap();

    assert!(project.fetcher.fetched().is_empty());
    assert!(project.cloud.calls_starting_with("putObject").is_empty());
}

#[tokio::test]
async fn test_everything_in_place_finishes_synchronously() {
    let project = TestProject::new();
    project.cloud.add_stack(ARTIFACT_STACK, artifact_resources());
    project.cache_all_content();
    project.upload_all_content();

    let handle = run_migration(&project.ctx, BUCKET).await.unwrap();
    let status = handle.status();
    assert!(status.complete);
    assert!(status.success);
    assert!(project.fetcher.fetched().is_empty());
    assert!(project.cloud.calls_starting_with("putObject").is_empty());
}

#[tokio::test]
async fn test_missing_everywhere_downloads_then_uploads_once() {
    let project = TestProject::new();
    project.cloud.add_stack(ARTIFACT_STACK, artifact_resources());

    let handle = run_migration_for(&project.ctx, BUCKET, vec![bunny()])
        .await
        .unwrap();
    assert!(handle.status().required);
    handle.wait(Duration::from_secs(5)).await.unwrap();

    assert_eq!(
        project.fetcher.fetched(),
        vec!["https://media.example.com/demo/big-buck-bunny/Bug.Buck.Bunny.mp4"]
    );
    assert_eq!(
        project.cloud.calls_starting_with("putObject"),
        vec![format!(
            "putObject:{}/content/big-buck-bunny/Bug.Buck.Bunny.mp4",
            BUCKET
        )]
    );
    assert!(bunny().local_path(&cache_dir(&project)).is_file());
}

#[tokio::test]
async fn test_local_copy_is_uploaded_without_download() {
    let project = TestProject::new();
    project.cloud.add_stack(ARTIFACT_STACK, artifact_resources());
    project.cache_all_content();

    let handle = run_migration(&project.ctx, BUCKET).await.unwrap();
    handle.wait(Duration::from_secs(5)).await.unwrap();

    assert!(project.fetcher.fetched().is_empty());
    assert_eq!(
        project.cloud.calls_starting_with("putObject").len(),
        vidskill_core::demo_catalog().len()
    );
}

#[tokio::test]
async fn test_failed_download_fails_migration() {
    let project = TestProject::with_fetcher(FakeFetcher::failing());
    project.cloud.add_stack(ARTIFACT_STACK, artifact_resources());

    let handle = run_migration_for(&project.ctx, BUCKET, vec![bunny()])
        .await
        .unwrap();
    let result = handle.wait(Duration::from_secs(5)).await;

    assert!(matches!(result, Err(DeployError::MigrationFailed(_))));
    assert!(project.cloud.calls_starting_with("putObject").is_empty());
}

#[tokio::test]
async fn test_failed_upload_fails_migration() {
    let project = TestProject::new();
    project.cloud.add_stack(ARTIFACT_STACK, artifact_resources());
    project.cache_all_content();
    project.cloud.with_state(|s| {
        s.failing_puts.insert(bunny().remote_key());
    });

    let handle = run_migration(&project.ctx, BUCKET).await.unwrap();
    let mut status = handle.status();
    for _ in 0..500 {
        if status.complete {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        status = handle.status();
    }
    assert!(status.complete);
    assert!(!status.success);

    let result = handle.wait(Duration::from_secs(5)).await;
    assert!(matches!(result, Err(DeployError::MigrationFailed(_))));

    // The other uploads still went through
    let uploaded = project.cloud.object_keys(BUCKET);
    assert!(!uploaded.contains(&bunny().remote_key()));
    assert_eq!(uploaded.len(), vidskill_core::demo_catalog().len() - 1);
}

#[tokio::test]
async fn test_stalled_migration_times_out() {
    let project = TestProject::with_fetcher(FakeFetcher::slow(Duration::from_secs(60)));
    project.cloud.add_stack(ARTIFACT_STACK, artifact_resources());

    let handle = run_migration_for(&project.ctx, BUCKET, vec![bunny()])
        .await
        .unwrap();
    let result = handle.wait(Duration::from_millis(50)).await;

    assert!(matches!(result, Err(DeployError::MigrationTimeout(_))));
}
