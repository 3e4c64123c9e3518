//! Emptying the buckets of a stack before it is deleted

use crate::error::{DeployError, Result};
use futures_util::future::{join_all, try_join_all};
use std::sync::Arc;
use vidskill_cloud::{ObjectStorage, Providers, fatal, probe};

/// Give up when a bucket still has objects after this many delete rounds
const MAX_DELETE_ROUNDS: usize = 10;

/// Empty every bucket that belongs to `stack_name` and still exists
///
/// Buckets are emptied concurrently; the call returns once all of them are
/// confirmed empty.
pub async fn empty_all_buckets_in_stack(providers: &Providers, stack_name: &str) -> Result<()> {
    let resources = fatal(
        &format!("describeStackResources {}", stack_name),
        providers.stacks.describe_stack_resources(stack_name),
    )
    .await?;

    let candidates: Vec<String> = resources
        .into_iter()
        .filter(|r| r.is_bucket())
        .filter_map(|r| r.physical_id)
        .collect();

    // A stack can still reference a bucket that was removed by hand
    let existing: Vec<String> = join_all(candidates.into_iter().map(|bucket| {
        let storage = Arc::clone(&providers.storage);
        async move {
            probe(
                &format!("getBucketLocation {}", bucket),
                storage.get_bucket_location(&bucket),
            )
            .await
            .map(|_| bucket)
        }
    }))
    .await
    .into_iter()
    .flatten()
    .collect();

    if existing.is_empty() {
        tracing::debug!("Stack {} has no buckets to empty", stack_name);
        return Ok(());
    }

    try_join_all(
        existing
            .iter()
            .map(|bucket| empty_bucket(providers.storage.as_ref(), bucket)),
    )
    .await?;

    Ok(())
}

/// Delete every object in `bucket`, returning how many were removed
pub async fn empty_bucket(storage: &dyn ObjectStorage, bucket: &str) -> Result<usize> {
    let mut removed = 0;
    for _ in 0..MAX_DELETE_ROUNDS {
        let objects = fatal(
            &format!("listObjects {}", bucket),
            storage.list_objects(bucket, None),
        )
        .await?;
        if objects.is_empty() {
            tracing::info!("Bucket {} is empty ({} objects deleted)", bucket, removed);
            return Ok(removed);
        }

        let keys: Vec<String> = objects.into_iter().map(|o| o.key).collect();
        removed += fatal(
            &format!("deleteObjects {} ({} keys)", bucket, keys.len()),
            storage.delete_objects(bucket, &keys),
        )
        .await?;
    }

    Err(DeployError::Cloud(vidskill_cloud::CloudError::api(
        "deleteObjects",
        format!("bucket {} still has objects after {} rounds", bucket, MAX_DELETE_ROUNDS),
    )))
}
