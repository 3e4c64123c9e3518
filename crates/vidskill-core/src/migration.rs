//! Demo content migration
//!
//! Seeds the artifact bucket with a fixed catalog of demo media. Files are
//! downloaded into a local cache when missing there, and uploaded when
//! missing remotely. Transfers run in a background task; the deploy flow
//! keeps the returned [`MigrationHandle`] and joins it before finishing.

use crate::context::DeployContext;
use crate::error::{DeployError, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::future::join_all;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use vidskill_cloud::{ObjectStorage, PutObjectRequest, fatal};

/// Key prefix of the demo content inside the bucket
pub const CONTENT_PREFIX: &str = "content/";

/// One file of the demo catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub folder: String,
    pub file: String,
}

impl CatalogItem {
    pub fn new(folder: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            file: file.into(),
        }
    }

    pub fn remote_key(&self) -> String {
        format!("{}{}/{}", CONTENT_PREFIX, self.folder, self.file)
    }

    pub fn local_path(&self, cache_dir: &Path) -> PathBuf {
        cache_dir.join(&self.folder).join(&self.file)
    }

    pub fn source_url(&self, base_url: &str) -> String {
        format!("{}/{}/{}", base_url.trim_end_matches('/'), self.folder, self.file)
    }
}

/// A catalog item with its transfer flags for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub item: CatalogItem,
    pub requires_download: bool,
    pub requires_upload: bool,
}

/// The demo videos, each with its thumbnail and captions
pub fn demo_catalog() -> Vec<CatalogItem> {
    [
        ("big-buck-bunny", "Bug.Buck.Bunny.mp4"),
        ("elephants-dream", "Elephants.Dream.mp4"),
        ("sintel", "Sintel.mp4"),
        ("tears-of-steel", "Tears.Of.Steel.mp4"),
    ]
    .into_iter()
    .flat_map(|(folder, video)| {
        [
            CatalogItem::new(folder, video),
            CatalogItem::new(folder, "thumbnail.jpg"),
            CatalogItem::new(folder, "captions.vtt"),
        ]
    })
    .collect()
}

/// Downloads one remote file to a local path
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<()>;
}

/// Streams files over HTTP(S)
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DeployError::MigrationFailed(format!("GET {}: {}", url, e)))?;

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write to a sibling file first so an interrupted download is never
        // mistaken for a cached one
        let partial = destination.with_extension("part");
        let mut file = tokio::fs::File::create(&partial).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| DeployError::MigrationFailed(format!("GET {}: {}", url, e)))?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        tokio::fs::rename(&partial, destination).await?;
        Ok(())
    }
}

/// Migration state observed through the handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MigrationStatus {
    pub required: bool,
    pub complete: bool,
    pub success: bool,
}

/// Join point for a migration started by [`run_migration`]
pub struct MigrationHandle {
    status: watch::Receiver<MigrationStatus>,
    task: Option<JoinHandle<()>>,
}

impl MigrationHandle {
    fn finished() -> Self {
        let (_, status) = watch::channel(MigrationStatus {
            required: false,
            complete: true,
            success: true,
        });
        Self { status, task: None }
    }

    pub fn status(&self) -> MigrationStatus {
        *self.status.borrow()
    }

    /// Wait until the background transfers finish
    pub async fn wait(mut self, timeout: Duration) -> Result<()> {
        let current = self.status();
        if !current.required {
            return Ok(());
        }

        let outcome = tokio::time::timeout(timeout, self.status.wait_for(|s| s.complete)).await;
        let status = match outcome {
            Err(_) => {
                if let Some(task) = self.task.take() {
                    task.abort();
                }
                return Err(DeployError::MigrationTimeout(timeout));
            }
            Ok(Err(_)) => {
                return Err(DeployError::MigrationFailed(
                    "migration task ended without reporting".to_string(),
                ));
            }
            Ok(Ok(status)) => *status,
        };

        if status.success {
            tracing::info!("Demo content migration finished");
            Ok(())
        } else {
            Err(DeployError::MigrationFailed(
                "one or more transfers failed, see the log above".to_string(),
            ))
        }
    }
}

/// Compute the transfer flags for every catalog item
pub async fn plan_migration(
    storage: &dyn ObjectStorage,
    bucket: &str,
    cache_dir: &Path,
    catalog: Vec<CatalogItem>,
) -> Result<Vec<CatalogEntry>> {
    let remote: HashSet<String> = fatal(
        &format!("listObjects {}/{}", bucket, CONTENT_PREFIX),
        storage.list_objects(bucket, Some(CONTENT_PREFIX)),
    )
    .await?
    .into_iter()
    .map(|o| o.key)
    .collect();

    let mut entries = Vec::with_capacity(catalog.len());
    for item in catalog {
        let requires_upload = !remote.contains(&item.remote_key());
        // Already synced remotely: no need for a local copy
        let requires_download = requires_upload && !item.local_path(cache_dir).is_file();
        entries.push(CatalogEntry {
            item,
            requires_download,
            requires_upload,
        });
    }
    Ok(entries)
}

/// Start migrating the demo catalog into `bucket`
pub async fn run_migration(ctx: &DeployContext, bucket: &str) -> Result<MigrationHandle> {
    run_migration_for(ctx, bucket, demo_catalog()).await
}

/// Start migrating `catalog` into `bucket`
///
/// Returns as soon as the plan is known. When nothing needs uploading the
/// handle is already complete.
pub async fn run_migration_for(
    ctx: &DeployContext,
    bucket: &str,
    catalog: Vec<CatalogItem>,
) -> Result<MigrationHandle> {
    let cache_dir = ctx.resolve(&ctx.project.paths.content_cache_dir);
    let entries = plan_migration(ctx.providers.storage.as_ref(), bucket, &cache_dir, catalog).await?;

    let uploads = entries.iter().filter(|e| e.requires_upload).count();
    if uploads == 0 {
        tracing::info!("Demo content already in {}, nothing to migrate", bucket);
        return Ok(MigrationHandle::finished());
    }
    let downloads = entries.iter().filter(|e| e.requires_download).count();
    tracing::info!(
        "Migrating demo content: {} downloads, {} uploads (running in background)",
        downloads,
        uploads
    );

    let (tx, rx) = watch::channel(MigrationStatus {
        required: true,
        complete: false,
        success: false,
    });
    let transfer = Transfer {
        storage: Arc::clone(&ctx.providers.storage),
        fetcher: Arc::clone(&ctx.fetcher),
        bucket: bucket.to_string(),
        base_url: ctx.project.content_base_url.clone(),
        cache_dir,
    };

    let task = tokio::spawn(async move {
        let success = transfer.run(entries).await;
        tx.send_replace(MigrationStatus {
            required: true,
            complete: true,
            success,
        });
    });

    Ok(MigrationHandle {
        status: rx,
        task: Some(task),
    })
}

struct Transfer {
    storage: Arc<dyn ObjectStorage>,
    fetcher: Arc<dyn ContentFetcher>,
    bucket: String,
    base_url: String,
    cache_dir: PathBuf,
}

impl Transfer {
    async fn run(&self, entries: Vec<CatalogEntry>) -> bool {
        let downloads = join_all(
            entries
                .iter()
                .filter(|e| e.requires_download)
                .map(|e| self.download(&e.item)),
        )
        .await;
        if downloads.iter().any(|r| r.is_err()) {
            return false;
        }

        let uploads = join_all(
            entries
                .iter()
                .filter(|e| e.requires_upload)
                .map(|e| self.upload(&e.item)),
        )
        .await;
        uploads.iter().all(|r| r.is_ok())
    }

    async fn download(&self, item: &CatalogItem) -> Result<()> {
        let url = item.source_url(&self.base_url);
        let destination = item.local_path(&self.cache_dir);
        tracing::info!("calling download {}", url);
        match self.fetcher.fetch(&url, &destination).await {
            Ok(()) => {
                tracing::info!("success with download {}", url);
                Ok(())
            }
            Err(e) => {
                tracing::error!("failure with download {}: {}", url, e);
                Err(e)
            }
        }
    }

    async fn upload(&self, item: &CatalogItem) -> Result<()> {
        let request = PutObjectRequest {
            bucket: self.bucket.clone(),
            key: item.remote_key(),
            source: item.local_path(&self.cache_dir),
            content_type: crate::artifacts::content_type_for(Path::new(&item.file))
                .map(str::to_string),
        };
        fatal(
            &format!("putObject {}/{}", request.bucket, request.key),
            self.storage.put_object(&request),
        )
        .await?;
        Ok(())
    }
}
