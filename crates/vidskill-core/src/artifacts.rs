//! Building and uploading the lambda bundle and the web player

use crate::context::DeployContext;
use crate::error::{DeployError, Result};
use crate::progress::BuildProgress;
use futures_util::future::try_join_all;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use vidskill_cloud::{PutObjectRequest, fatal};
use walkdir::WalkDir;

/// Key prefix of the web player inside the artifact bucket
pub const WEB_PLAYER_PREFIX: &str = "web-player/";

/// Object key of the lambda bundle
pub fn lambda_artifact_key(project_name: &str) -> String {
    format!("lambda/{}.zip", project_name)
}

/// Content type from the file extension
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let content_type = match ext.as_str() {
        "html" | "htm" => "text/html",
        "js" | "mjs" => "application/javascript",
        "css" => "text/css",
        "json" | "map" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "txt" => "text/plain",
        "vtt" => "text/vtt",
        "mp4" => "video/mp4",
        "zip" => "application/zip",
        _ => return None,
    };
    Some(content_type)
}

/// Run a configured build command through the shell in the project root
pub async fn run_build_command(label: &str, command: Option<&str>, cwd: &Path) -> Result<()> {
    let Some(command) = command.filter(|c| !c.trim().is_empty()) else {
        tracing::debug!("No build command for {}, using existing output", label);
        return Ok(());
    };

    tracing::info!("Running build for {}: {}", label, command);
    let progress = BuildProgress::new(label);

    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await;

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            progress.finish_error(label);
            return Err(DeployError::BuildFailed {
                step: label.to_string(),
                message: e.to_string(),
            });
        }
    };

    if !output.status.success() {
        progress.finish_error(label);
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DeployError::BuildFailed {
            step: label.to_string(),
            message: format!("{} exited with {}: {}", command, output.status, stderr.trim()),
        });
    }

    progress.finish_success(label);
    Ok(())
}

/// Build the lambda bundle and upload it, returning its object key
pub async fn build_and_upload_lambda(ctx: &DeployContext, bucket: &str) -> Result<String> {
    let paths = &ctx.project.paths;
    run_build_command("lambda", paths.lambda_build_command.as_deref(), &ctx.root).await?;

    let bundle = ctx.resolve(&paths.lambda_bundle);
    if !bundle.is_file() {
        return Err(DeployError::ArtifactNotFound(bundle));
    }

    let key = lambda_artifact_key(&ctx.project.project_name);
    let request = PutObjectRequest {
        bucket: bucket.to_string(),
        key: key.clone(),
        source: bundle,
        content_type: Some("application/zip".to_string()),
    };
    fatal(
        &format!("putObject {}/{}", bucket, key),
        ctx.providers.storage.put_object(&request),
    )
    .await?;
    Ok(key)
}

/// Build the web player and upload its output directory, returning the file count
pub async fn build_and_upload_web_player(ctx: &DeployContext, bucket: &str) -> Result<usize> {
    let paths = &ctx.project.paths;
    run_build_command(
        "web player",
        paths.web_player_build_command.as_deref(),
        &ctx.root,
    )
    .await?;

    let dir = ctx.resolve(&paths.web_player_dir);
    if !dir.is_dir() {
        return Err(DeployError::ArtifactNotFound(dir));
    }

    let requests = directory_uploads(&dir, bucket, WEB_PLAYER_PREFIX)?;
    let count = requests.len();
    try_join_all(requests.iter().map(|request| async move {
        fatal(
            &format!("putObject {}/{}", request.bucket, request.key),
            ctx.providers.storage.put_object(request),
        )
        .await
    }))
    .await?;

    tracing::info!("Uploaded {} web player files to {}", count, bucket);
    Ok(count)
}

/// One upload request per file below `dir`, keyed by relative path
pub fn directory_uploads(dir: &Path, bucket: &str, prefix: &str) -> Result<Vec<PutObjectRequest>> {
    let mut requests = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative: PathBuf = entry
            .path()
            .strip_prefix(dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(entry.file_name()));
        let key_suffix = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        requests.push(PutObjectRequest {
            bucket: bucket.to_string(),
            key: format!("{}{}", prefix, key_suffix),
            source: entry.path().to_path_buf(),
            content_type: content_type_for(entry.path()).map(str::to_string),
        });
    }
    Ok(requests)
}
