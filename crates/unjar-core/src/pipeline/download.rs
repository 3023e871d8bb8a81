//! Streaming an archive from its URL to disk.

use std::io::ErrorKind;
use std::path::Path;

use fs_err::tokio as async_fs;
use futures::StreamExt;
use reqwest::Client;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

use crate::ProgressCallback;
use crate::Result;
use crate::UnjarError;

/// Downloads `url` into `archive_path`, returning the number of bytes
/// written.
///
/// `file://` URLs are copied from the local filesystem. If the transfer
/// fails after the file was created, the partial file is removed so the
/// target directory is left empty.
pub async fn download(
    client: &Client,
    url: &Url,
    archive_path: &Path,
    index: usize,
    progress: &dyn ProgressCallback,
) -> Result<u64> {
    let result = if url.scheme() == "file" {
        copy_local_file(url, archive_path, index, progress).await
    } else {
        fetch_remote(client, url, archive_path, index, progress).await
    };

    if result.is_err() {
        match async_fs::remove_file(archive_path).await {
            Ok(()) => debug!(archive = %archive_path.display(), "removed partial download"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => debug!("failed to remove partial download: {err}"),
        }
    }

    result
}

async fn fetch_remote(
    client: &Client,
    url: &Url,
    archive_path: &Path,
    index: usize,
    progress: &dyn ProgressCallback,
) -> Result<u64> {
    let response = client.get(url.clone()).send().await?;

    if !response.status().is_success() {
        return Err(UnjarError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let total = response.content_length();
    let mut file = async_fs::File::create(archive_path).await?;
    let mut downloaded = 0u64;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        progress.on_download_progress(index, downloaded, total);
    }
    file.flush().await?;

    Ok(downloaded)
}

async fn copy_local_file(
    url: &Url,
    archive_path: &Path,
    index: usize,
    progress: &dyn ProgressCallback,
) -> Result<u64> {
    let source = url.to_file_path().map_err(|()| UnjarError::InvalidUrl {
        url: url.to_string(),
        reason: "not a local file path".to_string(),
    })?;

    let mut reader = async_fs::File::open(&source).await?;
    let total = reader.metadata().await.ok().map(|m| m.len());
    let mut writer = async_fs::File::create(archive_path).await?;
    let mut buf = vec![0u8; 64 * 1024];
    let mut copied = 0u64;

    loop {
        let read = reader.read(&mut buf).await?;
        if read == 0 {
            break;
        }
        writer.write_all(&buf[..read]).await?;
        copied += read as u64;
        progress.on_download_progress(index, copied, total);
    }
    writer.flush().await?;

    Ok(copied)
}
