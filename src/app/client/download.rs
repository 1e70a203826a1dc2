//! File download operations with atomic writes and streaming
//!
//! This module streams signed-URL responses to disk using the temp file +
//! rename pattern, so a cancelled or failed transfer never leaves a
//! partial file at the final path.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::constants::files;
use crate::errors::{DownloadError, DownloadResult};

/// File download operations handler
///
/// The client handed in here must be the unauthenticated download client:
/// signed URLs are the capability and no `Authorization` header may be
/// attached to them.
pub struct DownloadHandler<'a> {
    client: &'a Client,
}

impl<'a> DownloadHandler<'a> {
    /// Creates a new DownloadHandler over the given HTTP client
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Downloads a file to the specified path with atomic operations
    ///
    /// Streams the body to a temporary sibling of `destination` and
    /// renames it into place on completion. On any failure the temporary
    /// file is removed; an existing file at `destination` is replaced
    /// only by a complete download (last-writer-wins).
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the HTTP request fails, the server
    /// replies with a non-success status, or file I/O fails.
    pub async fn fetch_to_file(&self, url: &Url, destination: &Path) -> DownloadResult<u64> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp_path = temp_path_for(destination);

        match self.fetch_attempt(url, &temp_path).await {
            Ok(bytes_written) => {
                // Atomic move from temp file to final destination
                tokio::fs::rename(&temp_path, destination).await.map_err(
                    |_e| DownloadError::AtomicOperationFailed {
                        temp_path: temp_path.clone(),
                        final_path: destination.to_path_buf(),
                    },
                )?;
                tracing::info!(
                    "Downloaded {} bytes to {}",
                    bytes_written,
                    destination.display()
                );
                Ok(bytes_written)
            }
            Err(e) => {
                // A partial file must never survive a failed transfer
                if temp_path.exists() {
                    let _ = tokio::fs::remove_file(&temp_path).await;
                }
                tracing::warn!("Download failed for {}: {}", url, e);
                Err(e)
            }
        }
    }

    /// Streams the response body into the temporary path
    async fn fetch_attempt(&self, url: &Url, temp_path: &Path) -> DownloadResult<u64> {
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(DownloadError::ServerError {
                status: response.status().as_u16(),
            });
        }

        let mut file = File::create(temp_path).await?;
        let mut stream = response.bytes_stream();
        let mut bytes_written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            bytes_written += chunk.len() as u64;
        }

        file.flush().await?;
        Ok(bytes_written)
    }
}

/// Temporary sibling path used before the atomic rename
fn temp_path_for(destination: &Path) -> PathBuf {
    destination.with_extension(format!(
        "{}{}",
        destination
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or(""),
        files::TEMP_FILE_SUFFIX
    ))
}
