//! Core download cache with per-user indexes and atomic writes
//!
//! This module maps (user, video, pdf) to the local path of downloaded
//! study material. Each user's mapping lives in an index file inside that
//! user's download directory, so switching accounts on one device never
//! exposes another user's downloads. A mapping is only trusted while the
//! file it points at still exists on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::{OwnedMutexGuard, RwLock};
use tracing::{debug, info, warn};

use super::inflight::{DownloadKey, InflightDownloads};
use super::layout::DownloadLayout;
use crate::constants::files;
use crate::errors::{CacheError, CacheResult};

/// One recorded download
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfCacheEntry {
    pub video_id: i64,
    pub pdf_id: i64,
    pub path: PathBuf,
    pub downloaded_at: DateTime<Utc>,
}

/// Listing row for one user's downloads
#[derive(Debug, Clone)]
pub struct CachedPdf {
    pub entry: PdfCacheEntry,
    pub file_exists: bool,
}

/// Per-user index as serialized to disk
#[derive(Debug, Default, Serialize, Deserialize)]
struct UserIndex {
    entries: Vec<PdfCacheEntry>,
}

type EntryMap = HashMap<(i64, i64), PdfCacheEntry>;

/// Download cache over a per-user directory tree
///
/// In-memory indexes are loaded lazily per user and written back through
/// the temp file + rename pattern on every upsert. An upsert persists
/// durably before the in-memory copy flips.
pub struct PdfCache {
    root: PathBuf,
    indexes: RwLock<HashMap<i64, EntryMap>>,
    inflight: InflightDownloads,
}

impl PdfCache {
    /// Create the cache, ensuring the downloads root exists
    ///
    /// # Errors
    ///
    /// Returns `CacheError::DirectoryNotAccessible` if the root cannot be
    /// created
    pub async fn new(root: PathBuf) -> CacheResult<Self> {
        fs::create_dir_all(&root)
            .await
            .map_err(|_| CacheError::DirectoryNotAccessible { path: root.clone() })?;

        info!("Download cache ready at {}", root.display());

        Ok(Self {
            root,
            indexes: RwLock::new(HashMap::new()),
            inflight: InflightDownloads::new(),
        })
    }

    /// Root of the downloads directory tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Destination path for a PDF derived from its display title (no I/O)
    pub fn destination(&self, user_id: Option<i64>, title: &str) -> PathBuf {
        DownloadLayout::pdf_destination(&self.root, user_id, title)
    }

    /// Claim the download slot for a key (join-don't-duplicate)
    ///
    /// Duplicate triggers for the same key serialize on the returned
    /// guard; the waiter should re-check [`PdfCache::get_path`] once it
    /// acquires.
    pub async fn begin_download(&self, key: DownloadKey) -> OwnedMutexGuard<()> {
        self.inflight.acquire(key).await
    }

    /// Stored path for a download
    ///
    /// Returns `None` when no mapping exists, when `user_id` is absent,
    /// or when the mapped file has been deleted externally. The on-disk
    /// existence check runs on every call; a stale mapping reports a
    /// cache miss, not an error.
    pub async fn get_path(
        &self,
        user_id: Option<i64>,
        video_id: i64,
        pdf_id: i64,
    ) -> CacheResult<Option<PathBuf>> {
        let user_id = match user_id {
            Some(id) => id,
            None => return Ok(None),
        };

        self.ensure_index_loaded(user_id).await?;

        let indexes = self.indexes.read().await;
        let entry = match indexes
            .get(&user_id)
            .and_then(|index| index.get(&(video_id, pdf_id)))
        {
            Some(entry) => entry,
            None => return Ok(None),
        };

        if entry.path.exists() {
            Ok(Some(entry.path.clone()))
        } else {
            warn!(
                "Stale mapping for video {} pdf {}: {} no longer exists",
                video_id,
                pdf_id,
                entry.path.display()
            );
            Ok(None)
        }
    }

    /// Record a completed download
    ///
    /// An absent `user_id` makes this a no-op: anonymous downloads are
    /// never indexed, which keeps one account's material from appearing
    /// in another's listing through a shared index.
    pub async fn save_path(
        &self,
        user_id: Option<i64>,
        video_id: i64,
        pdf_id: i64,
        path: &Path,
    ) -> CacheResult<()> {
        let user_id = match user_id {
            Some(id) => id,
            None => {
                debug!("Anonymous download not recorded in cache");
                return Ok(());
            }
        };

        self.ensure_index_loaded(user_id).await?;

        let mut indexes = self.indexes.write().await;
        let mut updated = indexes.get(&user_id).cloned().unwrap_or_default();
        updated.insert(
            (video_id, pdf_id),
            PdfCacheEntry {
                video_id,
                pdf_id,
                path: path.to_path_buf(),
                downloaded_at: Utc::now(),
            },
        );

        // Durable write first; the in-memory index flips only on success
        self.persist_index(user_id, &updated).await?;
        indexes.insert(user_id, updated);

        debug!(
            "Recorded download for user {} video {} pdf {}",
            user_id, video_id, pdf_id
        );
        Ok(())
    }

    /// List one user's recorded downloads with current on-disk existence
    pub async fn entries_for_user(&self, user_id: i64) -> CacheResult<Vec<CachedPdf>> {
        self.ensure_index_loaded(user_id).await?;

        let indexes = self.indexes.read().await;
        let mut rows: Vec<CachedPdf> = indexes
            .get(&user_id)
            .map(|index| index.values().cloned().collect::<Vec<_>>())
            .unwrap_or_default()
            .into_iter()
            .map(|entry| CachedPdf {
                file_exists: entry.path.exists(),
                entry,
            })
            .collect();

        rows.sort_by_key(|row| (row.entry.video_id, row.entry.pdf_id));
        Ok(rows)
    }

    /// Load a user's index from disk if not yet in memory
    async fn ensure_index_loaded(&self, user_id: i64) -> CacheResult<()> {
        {
            let indexes = self.indexes.read().await;
            if indexes.contains_key(&user_id) {
                return Ok(());
            }
        }

        let index_path = DownloadLayout::index_file(&self.root, user_id);
        let loaded: EntryMap = match fs::read_to_string(&index_path).await {
            Ok(content) => {
                let parsed: UserIndex =
                    serde_json::from_str(&content).map_err(|e| CacheError::IndexCorrupted {
                        path: index_path.clone(),
                        source: e,
                    })?;
                debug!(
                    "Loaded {} download entries for user {}",
                    parsed.entries.len(),
                    user_id
                );
                parsed
                    .entries
                    .into_iter()
                    .map(|entry| ((entry.video_id, entry.pdf_id), entry))
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => EntryMap::new(),
            Err(e) => return Err(CacheError::Io(e)),
        };

        let mut indexes = self.indexes.write().await;
        // A concurrent loader may have won the race; keep its copy
        indexes.entry(user_id).or_insert(loaded);
        Ok(())
    }

    /// Write a user's index using the temp file + rename pattern
    async fn persist_index(&self, user_id: i64, index: &EntryMap) -> CacheResult<()> {
        let index_path = DownloadLayout::index_file(&self.root, user_id);

        if let Some(parent) = index_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut entries: Vec<PdfCacheEntry> = index.values().cloned().collect();
        entries.sort_by_key(|entry| (entry.video_id, entry.pdf_id));
        let content =
            serde_json::to_string_pretty(&UserIndex { entries }).map_err(CacheError::Serialize)?;

        let temp_path = index_path.with_extension(format!(
            "{}{}",
            index_path
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or(""),
            files::TEMP_FILE_SUFFIX
        ));

        fs::write(&temp_path, content).await?;

        fs::rename(&temp_path, &index_path)
            .await
            .map_err(|_| CacheError::AtomicOperationFailed {
                temp_path: temp_path.clone(),
                final_path: index_path.clone(),
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn cache_in(dir: &TempDir) -> PdfCache {
        PdfCache::new(dir.path().join("downloads")).await.unwrap()
    }

    async fn write_pdf(cache: &PdfCache, user_id: Option<i64>, title: &str) -> PathBuf {
        let path = cache.destination(user_id, title);
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(&path, b"%PDF-1.4").await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir).await;

        let path = write_pdf(&cache, Some(1), "Fractions Worksheet").await;
        cache.save_path(Some(1), 10, 100, &path).await.unwrap();

        let stored = cache.get_path(Some(1), 10, 100).await.unwrap();
        assert_eq!(stored, Some(path));
    }

    #[tokio::test]
    async fn test_missing_mapping_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir).await;

        let stored = cache.get_path(Some(1), 10, 100).await.unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn test_stale_mapping_is_cache_miss() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir).await;

        let path = write_pdf(&cache, Some(1), "Fractions Worksheet").await;
        cache.save_path(Some(1), 10, 100, &path).await.unwrap();

        // Delete the file behind the cache's back
        fs::remove_file(&path).await.unwrap();

        let stored = cache.get_path(Some(1), 10, 100).await.unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn test_anonymous_save_is_no_op() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir).await;

        let path = write_pdf(&cache, None, "Fractions Worksheet").await;
        cache.save_path(None, 10, 100, &path).await.unwrap();

        assert!(cache.get_path(None, 10, 100).await.unwrap().is_none());
        // No index file appears in the anonymous directory
        assert!(!cache
            .root()
            .join("anonymous")
            .join(files::PDF_INDEX_FILE)
            .exists());
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir).await;

        let path = write_pdf(&cache, Some(1), "Fractions Worksheet").await;
        cache.save_path(Some(1), 10, 100, &path).await.unwrap();

        // Same content key under a different account stays invisible
        assert!(cache.get_path(Some(2), 10, 100).await.unwrap().is_none());

        let other = write_pdf(&cache, Some(2), "Decimals Worksheet").await;
        cache.save_path(Some(2), 20, 200, &other).await.unwrap();

        assert_eq!(cache.get_path(Some(1), 10, 100).await.unwrap(), Some(path));
        assert_eq!(cache.get_path(Some(2), 20, 200).await.unwrap(), Some(other));
    }

    #[tokio::test]
    async fn test_index_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("downloads");

        let path = {
            let cache = PdfCache::new(root.clone()).await.unwrap();
            let path = write_pdf(&cache, Some(1), "Fractions Worksheet").await;
            cache.save_path(Some(1), 10, 100, &path).await.unwrap();
            path
        };

        let reopened = PdfCache::new(root).await.unwrap();
        let stored = reopened.get_path(Some(1), 10, 100).await.unwrap();
        assert_eq!(stored, Some(path));
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_entry() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir).await;

        let first = write_pdf(&cache, Some(1), "Worksheet v1").await;
        cache.save_path(Some(1), 10, 100, &first).await.unwrap();

        let second = write_pdf(&cache, Some(1), "Worksheet v2").await;
        cache.save_path(Some(1), 10, 100, &second).await.unwrap();

        let stored = cache.get_path(Some(1), 10, 100).await.unwrap();
        assert_eq!(stored, Some(second));
    }

    #[tokio::test]
    async fn test_corrupt_index_surfaces_error() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir).await;

        let index_path = DownloadLayout::index_file(cache.root(), 1);
        fs::create_dir_all(index_path.parent().unwrap())
            .await
            .unwrap();
        fs::write(&index_path, "{ not json").await.unwrap();

        let result = cache.get_path(Some(1), 10, 100).await;
        assert!(matches!(result, Err(CacheError::IndexCorrupted { .. })));
    }

    #[tokio::test]
    async fn test_entries_listing_flags_missing_files() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir).await;

        let kept = write_pdf(&cache, Some(1), "Kept Worksheet").await;
        cache.save_path(Some(1), 10, 100, &kept).await.unwrap();

        let deleted = write_pdf(&cache, Some(1), "Deleted Worksheet").await;
        cache.save_path(Some(1), 20, 200, &deleted).await.unwrap();
        fs::remove_file(&deleted).await.unwrap();

        let rows = cache.entries_for_user(1).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].file_exists);
        assert!(!rows[1].file_exists);
    }
}
