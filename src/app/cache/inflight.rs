//! In-flight download registry
//!
//! This module hands out keyed guards that serialize duplicate downloads
//! of the same PDF. A second trigger for a key waits for the holder to
//! finish and then finds the cache populated, so it joins the first
//! download's result instead of transferring the bytes again.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Key identifying one download slot: (user, video, pdf)
pub type DownloadKey = (Option<i64>, i64, i64);

/// Registry of per-key download guards
#[derive(Default)]
pub struct InflightDownloads {
    slots: Mutex<HashMap<DownloadKey, Arc<Mutex<()>>>>,
}

impl InflightDownloads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive ownership of a download slot
    ///
    /// The slot stays busy until the returned guard is dropped. Callers
    /// must re-check the cache after acquiring: a waiter that wakes up
    /// behind a finished download reuses its file.
    pub async fn acquire(&self, key: DownloadKey) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().await;
            // Slots nobody holds or waits on anymore can be dropped
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(slots.entry(key).or_default())
        };

        slot.lock_owned().await
    }
}
