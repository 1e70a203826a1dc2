//! Download cache with per-user indexes and atomic operations
//!
//! This module tracks which study PDFs have already been fetched for each
//! account, suppresses duplicate concurrent downloads of the same file, and
//! keeps the on-disk layout for downloaded material in one place.
//!
//! # Key Features
//!
//! - **Per-user isolation**: Each account gets its own directory and index,
//!   so downloads never leak between accounts on a shared device
//! - **Atomic operations**: Index writes use the temp-file + rename pattern
//! - **Stale detection**: A mapping only counts while the file it points at
//!   still exists on disk
//! - **Duplicate suppression**: Concurrent requests for the same PDF
//!   serialize on an in-flight registry instead of racing
//!
//! # Module Organization
//!
//! - [`layout`] - Directory layout and filename sanitization
//! - [`inflight`] - In-flight download registry
//! - [`manager`] - Core cache with per-user indexes and atomic writes
//!
//! # Examples
//!
//! ```rust,no_run
//! use lesson_fetcher::app::cache::PdfCache;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = PdfCache::new(PathBuf::from("/tmp/downloads")).await?;
//!
//! // Claim the slot for this PDF, then re-check before downloading
//! let _guard = cache.begin_download((Some(1), 10, 100)).await;
//! if let Some(path) = cache.get_path(Some(1), 10, 100).await? {
//!     println!("Already downloaded to {}", path.display());
//!     return Ok(());
//! }
//!
//! // Download the file to its destination, then record it
//! let destination = cache.destination(Some(1), "Fractions Worksheet");
//! cache.save_path(Some(1), 10, 100, &destination).await?;
//! # Ok(())
//! # }
//! ```

pub mod inflight;
pub mod layout;
pub mod manager;

// Re-export main public API
pub use inflight::{DownloadKey, InflightDownloads};
pub use layout::DownloadLayout;
pub use manager::{CachedPdf, PdfCache, PdfCacheEntry};
