//! Prelude module for the Lesson Fetcher library
//!
//! This module re-exports the most commonly used items from the library,
//! providing a convenient way to import everything needed for typical usage
//! with a single `use lesson_fetcher::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use lesson_fetcher::prelude::*;
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let session = Arc::new(SessionStore::new(PathBuf::from("session.json")));
//!     session.load_from_store().await?;
//!
//!     let base_url = Url::parse(DEFAULT_BASE_URL).unwrap();
//!     let api = Arc::new(ApiClient::new(base_url, session.clone())?);
//!     let cache = Arc::new(PdfCache::new(PathBuf::from("downloads")).await?);
//!
//!     // Continue with repository and controller setup...
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Essential app components that are used in most integrations
pub use crate::app::{
    // Network layer
    ApiClient,
    ClientConfig,

    // Catalog access and download cache
    CachedPdf,
    ContentRepository,
    PdfCache,

    // Data types
    Pdf,
    SectionWithVideos,
    Video,

    // Screen controllers
    HomeController,
    LoginController,
    ResourcesController,
    ScreenState,
    SignupController,
    VideoDetailController,

    // Session persistence
    SessionRecord,
    SessionStore,
};

// Commonly used constants
pub use crate::constants::{DEFAULT_BASE_URL, SESSION_FILE, USER_AGENT};

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;

// Common external crate re-exports for convenience
// Note: Only re-export types that users will commonly need,
// not the entire crates which would pollute the namespace
pub use tokio;
