//! Lesson Fetcher Library
//!
//! A Rust client for a video-lesson catalog service. Provides session
//! persistence, an authenticated API client, a content repository, a per-user
//! PDF download cache, and screen controllers that drive a UI or the CLI.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
