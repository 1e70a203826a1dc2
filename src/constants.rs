//! Application constants for Lesson Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Environment variable overriding the backend base URL
    pub const BASE_URL: &str = "LESSON_API_BASE_URL";

    /// Environment variable overriding the data root directory
    pub const DATA_DIR: &str = "LESSON_FETCHER_DATA_DIR";
}

/// Backend API endpoints and auth scheme
pub mod api {
    /// Default backend base URL (development server)
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

    /// Signup endpoint path segments
    pub const SIGNUP_PATH: &[&str] = &["api", "auth", "signup"];

    /// Login endpoint path segments
    pub const LOGIN_PATH: &[&str] = &["api", "auth", "login"];

    /// Section listing endpoint path segments
    pub const SECTIONS_PATH: &[&str] = &["api", "sections"];

    /// Authorization header scheme
    pub const BEARER_SCHEME: &str = "Bearer";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "Lesson-Fetcher/0.1.0";

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Overall timeout for API requests (covers read and write phases)
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Overall timeout for signed-URL file downloads
    pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

    /// TCP keep-alive interval
    pub const TCP_KEEPALIVE: Duration = Duration::from_secs(60);

    /// Maximum connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 8;
}

/// File operation constants
pub mod files {
    /// Temporary file suffix for atomic operations
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";

    /// Extension given to downloaded study material
    pub const PDF_EXTENSION: &str = "pdf";

    /// Per-user download index file name
    pub const PDF_INDEX_FILE: &str = ".pdf_index.json";

    /// Durable session record file name
    pub const SESSION_FILE: &str = "session.json";

    /// Characters not allowed in download file names
    pub const ILLEGAL_FILENAME_CHARS: &[char] =
        &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

    /// Replacement for illegal file name characters
    pub const FILENAME_REPLACEMENT: char = '_';
}

/// Local storage layout
pub mod storage {
    /// Application directory name under the platform config/data dirs
    pub const APP_DIR_NAME: &str = "lesson-fetcher";

    /// Downloads subdirectory under the data root
    pub const DOWNLOADS_DIR: &str = "downloads";

    /// Prefix for per-user download directories
    pub const USER_DIR_PREFIX: &str = "user-";

    /// Directory for downloads made without a signed-in user
    pub const ANONYMOUS_DIR: &str = "anonymous";

    /// Config file name
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}

/// Client-side validation rules
pub mod validation {
    /// Minimum allowed password length at signup
    pub const MIN_PASSWORD_LENGTH: usize = 8;
}

/// Logging defaults
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}

// Re-export commonly used constants for convenience
pub use api::{BEARER_SCHEME, DEFAULT_BASE_URL};
pub use env::{BASE_URL as ENV_BASE_URL, DATA_DIR as ENV_DATA_DIR};
pub use files::{PDF_INDEX_FILE, SESSION_FILE, TEMP_FILE_SUFFIX};
pub use http::{CONNECT_TIMEOUT, REQUEST_TIMEOUT, USER_AGENT};
pub use storage::{APP_DIR_NAME, DOWNLOADS_DIR};
