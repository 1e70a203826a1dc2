//! Error types for Lesson Fetcher
//!
//! This module defines error types for all components of the application.
//! Errors are designed to be actionable and provide clear context for
//! debugging and user feedback.

use std::path::PathBuf;
use thiserror::Error;

/// Session persistence errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// I/O error reading or writing the session record
    #[error("Session storage I/O error")]
    Io(#[from] std::io::Error),

    /// Session record exists but does not parse
    #[error("Session record is corrupted: {path}")]
    InvalidRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Session record could not be serialized
    #[error("Session record serialization failed")]
    Serialize(#[source] serde_json::Error),

    /// Atomic file operation failed
    #[error("Atomic session write failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
    },
}

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure: connectivity, DNS, timeout, or body decode
    #[error("HTTP request failed")]
    Transport(#[from] reqwest::Error),

    /// Server replied with a non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Base URL cannot be extended with endpoint path segments
    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl { url: String },
}

/// PDF download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Signed-URL issuance failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Backend issued an empty download URL
    #[error("Backend returned an empty download URL")]
    EmptySignedUrl,

    /// Signed URL does not parse
    #[error("Invalid download URL: {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// HTTP request error during file transfer
    #[error("File transfer failed")]
    Http(#[from] reqwest::Error),

    /// File host returned an error status for the signed URL
    #[error("Download failed: HTTP {status}")]
    ServerError { status: u16 },

    /// I/O error during file operations
    #[error("File I/O error")]
    Io(#[from] std::io::Error),

    /// Atomic file operation failed
    #[error("Atomic file operation failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
    },

    /// Recording the download in the cache index failed
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Download cache errors
#[derive(Error, Debug)]
pub enum CacheError {
    /// Downloads directory not found or inaccessible
    #[error("Downloads directory not accessible: {path}")]
    DirectoryNotAccessible { path: PathBuf },

    /// I/O error during index operations
    #[error("Download index I/O error")]
    Io(#[from] std::io::Error),

    /// Index file exists but does not parse
    #[error("Download index corrupted: {path}")]
    IndexCorrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Index could not be serialized
    #[error("Download index serialization failed")]
    Serialize(#[source] serde_json::Error),

    /// Atomic file operation failed
    #[error("Atomic index write failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// API client error
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Cache error
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Session(_) => "session",
            AppError::Api(_) => "api",
            AppError::Download(_) => "download",
            AppError::Cache(_) => "cache",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Session result type alias
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// API result type alias
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Cache result type alias
pub type CacheResult<T> = std::result::Result<T, CacheError>;
