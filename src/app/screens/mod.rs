//! Per-screen view-state controllers
//!
//! Each screen of the client maps to one controller that owns that screen's
//! state and publishes every change through a `tokio::sync::watch` channel.
//! A UI layer (or the CLI driver) subscribes, renders whatever the current
//! state says, and calls controller methods in response to user actions.
//! Controllers translate every failure into the exact user-facing copy the
//! screen shows; raw error details go to the log, never to the state.
//!
//! # Module Organization
//!
//! - [`login`] - Credential entry and session establishment
//! - [`signup`] - Account registration
//! - [`home`] - The sectioned video catalog with a detail selection
//! - [`video_detail`] - One video with its study PDFs and downloads
//! - [`resources`] - Section browser filtered to videos carrying PDFs

pub mod home;
pub mod login;
pub mod resources;
pub mod signup;
pub mod video_detail;

// Re-export main public API
pub use home::{HomeController, HomeState};
pub use login::{LoginController, LoginState};
pub use resources::{ResourcesController, ResourcesState};
pub use signup::{SignupController, SignupState};
pub use video_detail::{VideoDetailController, VideoDetailState};

/// What a screen is currently showing
///
/// Exactly one variant at a time: a spinner, an error banner with its
/// user-facing message, an explicit empty state, or the loaded content.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState<T> {
    Loading,
    Error(String),
    Empty,
    Content(T),
}

impl<T> ScreenState<T> {
    /// Loaded content, if any
    pub fn content(&self) -> Option<&T> {
        match self {
            ScreenState::Content(value) => Some(value),
            _ => None,
        }
    }

    /// Error message, if the screen is showing one
    pub fn error(&self) -> Option<&str> {
        match self {
            ScreenState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ScreenState::Empty)
    }
}
