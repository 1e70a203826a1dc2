//! Resources screen controller
//!
//! Browses sections for study material: picking a section lists only the
//! videos that actually carry PDFs.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::ScreenState;
use crate::app::models::Video;
use crate::app::repository::ContentRepository;

const SECTIONS_FAILED: &str = "Failed to load sections.";
const VIDEOS_FAILED: &str = "Failed to load videos.";

/// Resources screen state
#[derive(Debug, Clone, PartialEq)]
pub struct ResourcesState {
    pub sections: ScreenState<Vec<String>>,
    pub selected: Option<String>,
    pub videos: ScreenState<Vec<Video>>,
}

/// Controller backing the resources screen
pub struct ResourcesController {
    repository: Arc<ContentRepository>,
    state: watch::Sender<ResourcesState>,
}

impl ResourcesController {
    pub fn new(repository: Arc<ContentRepository>) -> Self {
        let (state, _) = watch::channel(ResourcesState {
            sections: ScreenState::Loading,
            selected: None,
            videos: ScreenState::Empty,
        });
        Self { repository, state }
    }

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<ResourcesState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ResourcesState {
        self.state.borrow().clone()
    }

    /// Load the section list
    pub async fn load_sections(&self) {
        self.state
            .send_modify(|state| state.sections = ScreenState::Loading);

        let sections = match self.repository.sections().await {
            Ok(names) if names.is_empty() => ScreenState::Empty,
            Ok(names) => ScreenState::Content(names),
            Err(e) => {
                warn!("Section list load failed: {}", e);
                ScreenState::Error(SECTIONS_FAILED.to_string())
            }
        };

        self.state.send_modify(|state| state.sections = sections);
    }

    /// Pick a section and list its videos that carry PDFs
    ///
    /// Re-selecting the current section does nothing.
    pub async fn select_section(&self, name: &str) {
        if self.state.borrow().selected.as_deref() == Some(name) {
            debug!("Section {} already selected", name);
            return;
        }

        self.state.send_modify(|state| {
            state.selected = Some(name.to_string());
            state.videos = ScreenState::Loading;
        });

        let videos = match self.repository.videos_by_section(name).await {
            Ok(videos) => {
                let with_pdfs: Vec<Video> =
                    videos.into_iter().filter(Video::has_pdfs).collect();
                if with_pdfs.is_empty() {
                    ScreenState::Empty
                } else {
                    ScreenState::Content(with_pdfs)
                }
            }
            Err(e) => {
                warn!("Video list load failed for section {}: {}", name, e);
                ScreenState::Error(VIDEOS_FAILED.to_string())
            }
        };

        self.state.send_modify(|state| state.videos = videos);
    }
}
