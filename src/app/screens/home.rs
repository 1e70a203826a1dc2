//! Home screen controller
//!
//! Owns the sectioned video catalog and the currently selected video that
//! the UI renders as a detail overlay.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::ScreenState;
use crate::app::models::{SectionWithVideos, Video};
use crate::app::repository::ContentRepository;

const LOAD_FAILED: &str = "Failed to load videos. Please try again.";

/// Home screen state
#[derive(Debug, Clone, PartialEq)]
pub struct HomeState {
    pub catalog: ScreenState<Vec<SectionWithVideos>>,
    pub selected_video: Option<Video>,
}

/// Controller backing the home screen
pub struct HomeController {
    repository: Arc<ContentRepository>,
    state: watch::Sender<HomeState>,
}

impl HomeController {
    pub fn new(repository: Arc<ContentRepository>) -> Self {
        let (state, _) = watch::channel(HomeState {
            catalog: ScreenState::Loading,
            selected_video: None,
        });
        Self { repository, state }
    }

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<HomeState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> HomeState {
        self.state.borrow().clone()
    }

    /// Load (or reload) the full catalog
    pub async fn load(&self) {
        self.state
            .send_modify(|state| state.catalog = ScreenState::Loading);

        let catalog = match self.repository.home_sections().await {
            Ok(sections) if sections.is_empty() => ScreenState::Empty,
            Ok(sections) => {
                debug!("Loaded {} home sections", sections.len());
                ScreenState::Content(sections)
            }
            Err(e) => {
                warn!("Home catalog load failed: {}", e);
                ScreenState::Error(LOAD_FAILED.to_string())
            }
        };

        self.state.send_modify(|state| state.catalog = catalog);
    }

    /// Select a video from the loaded catalog for the detail overlay
    ///
    /// Ignored unless the catalog holds a video with this id.
    pub fn select_video(&self, video_id: i64) {
        let found = match self.state.borrow().catalog.content() {
            Some(sections) => sections
                .iter()
                .flat_map(|section| section.videos.iter())
                .find(|video| video.id == video_id)
                .cloned(),
            None => None,
        };

        match found {
            Some(video) => {
                self.state
                    .send_modify(|state| state.selected_video = Some(video));
            }
            None => debug!("Ignoring selection of unknown video {}", video_id),
        }
    }

    /// Dismiss the detail overlay
    pub fn clear_selection(&self) {
        self.state
            .send_modify(|state| state.selected_video = None);
    }
}
