//! Video detail screen controller
//!
//! Shows one video with its study PDFs. Downloads run through the
//! repository with a per-PDF progress indicator; a finished download hands
//! its path to the UI exactly once through `ready_to_open`.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::ScreenState;
use crate::app::models::Video;
use crate::app::repository::ContentRepository;
use crate::app::session::SessionStore;

const LOAD_FAILED: &str = "Failed to load video. Please try again.";

/// Video detail screen state
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDetailState {
    pub video: ScreenState<Video>,
    /// PDF id currently downloading, if any
    pub downloading_pdf: Option<i64>,
    /// Path of a just-finished download, until the UI consumes it
    pub ready_to_open: Option<PathBuf>,
}

/// Controller backing the video detail screen
pub struct VideoDetailController {
    repository: Arc<ContentRepository>,
    session: Arc<SessionStore>,
    state: watch::Sender<VideoDetailState>,
}

impl VideoDetailController {
    pub fn new(repository: Arc<ContentRepository>, session: Arc<SessionStore>) -> Self {
        let (state, _) = watch::channel(VideoDetailState {
            video: ScreenState::Loading,
            downloading_pdf: None,
            ready_to_open: None,
        });
        Self {
            repository,
            session,
            state,
        }
    }

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<VideoDetailState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> VideoDetailState {
        self.state.borrow().clone()
    }

    /// Load the video with this id
    ///
    /// An id the catalog does not contain shows the screen's own
    /// not-found state, not an error banner.
    pub async fn load(&self, video_id: i64) {
        self.state
            .send_modify(|state| state.video = ScreenState::Loading);

        let video = match self.repository.video_by_id(video_id).await {
            Ok(Some(video)) => ScreenState::Content(video),
            Ok(None) => {
                debug!("Video {} not found in catalog", video_id);
                ScreenState::Empty
            }
            Err(e) => {
                warn!("Video detail load failed: {}", e);
                ScreenState::Error(LOAD_FAILED.to_string())
            }
        };

        self.state.send_modify(|state| state.video = video);
    }

    /// Download one of the loaded video's PDFs
    ///
    /// No-op unless a video is loaded, the PDF belongs to it, a user is
    /// logged in, and no other download is running. Failures clear the
    /// indicator without surfacing an error; the screen simply returns to
    /// its idle state.
    pub async fn download_pdf(&self, pdf_id: i64) {
        let (video, busy) = {
            let state = self.state.borrow();
            (state.video.content().cloned(), state.downloading_pdf.is_some())
        };

        if busy {
            debug!("Ignoring download request while another is running");
            return;
        }
        let video = match video {
            Some(video) => video,
            None => {
                debug!("Ignoring download request with no loaded video");
                return;
            }
        };
        let pdf = match video.pdfs.iter().find(|pdf| pdf.id == pdf_id) {
            Some(pdf) => pdf.clone(),
            None => {
                warn!("Video {} has no PDF {}", video.id, pdf_id);
                return;
            }
        };
        let user_id = self.session.user_id();
        if user_id.is_none() {
            debug!("Ignoring download request without a logged-in user");
            return;
        }

        self.state
            .send_modify(|state| state.downloading_pdf = Some(pdf_id));

        match self
            .repository
            .download_pdf(video.id, pdf_id, user_id, &pdf.title)
            .await
        {
            Ok(path) => {
                self.state.send_modify(|state| {
                    state.downloading_pdf = None;
                    state.ready_to_open = Some(path);
                });
            }
            Err(e) => {
                warn!("Download of PDF {} failed: {}", pdf_id, e);
                self.state
                    .send_modify(|state| state.downloading_pdf = None);
            }
        }
    }

    /// Take the finished-download path, if one is waiting
    ///
    /// The path is handed out exactly once so the UI opens the file a
    /// single time per download.
    pub fn consume_ready_to_open(&self) -> Option<PathBuf> {
        let mut taken = None;
        self.state
            .send_modify(|state| taken = state.ready_to_open.take());
        taken
    }
}
