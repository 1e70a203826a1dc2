//! Content retrieval combining the API client, download cache, and transfer
//!
//! The repository is the single data source the view-state controllers talk
//! to. It normalizes wire listings into domain types with a stable display
//! order, fans out the per-section fetches that make up the home catalog,
//! and owns the full PDF download sequence from signed-URL issuance to the
//! recorded cache entry.

use std::path::PathBuf;
use std::sync::Arc;

use futures::future::try_join_all;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::app::cache::PdfCache;
use crate::app::client::{ApiClient, ClientConfig, DownloadHandler};
use crate::app::models::{videos_from_listing, SectionWithVideos, Video};
use crate::errors::{ApiResult, DownloadError, DownloadResult};

/// Aggregated content access for the UI layer
pub struct ContentRepository {
    api: Arc<ApiClient>,
    cache: Arc<PdfCache>,
    download_client: Client,
}

impl ContentRepository {
    /// Create a repository over an API client and download cache
    ///
    /// Signed-URL fetches use a dedicated client with a longer timeout and
    /// no session attached, built from the same tuning config.
    pub fn new(
        api: Arc<ApiClient>,
        cache: Arc<PdfCache>,
        config: &ClientConfig,
    ) -> ApiResult<Self> {
        let download_client = config.build_download_client()?;
        Ok(Self {
            api,
            cache,
            download_client,
        })
    }

    /// Fetch the full home catalog: every section with its videos
    ///
    /// Sections are fetched first, then one videos request per section runs
    /// concurrently. Results keep the backend's section order; videos and
    /// their PDFs are sorted ascending by display order. Any failed section
    /// fails the whole call, so the catalog is never partially stale.
    pub async fn home_sections(&self) -> ApiResult<Vec<SectionWithVideos>> {
        let sections = self.api.sections().await?;
        debug!("Fetched {} sections for home catalog", sections.len());

        let api = &self.api;
        let fetches = sections.into_iter().map(|section| async move {
            let listing = api.videos_by_section(&section.name).await?;
            Ok(SectionWithVideos {
                name: section.name,
                videos: videos_from_listing(listing),
            })
        });

        try_join_all(fetches).await
    }

    /// List section names in backend order
    pub async fn sections(&self) -> ApiResult<Vec<String>> {
        let sections = self.api.sections().await?;
        Ok(sections.into_iter().map(|section| section.name).collect())
    }

    /// Fetch one section's videos, sorted by display order
    pub async fn videos_by_section(&self, section: &str) -> ApiResult<Vec<Video>> {
        let listing = self.api.videos_by_section(section).await?;
        Ok(videos_from_listing(listing))
    }

    /// Find a video anywhere in the catalog by its numeric id
    ///
    /// The backend has no direct video endpoint, so this walks the full
    /// catalog. An unknown id is `Ok(None)`, not an error.
    pub async fn video_by_id(&self, video_id: i64) -> ApiResult<Option<Video>> {
        let sections = self.home_sections().await?;
        Ok(sections
            .into_iter()
            .flat_map(|section| section.videos)
            .find(|video| video.id == video_id))
    }

    /// Download one PDF, returning the local path it lives at
    ///
    /// Concurrent requests for the same (user, video, pdf) serialize on an
    /// in-flight guard; the loser re-checks the cache and returns the
    /// winner's file without a second transfer. The sequence on a miss:
    /// request a signed URL, stream the body to the per-user destination
    /// through a temp file, then record the mapping. The transfer itself
    /// never carries session credentials.
    pub async fn download_pdf(
        &self,
        video_id: i64,
        pdf_id: i64,
        user_id: Option<i64>,
        title: &str,
    ) -> DownloadResult<PathBuf> {
        let _guard = self.cache.begin_download((user_id, video_id, pdf_id)).await;

        // A concurrent download may have finished while we waited
        if let Some(path) = self.cache.get_path(user_id, video_id, pdf_id).await? {
            debug!(
                "PDF {} of video {} already cached at {}",
                pdf_id,
                video_id,
                path.display()
            );
            return Ok(path);
        }

        let issued = self.api.pdf_download_url(video_id, pdf_id).await?;
        if issued.url.trim().is_empty() {
            return Err(DownloadError::EmptySignedUrl);
        }
        let url = Url::parse(&issued.url).map_err(|e| DownloadError::InvalidUrl {
            url: issued.url.clone(),
            source: e,
        })?;
        debug!(
            "Signed URL for video {} pdf {} expires in {}s",
            video_id, pdf_id, issued.expires_in_seconds
        );

        let destination = self.cache.destination(user_id, title);
        let handler = DownloadHandler::new(&self.download_client);
        let bytes = handler.fetch_to_file(&url, &destination).await?;

        self.cache
            .save_path(user_id, video_id, pdf_id, &destination)
            .await?;

        info!(
            "Downloaded PDF {} of video {} ({} bytes) to {}",
            pdf_id,
            video_id,
            bytes,
            destination.display()
        );
        Ok(destination)
    }
}
