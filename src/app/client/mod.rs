//! HTTP client for the lesson catalog backend
//!
//! This module provides the typed REST binding used by the repository and
//! auth flows, with outgoing requests signed from the session store.
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `download`: signed-URL file download with atomic writes

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::app::models::{
    ApiErrorBody, AuthResponse, LoginRequest, PdfDownloadResponse, SectionDto, SignupRequest,
    VideoDto,
};
use crate::app::session::SessionStore;
use crate::constants::api;
use crate::errors::{ApiError, ApiResult};

// Module declarations
pub mod config;
pub mod download;

// Re-export public types
pub use config::ClientConfig;
pub use download::DownloadHandler;

/// Typed client for the lesson catalog REST API
///
/// Every outgoing request reads the session token at send time and
/// attaches `Authorization: Bearer <token>` when one is present; without
/// a token the request goes out unauthenticated and the server decides
/// access.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Creates a client with default configuration
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the base URL cannot carry path segments or
    /// HTTP client creation fails
    pub fn new(base_url: Url, session: Arc<SessionStore>) -> ApiResult<Self> {
        Self::with_config(base_url, &ClientConfig::default(), session)
    }

    /// Creates a client with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the base URL cannot carry path segments or
    /// HTTP client creation fails
    pub fn with_config(
        base_url: Url,
        config: &ClientConfig,
        session: Arc<SessionStore>,
    ) -> ApiResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
            });
        }

        let http = config.build_api_client()?;
        debug!("Created API client for {}", base_url);

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// Register a new account
    pub async fn signup(&self, request: &SignupRequest) -> ApiResult<AuthResponse> {
        let url = self.endpoint(api::SIGNUP_PATH);
        self.execute(self.http.post(url).json(request)).await
    }

    /// Exchange credentials for a session token
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        let url = self.endpoint(api::LOGIN_PATH);
        self.execute(self.http.post(url).json(request)).await
    }

    /// List all sections
    pub async fn sections(&self) -> ApiResult<Vec<SectionDto>> {
        let url = self.endpoint(api::SECTIONS_PATH);
        self.execute(self.http.get(url)).await
    }

    /// List the videos of one section
    ///
    /// The section name travels as a path segment, so percent-encoding is
    /// applied during URL construction.
    pub async fn videos_by_section(&self, section: &str) -> ApiResult<Vec<VideoDto>> {
        let url = self.endpoint(&["api", "sections", section, "videos"]);
        self.execute(self.http.get(url)).await
    }

    /// Request a signed, time-limited download URL for one PDF
    pub async fn pdf_download_url(
        &self,
        video_id: i64,
        pdf_id: i64,
    ) -> ApiResult<PdfDownloadResponse> {
        let video_id = video_id.to_string();
        let pdf_id = pdf_id.to_string();
        let url = self.endpoint(&["api", "videos", &video_id, "pdfs", &pdf_id, "download"]);
        self.execute(self.http.get(url)).await
    }

    /// Base URL the client is bound to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .expect("base URL validated at construction");
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    /// Attach the bearer token if one is present at send time
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.current_token() {
            Some(token) => request.header(
                AUTHORIZATION,
                format!("{} {}", api::BEARER_SCHEME, token),
            ),
            None => request,
        }
    }

    /// Send a request and decode the typed response
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await.ok();
            return Err(Self::status_error(status, body.as_deref()));
        }

        Ok(response.json::<T>().await?)
    }

    /// Map a non-success response to a status error
    ///
    /// The body is parsed best-effort for the backend's `{"message"}`
    /// shape; anything else falls back to a status-derived message.
    fn status_error(status: StatusCode, body: Option<&[u8]>) -> ApiError {
        let message = body
            .and_then(|bytes| serde_json::from_slice::<ApiErrorBody>(bytes).ok())
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}
