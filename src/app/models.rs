//! Data models for Lesson Fetcher
//!
//! This module defines the wire-format types exchanged with the lesson
//! catalog backend and the domain types the rest of the application
//! consumes. Wire types mirror the backend's camelCase JSON; conversion
//! into domain types applies the display-order sorting screens rely on.

use serde::{Deserialize, Serialize};

/// Signup request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_number: String,
    pub password: String,
}

/// Login request body
///
/// `username` accepts either the account email or the mobile number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Authentication response returned by both signup and login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub mobile_number: Option<String>,
}

/// Error body the backend attaches to non-success responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Section as returned by the section listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDto {
    pub name: String,
}

/// Video as returned by the per-section video listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDto {
    pub id: i64,
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub duration: String,
    pub display_order: i32,
    #[serde(default)]
    pub pdfs: Vec<PdfDto>,
}

/// PDF attachment as returned inside a video listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfDto {
    pub id: i64,
    pub title: String,
    pub pdf_type: String,
    pub file_url: String,
    pub display_order: i32,
}

/// Signed, time-limited download URL issued for one PDF
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfDownloadResponse {
    pub url: String,
    pub expires_in_seconds: i64,
}

/// Video with display-ready ordering applied
#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub id: i64,
    /// External playback-platform id
    pub remote_video_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub display_order: i32,
    /// Study material, ascending by display order
    pub pdfs: Vec<Pdf>,
}

impl Video {
    /// Whether the video carries downloadable study material
    pub fn has_pdfs(&self) -> bool {
        !self.pdfs.is_empty()
    }
}

/// PDF study material attached to a video
#[derive(Debug, Clone, PartialEq)]
pub struct Pdf {
    pub id: i64,
    pub title: String,
    pub pdf_type: String,
    pub file_url: String,
    pub display_order: i32,
}

/// A section with its videos attached, as composed for display
#[derive(Debug, Clone, PartialEq)]
pub struct SectionWithVideos {
    pub name: String,
    pub videos: Vec<Video>,
}

impl From<PdfDto> for Pdf {
    fn from(dto: PdfDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            pdf_type: dto.pdf_type,
            file_url: dto.file_url,
            display_order: dto.display_order,
        }
    }
}

impl From<VideoDto> for Video {
    fn from(dto: VideoDto) -> Self {
        let mut pdfs: Vec<Pdf> = dto.pdfs.into_iter().map(Pdf::from).collect();
        // sort_by_key is stable, so ties keep backend order
        pdfs.sort_by_key(|p| p.display_order);

        Self {
            id: dto.id,
            remote_video_id: dto.video_id,
            title: dto.title,
            thumbnail_url: dto.thumbnail_url,
            duration: dto.duration,
            display_order: dto.display_order,
            pdfs,
        }
    }
}

/// Convert a wire video listing into display-ready domain videos
///
/// Videos are sorted ascending by display order (stable on ties) and each
/// video's PDFs are sorted the same way during conversion.
pub fn videos_from_listing(dtos: Vec<VideoDto>) -> Vec<Video> {
    let mut videos: Vec<Video> = dtos.into_iter().map(Video::from).collect();
    videos.sort_by_key(|v| v.display_order);
    videos
}
