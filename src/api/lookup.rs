//! Single-video lookup
//!
//! The backend has no `GET /videos/{id}` endpoint. A video is found by requesting the
//! first page of the list in the backend's default order and scanning it, so only the
//! first `scan_size` videos can ever be found. Anything ranked later is reported as
//! [`VideoLookup::NotFound`] even though it exists.

use tracing::{debug, warn};

use super::models::{Video, VideosQuery};
use super::EvaluationApi;

/// Page size used for the scan
pub const DEFAULT_LOOKUP_SCAN_SIZE: u32 = 100;

/// Outcome of a single-video lookup
#[derive(Debug, Clone, PartialEq)]
pub enum VideoLookup {
    Found(Video),
    /// Not among the `scanned` records of the first page
    NotFound { scanned: usize },
}

impl VideoLookup {
    pub fn into_video(self) -> Option<Video> {
        match self {
            VideoLookup::Found(video) => Some(video),
            VideoLookup::NotFound { .. } => None,
        }
    }
}

/// Look a video up by scanning the first `scan_size` records of the list endpoint.
///
/// Transport errors and `failed` envelopes are logged and reported as not found.
pub async fn fetch_video_by_id(
    api: &dyn EvaluationApi,
    video_id: u64,
    scan_size: u32,
) -> VideoLookup {
    let query = VideosQuery::page(1, scan_size);

    let response = match api.list_videos(&query).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Video lookup for #{} failed: {}", video_id, e);
            return VideoLookup::NotFound { scanned: 0 };
        }
    };

    let page = match response.into_data("Failed to fetch video") {
        Ok(page) => page,
        Err(e) => {
            warn!("Video lookup for #{} rejected: {}", video_id, e);
            return VideoLookup::NotFound { scanned: 0 };
        }
    };

    let scanned = page.items.len();
    match page.items.into_iter().find(|video| video.id == video_id) {
        Some(video) => VideoLookup::Found(video),
        None => {
            debug!(
                "Video #{} not among the first {} records ({} total)",
                video_id, scanned, page.total_items
            );
            VideoLookup::NotFound { scanned }
        }
    }
}
