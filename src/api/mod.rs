//! Access to the VMAF evaluation backend
//!
//! Every backend call goes through the [`EvaluationApi`] trait so views can be driven
//! by the HTTP client in production and by [`mock::MockEvaluationApi`] in tests and
//! offline mode.

use async_trait::async_trait;

use crate::config::ApiConfig;
use crate::error::Result;

pub mod client;
pub mod lookup;
pub mod mock;
pub mod models;

pub use client::HttpEvaluationClient;
pub use lookup::{fetch_video_by_id, VideoLookup, DEFAULT_LOOKUP_SCAN_SIZE};
pub use mock::{MockEvaluationApi, MockFailure};
pub use models::{
    ApiResponse, CreateVideoRequest, CreateVideoResponse, Frame, Highlight, PageQuery, Paginated,
    SortDirection, SortField, Video, VideoStatus, VideosQuery,
};

/// Trait for evaluation backends
///
/// Implementations return the decoded envelope untouched. A `failed` envelope is a
/// successful call; only transport problems surface as `Err`.
#[async_trait]
pub trait EvaluationApi: Send + Sync {
    async fn list_videos(&self, query: &VideosQuery) -> Result<ApiResponse<Paginated<Video>>>;

    async fn list_highlights(
        &self,
        video_id: u64,
        query: &PageQuery,
    ) -> Result<ApiResponse<Paginated<Highlight>>>;

    async fn list_frames(
        &self,
        highlight_id: u64,
        query: &PageQuery,
    ) -> Result<ApiResponse<Paginated<Frame>>>;

    async fn create_video(
        &self,
        request: &CreateVideoRequest,
    ) -> Result<ApiResponse<CreateVideoResponse>>;
}

/// Create the HTTP backend client from configuration
pub fn create_client(config: &ApiConfig) -> Result<Box<dyn EvaluationApi>> {
    Ok(Box::new(HttpEvaluationClient::new(config)?))
}
