//! In-memory evaluation backend
//!
//! Mirrors the paging, filtering and sorting rules of the real service closely enough to
//! drive the views in tests and in offline mode. Failures can be injected per operation
//! and every call is recorded.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::models::{
    ApiResponse, CreateVideoRequest, CreateVideoResponse, Frame, Highlight, PageQuery, Paginated,
    SortDirection, SortField, Video, VideoStatus, VideosQuery,
};
use super::EvaluationApi;
use crate::error::{ApiOperation, DashboardError, Result};
use crate::views::pagination::total_pages;

/// Default VMAF threshold below which frames are reported
pub const DEFAULT_FRAME_THRESHOLD: f64 = 90.0;

const DEFAULT_PAGE_SIZE: u32 = 10;

/// Injected failure for one operation
#[derive(Debug, Clone, PartialEq)]
pub enum MockFailure {
    /// Behave like a non-2xx response with this status text
    Transport(String),
    /// Answer with a `failed` envelope carrying this message
    Application(String),
}

/// A call received by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRequest {
    ListVideos(VideosQuery),
    ListHighlights(u64, PageQuery),
    ListFrames(u64, PageQuery),
    CreateVideo(CreateVideoRequest),
}

#[derive(Debug, Default)]
struct MockStore {
    videos: Vec<Video>,
    highlights: Vec<Highlight>,
    frames: Vec<Frame>,
    next_id: u64,
    failures: HashMap<ApiOperation, MockFailure>,
    requests: Vec<RecordedRequest>,
}

impl MockStore {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory [`EvaluationApi`] implementation
#[derive(Debug)]
pub struct MockEvaluationApi {
    store: Mutex<MockStore>,
    frame_threshold: f64,
}

impl Default for MockEvaluationApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEvaluationApi {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(MockStore::default()),
            frame_threshold: DEFAULT_FRAME_THRESHOLD,
        }
    }

    pub fn with_frame_threshold(mut self, threshold: f64) -> Self {
        self.frame_threshold = threshold;
        self
    }

    /// Backend seeded with a small deterministic library for offline use
    pub fn with_demo_data() -> Self {
        const TITLES: [&str; 8] = [
            "Champions League Final",
            "Evening News Recap",
            "Concert Encore",
            "Derby Highlights",
            "Product Launch Keynote",
            "Marathon Finish Line",
            "Cooking Show Episode",
            "Esports Grand Final",
        ];

        let api = Self::new();
        for index in 0..24u64 {
            let status = match index % 6 {
                0 | 1 | 2 => VideoStatus::Completed,
                3 => VideoStatus::Processing,
                4 => VideoStatus::Downloading,
                _ => VideoStatus::Failed,
            };
            let title = format!("{} #{}", TITLES[(index % 8) as usize], index / 8 + 1);
            let video_id = api.add_video(&title, status);

            match status {
                VideoStatus::Completed => {
                    for part in 0..3u64 {
                        let mean = 93.0 - (index % 5) as f64 * 4.0 - part as f64 * 2.5;
                        let highlight_id = api.add_highlight(
                            video_id,
                            Some(20.0 + part as f64 * 7.5),
                            Some((mean, mean - 25.0, (mean + 6.0).min(100.0))),
                        );
                        for frame_num in 0..15u64 {
                            let vmaf = 35.0 + ((frame_num * 37 + part * 11) % 60) as f64;
                            api.add_frame(highlight_id, frame_num * 24, vmaf, frame_num % 7 != 6);
                        }
                    }
                }
                VideoStatus::Processing => {
                    api.add_highlight(video_id, None, None);
                }
                _ => {}
            }
        }
        api
    }

    fn store(&self) -> MutexGuard<'_, MockStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a video and return its id
    pub fn add_video(&self, title: &str, status: VideoStatus) -> u64 {
        let mut store = self.store();
        let id = store.allocate_id();
        store.videos.push(Video {
            id,
            title: title.to_string(),
            original_url: Some(format!("https://media.example.com/videos/{}/original.mp4", id)),
            highlight_url: Some(format!("https://media.example.com/videos/{}/highlight.mp4", id)),
            status,
        });
        id
    }

    /// Add a highlight; `scores` is `(mean, min, max)`, `None` while processing
    pub fn add_highlight(
        &self,
        video_id: u64,
        duration: Option<f64>,
        scores: Option<(f64, f64, f64)>,
    ) -> u64 {
        let mut store = self.store();
        let id = store.allocate_id();
        store.highlights.push(Highlight {
            id,
            video_id,
            duration,
            vmaf_mean: scores.map(|s| s.0),
            vmaf_min: scores.map(|s| s.1),
            vmaf_max: scores.map(|s| s.2),
        });
        id
    }

    /// Add a scored frame; `with_images = false` leaves the highlight image missing
    pub fn add_frame(&self, highlight_id: u64, frame_num: u64, vmaf: f64, with_images: bool) -> u64 {
        let mut store = self.store();
        let id = store.allocate_id();
        store.frames.push(Frame {
            id,
            highlight_id,
            frame_num,
            vmaf,
            origin_url: Some(format!(
                "https://media.example.com/frames/{}/original/{}.jpg",
                highlight_id, frame_num
            )),
            highlight_url: with_images.then(|| {
                format!(
                    "https://media.example.com/frames/{}/highlight/{}.jpg",
                    highlight_id, frame_num
                )
            }),
        });
        id
    }

    /// Make every subsequent call of `operation` fail until cleared
    pub fn fail(&self, operation: ApiOperation, failure: MockFailure) {
        self.store().failures.insert(operation, failure);
    }

    pub fn clear_failures(&self) {
        self.store().failures.clear();
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.store().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.store().requests.len()
    }

    pub fn video_count(&self) -> usize {
        self.store().videos.len()
    }

    /// Record the call and apply an injected failure, if any
    fn intercept<T>(
        &self,
        operation: ApiOperation,
        request: RecordedRequest,
    ) -> Option<Result<ApiResponse<T>>> {
        let mut store = self.store();
        store.requests.push(request);
        match store.failures.get(&operation) {
            Some(MockFailure::Transport(reason)) => {
                Some(Err(DashboardError::transport(operation, reason.clone())))
            }
            Some(MockFailure::Application(message)) => Some(Ok(ApiResponse::failed(400, message))),
            None => None,
        }
    }
}

fn paginate<T>(items: Vec<T>, page: Option<u32>, size: Option<u32>) -> Paginated<T> {
    let size = size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let page = page.unwrap_or(1).max(1);
    let total_items = items.len() as u64;
    let start = (page as usize - 1).saturating_mul(size as usize);

    Paginated {
        items: items.into_iter().skip(start).take(size as usize).collect(),
        total_items,
        total_pages: total_pages(total_items, size),
        current_page: page,
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[async_trait]
impl EvaluationApi for MockEvaluationApi {
    async fn list_videos(&self, query: &VideosQuery) -> Result<ApiResponse<Paginated<Video>>> {
        if let Some(result) =
            self.intercept(ApiOperation::FetchVideos, RecordedRequest::ListVideos(query.clone()))
        {
            return result;
        }

        let mut videos = self.store().videos.clone();

        if let Some(status) = query.status_filter {
            videos.retain(|video| video.status == status);
        }
        if let Some(needle) = query.query.as_deref().map(str::to_lowercase) {
            videos.retain(|video| video.title.to_lowercase().contains(&needle));
        }

        let order_by = query.order_by.unwrap_or_default();
        let direction = query.order_direction.unwrap_or_default();
        videos.sort_by(|a, b| {
            let ordering = match order_by {
                SortField::Id => a.id.cmp(&b.id),
                SortField::Title => a
                    .title
                    .to_lowercase()
                    .cmp(&b.title.to_lowercase())
                    .then(a.id.cmp(&b.id)),
                SortField::Status => a.status.code().cmp(&b.status.code()).then(a.id.cmp(&b.id)),
            };
            directed(ordering, direction)
        });

        Ok(ApiResponse::success(
            paginate(videos, query.page, query.size),
            "Videos retrieved",
        ))
    }

    async fn list_highlights(
        &self,
        video_id: u64,
        query: &PageQuery,
    ) -> Result<ApiResponse<Paginated<Highlight>>> {
        if let Some(result) = self.intercept(
            ApiOperation::FetchHighlights,
            RecordedRequest::ListHighlights(video_id, query.clone()),
        ) {
            return result;
        }

        let (exists, mut highlights) = {
            let store = self.store();
            let exists = store.videos.iter().any(|video| video.id == video_id);
            let highlights: Vec<Highlight> = store
                .highlights
                .iter()
                .filter(|highlight| highlight.video_id == video_id)
                .cloned()
                .collect();
            (exists, highlights)
        };

        if !exists {
            return Ok(ApiResponse::failed(404, "Video not found"));
        }

        let direction = query.order_direction.unwrap_or(SortDirection::Asc);
        match query.order_by.as_deref().unwrap_or("id") {
            "id" => highlights.sort_by(|a, b| directed(a.id.cmp(&b.id), direction)),
            other => {
                return Ok(ApiResponse::failed(
                    422,
                    &format!("Unsupported order_by '{}'", other),
                ))
            }
        }

        Ok(ApiResponse::success(
            paginate(highlights, query.page, query.size),
            "Highlights retrieved",
        ))
    }

    async fn list_frames(
        &self,
        highlight_id: u64,
        query: &PageQuery,
    ) -> Result<ApiResponse<Paginated<Frame>>> {
        if let Some(result) = self.intercept(
            ApiOperation::FetchFrames,
            RecordedRequest::ListFrames(highlight_id, query.clone()),
        ) {
            return result;
        }

        let mut frames: Vec<Frame> = self
            .store()
            .frames
            .iter()
            .filter(|frame| frame.highlight_id == highlight_id && frame.vmaf < self.frame_threshold)
            .cloned()
            .collect();

        let direction = query.order_direction.unwrap_or(SortDirection::Asc);
        match query.order_by.as_deref().unwrap_or("frame_num") {
            "frame_num" => {
                frames.sort_by(|a, b| directed(a.frame_num.cmp(&b.frame_num), direction))
            }
            "vmaf" => frames.sort_by(|a, b| directed(a.vmaf.total_cmp(&b.vmaf), direction)),
            "id" => frames.sort_by(|a, b| directed(a.id.cmp(&b.id), direction)),
            other => {
                return Ok(ApiResponse::failed(
                    422,
                    &format!("Unsupported order_by '{}'", other),
                ))
            }
        }

        Ok(ApiResponse::success(
            paginate(frames, query.page, query.size),
            "Frames retrieved",
        ))
    }

    async fn create_video(
        &self,
        request: &CreateVideoRequest,
    ) -> Result<ApiResponse<CreateVideoResponse>> {
        if let Some(result) = self.intercept(
            ApiOperation::CreateVideo,
            RecordedRequest::CreateVideo(request.clone()),
        ) {
            return result;
        }

        let title = request.title.trim();
        let original_url = request.original_url.trim();
        let highlight_url = request.highlight_url.trim();

        if title.is_empty() || original_url.is_empty() || highlight_url.is_empty() {
            return Ok(ApiResponse::failed(
                400,
                "title, original_url and highlight_url are required",
            ));
        }
        if !is_http_url(original_url) || !is_http_url(highlight_url) {
            return Ok(ApiResponse::failed(422, "Video URLs must be http(s) URLs"));
        }

        let mut store = self.store();
        let video = Video {
            id: store.allocate_id(),
            title: title.to_string(),
            original_url: Some(original_url.to_string()),
            highlight_url: Some(highlight_url.to_string()),
            status: VideoStatus::Downloading,
        };
        store.videos.push(video.clone());

        Ok(ApiResponse::success(video, "Video job created"))
    }
}
