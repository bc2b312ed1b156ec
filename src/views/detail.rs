//! Video detail: source videos, highlights and at most one expanded frames panel

use tracing::{debug, info};

use super::frames::FramesView;
use super::generation::{GenerationCounter, LoadOutcome, LoadTicket};
use super::pagination::Pager;
use crate::api::lookup::{fetch_video_by_id, VideoLookup, DEFAULT_LOOKUP_SCAN_SIZE};
use crate::api::models::{
    present_url, ApiResponse, Highlight, PageQuery, Paginated, SortDirection, Video,
};
use crate::api::EvaluationApi;
use crate::error::{ApiOperation, Result};

pub const DEFAULT_HIGHLIGHTS_PAGE_SIZE: u32 = 20;

pub const VIDEO_NOT_FOUND_MESSAGE: &str = "Video not found";
pub const NO_HIGHLIGHTS_MESSAGE: &str = "No highlights found for this video";
pub const NO_VIDEO_URL_PLACEHOLDER: &str = "No video URL available";

#[derive(Debug, Clone)]
pub struct VideoDetailView {
    video_id: u64,
    video: Option<Video>,
    lookup_scan_size: u32,
    pager: Pager,
    highlights: Vec<Highlight>,
    error: Option<String>,
    loading: bool,
    loaded_once: bool,
    generation: GenerationCounter,
    expanded: Option<FramesView>,
}

impl VideoDetailView {
    pub fn new(video_id: u64) -> Self {
        Self::with_page_size(video_id, DEFAULT_HIGHLIGHTS_PAGE_SIZE)
    }

    pub fn with_page_size(video_id: u64, page_size: u32) -> Self {
        Self {
            video_id,
            video: None,
            lookup_scan_size: DEFAULT_LOOKUP_SCAN_SIZE,
            pager: Pager::new(page_size),
            highlights: Vec::new(),
            error: None,
            loading: false,
            loaded_once: false,
            generation: GenerationCounter::new(),
            expanded: None,
        }
    }

    /// Number of list records scanned when looking the video up
    pub fn with_lookup_scan_size(mut self, scan_size: u32) -> Self {
        self.lookup_scan_size = scan_size.max(1);
        self
    }

    pub fn video_id(&self) -> u64 {
        self.video_id
    }

    pub fn video(&self) -> Option<&Video> {
        self.video.as_ref()
    }

    /// Video title, or `Video #<id>` until the record is known
    pub fn title(&self) -> String {
        match &self.video {
            Some(video) => video.title.clone(),
            None => format!("Video #{}", self.video_id),
        }
    }

    pub fn original_url(&self) -> Option<&str> {
        self.video.as_ref().and_then(|v| present_url(&v.original_url))
    }

    pub fn highlight_url(&self) -> Option<&str> {
        self.video.as_ref().and_then(|v| present_url(&v.highlight_url))
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_initial_loading(&self) -> bool {
        self.loading && !self.loaded_once
    }

    pub fn expanded_highlight(&self) -> Option<u64> {
        self.expanded.as_ref().map(FramesView::highlight_id)
    }

    pub fn frames(&self) -> Option<&FramesView> {
        self.expanded.as_ref()
    }

    pub fn frames_mut(&mut self) -> Option<&mut FramesView> {
        self.expanded.as_mut()
    }

    /// Look the video record up. Returns whether it was found.
    pub async fn load_video(&mut self, api: &dyn EvaluationApi) -> bool {
        match fetch_video_by_id(api, self.video_id, self.lookup_scan_size).await {
            VideoLookup::Found(video) => {
                info!("🎬 Loaded video #{} ({})", video.id, video.title);
                self.video = Some(video);
                true
            }
            VideoLookup::NotFound { scanned } => {
                info!(
                    "Video #{} not found among the first {} records",
                    self.video_id, scanned
                );
                self.video = None;
                self.error = Some(VIDEO_NOT_FOUND_MESSAGE.to_string());
                false
            }
        }
    }

    pub fn highlights_query(&self) -> PageQuery {
        PageQuery::ordered(
            self.pager.page(),
            self.pager.page_size(),
            "id",
            SortDirection::Asc,
        )
    }

    /// Start loading highlights; `None` while the video itself is unknown
    pub fn begin_highlights_load(&mut self) -> Option<(LoadTicket, PageQuery)> {
        self.video.as_ref()?;
        self.loading = true;
        self.error = None;
        Some((self.generation.issue(), self.highlights_query()))
    }

    pub fn finish_highlights_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<ApiResponse<Paginated<Highlight>>>,
    ) -> LoadOutcome {
        if !self.generation.is_current(ticket) {
            debug!(
                "Dropping stale highlights response for video #{} (generation {})",
                self.video_id,
                ticket.generation()
            );
            return LoadOutcome::Stale;
        }

        self.loading = false;
        self.loaded_once = true;

        let page = result.and_then(|response| {
            response.into_data(ApiOperation::FetchHighlights.failure_message())
        });
        match page {
            Ok(page) => {
                self.pager.update_totals(&page);
                self.highlights = page.items;
                LoadOutcome::Applied
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(message.clone());
                LoadOutcome::Failed(message)
            }
        }
    }

    pub async fn load_highlights(&mut self, api: &dyn EvaluationApi) -> LoadOutcome {
        let Some((ticket, query)) = self.begin_highlights_load() else {
            return LoadOutcome::Skipped;
        };
        let result = api.list_highlights(self.video_id, &query).await;
        self.finish_highlights_load(ticket, result)
    }

    /// Load the video record, then its highlights when it was found
    pub async fn refresh(&mut self, api: &dyn EvaluationApi) -> LoadOutcome {
        if self.video.is_none() && !self.load_video(api).await {
            return LoadOutcome::Failed(VIDEO_NOT_FOUND_MESSAGE.to_string());
        }
        self.load_highlights(api).await
    }

    /// Expand `highlight_id`, or collapse it when it is already expanded.
    ///
    /// Returns true when a new frames panel was mounted and needs loading.
    pub fn toggle_highlight(&mut self, highlight_id: u64) -> bool {
        if self.expanded_highlight() == Some(highlight_id) {
            self.expanded = None;
            false
        } else {
            self.expanded = Some(FramesView::new(highlight_id));
            true
        }
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    /// Position the first load on `page`; see [`Pager::seek`]
    pub fn seek_page(&mut self, page: u32) {
        self.pager.seek(page);
    }

    pub fn go_to_page(&mut self, page: u32) -> bool {
        self.pager.go_to(page)
    }

    pub fn next_page(&mut self) -> bool {
        self.pager.next()
    }

    pub fn previous_page(&mut self) -> bool {
        self.pager.previous()
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.pager.set_page_size(page_size);
    }
}
