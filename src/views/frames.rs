//! Problem frames of one highlight

use tracing::debug;

use super::generation::{GenerationCounter, LoadOutcome, LoadTicket};
use super::pagination::Pager;
use crate::api::models::{present_url, ApiResponse, Frame, PageQuery, Paginated, SortDirection};
use crate::api::EvaluationApi;
use crate::error::{ApiOperation, Result};

/// Frames per page; not user adjustable
pub const FRAMES_PAGE_SIZE: u32 = 10;

/// Shown when the backend reports no frame below its quality threshold
pub const NO_PROBLEM_FRAMES_MESSAGE: &str =
    "No frames have VMAF score below threshold. All frames are of high quality!";

/// Placeholder for a missing frame image
pub const NO_IMAGE_PLACEHOLDER: &str = "No image available";

/// Colour band of a VMAF score bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmafBand {
    Green,
    Yellow,
    Orange,
    Red,
}

impl VmafBand {
    pub fn from_score(vmaf: f64) -> Self {
        if vmaf >= 90.0 {
            VmafBand::Green
        } else if vmaf >= 75.0 {
            VmafBand::Yellow
        } else if vmaf >= 50.0 {
            VmafBand::Orange
        } else {
            VmafBand::Red
        }
    }
}

/// Bar fill in percent: `min(vmaf, 100)`, never negative
pub fn bar_width_percent(vmaf: f64) -> f64 {
    vmaf.clamp(0.0, 100.0)
}

/// One side of the original/highlight comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot<'a> {
    Url(&'a str),
    Missing,
}

impl<'a> ImageSlot<'a> {
    fn from_url(url: &'a Option<String>) -> Self {
        match present_url(url) {
            Some(url) => ImageSlot::Url(url),
            None => ImageSlot::Missing,
        }
    }

    pub fn display(&self) -> &'a str {
        match *self {
            ImageSlot::Url(url) => url,
            ImageSlot::Missing => NO_IMAGE_PLACEHOLDER,
        }
    }
}

/// Render-ready view of a frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRow<'a> {
    pub frame_num: u64,
    pub vmaf: f64,
    pub band: VmafBand,
    pub bar_width: f64,
    pub original: ImageSlot<'a>,
    pub highlight: ImageSlot<'a>,
}

impl<'a> FrameRow<'a> {
    pub fn new(frame: &'a Frame) -> Self {
        Self {
            frame_num: frame.frame_num,
            vmaf: frame.vmaf,
            band: VmafBand::from_score(frame.vmaf),
            bar_width: bar_width_percent(frame.vmaf),
            original: ImageSlot::from_url(&frame.origin_url),
            highlight: ImageSlot::from_url(&frame.highlight_url),
        }
    }
}

/// Paginated frames of a single highlight, ordered by frame number
#[derive(Debug, Clone)]
pub struct FramesView {
    highlight_id: u64,
    pager: Pager,
    frames: Vec<Frame>,
    error: Option<String>,
    loading: bool,
    loaded_once: bool,
    generation: GenerationCounter,
}

impl FramesView {
    pub fn new(highlight_id: u64) -> Self {
        Self {
            highlight_id,
            pager: Pager::new(FRAMES_PAGE_SIZE),
            frames: Vec::new(),
            error: None,
            loading: false,
            loaded_once: false,
            generation: GenerationCounter::new(),
        }
    }

    pub fn highlight_id(&self) -> u64 {
        self.highlight_id
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn rows(&self) -> Vec<FrameRow<'_>> {
        self.frames.iter().map(FrameRow::new).collect()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Nothing has been shown yet; the whole panel is a loading placeholder
    pub fn is_initial_loading(&self) -> bool {
        self.loading && !self.loaded_once
    }

    /// Loaded successfully and the backend reported no problem frames
    pub fn is_all_high_quality(&self) -> bool {
        self.loaded_once && self.error.is_none() && self.frames.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "Total Frames: {} | Showing {} frames on page {} of {}",
            self.pager.total_items(),
            self.frames.len(),
            self.pager.page(),
            self.pager.total_pages()
        )
    }

    pub fn query(&self) -> PageQuery {
        PageQuery::ordered(self.pager.page(), FRAMES_PAGE_SIZE, "frame_num", SortDirection::Asc)
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

    pub fn begin_load(&mut self) -> (LoadTicket, PageQuery) {
        self.loading = true;
        self.error = None;
        (self.generation.issue(), self.query())
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<ApiResponse<Paginated<Frame>>>,
    ) -> LoadOutcome {
        if !self.generation.is_current(ticket) {
            debug!(
                "Dropping stale frames response for highlight #{} (generation {})",
                self.highlight_id,
                ticket.generation()
            );
            return LoadOutcome::Stale;
        }

        self.loading = false;
        self.loaded_once = true;

        let page = result.and_then(|response| {
            response.into_data(ApiOperation::FetchFrames.failure_message())
        });
        match page {
            Ok(page) => {
                self.pager.update_totals(&page);
                self.frames = page.items;
                LoadOutcome::Applied
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(message.clone());
                LoadOutcome::Failed(message)
            }
        }
    }

    pub async fn load(&mut self, api: &dyn EvaluationApi) -> LoadOutcome {
        let (ticket, query) = self.begin_load();
        let result = api.list_frames(self.highlight_id, &query).await;
        self.finish_load(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_thresholds() {
        assert_eq!(VmafBand::from_score(95.0), VmafBand::Green);
        assert_eq!(VmafBand::from_score(90.0), VmafBand::Green);
        assert_eq!(VmafBand::from_score(80.0), VmafBand::Yellow);
        assert_eq!(VmafBand::from_score(75.0), VmafBand::Yellow);
        assert_eq!(VmafBand::from_score(60.0), VmafBand::Orange);
        assert_eq!(VmafBand::from_score(49.99), VmafBand::Red);
        assert_eq!(VmafBand::from_score(30.0), VmafBand::Red);
    }

    #[test]
    fn test_bar_width_clamps() {
        assert_eq!(bar_width_percent(120.0), 100.0);
        assert_eq!(bar_width_percent(42.5), 42.5);
        assert_eq!(bar_width_percent(-3.0), 0.0);
    }

    #[test]
    fn test_row_placeholders() {
        let frame = Frame {
            id: 1,
            highlight_id: 9,
            frame_num: 240,
            vmaf: 61.0,
            origin_url: Some("https://cdn/o/240.jpg".to_string()),
            highlight_url: Some(String::new()),
        };
        let row = FrameRow::new(&frame);

        assert_eq!(row.original.display(), "https://cdn/o/240.jpg");
        assert_eq!(row.highlight, ImageSlot::Missing);
        assert_eq!(row.highlight.display(), NO_IMAGE_PLACEHOLDER);
        assert_eq!(row.band, VmafBand::Orange);
    }

    #[test]
    fn test_query_is_fixed() {
        let view = FramesView::new(4);
        assert_eq!(
            view.query(),
            PageQuery::ordered(1, 10, "frame_num", SortDirection::Asc)
        );
    }

    #[test]
    fn test_empty_page_is_all_high_quality() {
        let mut view = FramesView::new(4);
        let (ticket, _) = view.begin_load();
        assert!(view.is_initial_loading());

        let outcome = view.finish_load(ticket, Ok(ApiResponse::success(Paginated::empty(), "OK")));

        assert_eq!(outcome, LoadOutcome::Applied);
        assert!(view.is_all_high_quality());
        assert!(view.error().is_none());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut view = FramesView::new(4);
        let (old, _) = view.begin_load();
        view.next_page();
        let (new, _) = view.begin_load();

        let fresh = Paginated {
            items: Vec::new(),
            total_items: 0,
            total_pages: 0,
            current_page: 1,
        };
        assert_eq!(view.finish_load(new, Ok(ApiResponse::success(fresh, "OK"))), LoadOutcome::Applied);

        let outdated = ApiResponse::failed(500, "old failure");
        assert_eq!(view.finish_load(old, Ok(outdated)), LoadOutcome::Stale);
        assert!(view.error().is_none());
    }
}
