//! Videos list: filters, sort, paging and the create-job form
//!
//! Any change that alters the result set (search, status filter, page size, sort) puts
//! the view back on page 1. The caller reloads after every change.

use tracing::{debug, info};

use super::create_job::{CreateJobForm, SubmitOutcome};
use super::generation::{GenerationCounter, LoadOutcome, LoadTicket};
use super::pagination::{Pager, ShowingRange};
use crate::api::models::{
    ApiResponse, Paginated, SortDirection, SortField, Video, VideoStatus, VideosQuery,
};
use crate::api::EvaluationApi;
use crate::error::{ApiOperation, DashboardError, Result};

/// Page sizes offered by the list
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Shown in place of the table when the page is empty
pub const NO_VIDEOS_MESSAGE: &str = "No videos found";

#[derive(Debug, Clone)]
pub struct VideosListView {
    pager: Pager,
    search_draft: String,
    search: String,
    status_filter: Option<VideoStatus>,
    order_by: SortField,
    order_direction: SortDirection,
    videos: Vec<Video>,
    error: Option<String>,
    loading: bool,
    loaded_once: bool,
    generation: GenerationCounter,
    create_form: CreateJobForm,
}

impl Default for VideosListView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl VideosListView {
    /// Create the view; unsupported page sizes fall back to the default
    pub fn new(page_size: u32) -> Self {
        let page_size = if PAGE_SIZE_OPTIONS.contains(&page_size) {
            page_size
        } else {
            DEFAULT_PAGE_SIZE
        };

        Self {
            pager: Pager::new(page_size),
            search_draft: String::new(),
            search: String::new(),
            status_filter: None,
            order_by: SortField::Id,
            order_direction: SortDirection::Desc,
            videos: Vec::new(),
            error: None,
            loading: false,
            loaded_once: false,
            generation: GenerationCounter::new(),
            create_form: CreateJobForm::new(),
        }
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn page(&self) -> u32 {
        self.pager.page()
    }

    pub fn page_size(&self) -> u32 {
        self.pager.page_size()
    }

    pub fn search_draft(&self) -> &str {
        &self.search_draft
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn status_filter(&self) -> Option<VideoStatus> {
        self.status_filter
    }

    pub fn order_by(&self) -> SortField {
        self.order_by
    }

    pub fn order_direction(&self) -> SortDirection {
        self.order_direction
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Only the very first load replaces the view with a loading placeholder
    pub fn is_initial_loading(&self) -> bool {
        self.loading && !self.loaded_once
    }

    pub fn showing(&self) -> ShowingRange {
        self.pager.showing(self.videos.len())
    }

    pub fn create_form(&self) -> &CreateJobForm {
        &self.create_form
    }

    pub fn create_form_mut(&mut self) -> &mut CreateJobForm {
        &mut self.create_form
    }

    /// Edit the search box without touching the committed query
    pub fn set_search_draft(&mut self, text: &str) {
        self.search_draft = text.to_string();
    }

    /// Copy the draft into the committed query (Enter / Search)
    pub fn commit_search(&mut self) {
        self.search = self.search_draft.clone();
        self.pager.reset();
    }

    pub fn set_status_filter(&mut self, status: Option<VideoStatus>) {
        self.status_filter = status;
        self.pager.reset();
    }

    pub fn set_page_size(&mut self, page_size: u32) -> Result<()> {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            return Err(DashboardError::InvalidInput(format!(
                "page size must be one of {:?}, got {}",
                PAGE_SIZE_OPTIONS, page_size
            )));
        }
        self.pager.set_page_size(page_size);
        Ok(())
    }

    pub fn set_sort_field(&mut self, field: SortField) {
        self.order_by = field;
        self.pager.reset();
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.order_direction = direction;
        self.pager.reset();
    }

    /// Clear search and status, restore id/desc sort. The page size is kept.
    pub fn reset_filters(&mut self) {
        self.search_draft.clear();
        self.search.clear();
        self.status_filter = None;
        self.order_by = SortField::Id;
        self.order_direction = SortDirection::Desc;
        self.pager.reset();
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

    /// Request parameters for the current state
    pub fn query(&self) -> VideosQuery {
        VideosQuery {
            page: Some(self.pager.page()),
            size: Some(self.pager.page_size()),
            order_by: Some(self.order_by),
            order_direction: Some(self.order_direction),
            status_filter: self.status_filter,
            query: Some(self.search.clone()).filter(|q| !q.is_empty()),
        }
    }

    /// Start a load. Previously shown rows stay until the result is applied.
    pub fn begin_load(&mut self) -> (LoadTicket, VideosQuery) {
        self.loading = true;
        self.error = None;
        (self.generation.issue(), self.query())
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<ApiResponse<Paginated<Video>>>,
    ) -> LoadOutcome {
        if !self.generation.is_current(ticket) {
            debug!("Dropping stale videos response (generation {})", ticket.generation());
            return LoadOutcome::Stale;
        }

        self.loading = false;
        self.loaded_once = true;

        let page = result.and_then(|response| {
            response.into_data(ApiOperation::FetchVideos.failure_message())
        });
        match page {
            Ok(page) => {
                self.pager.update_totals(&page);
                self.videos = page.items;
                LoadOutcome::Applied
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(message.clone());
                LoadOutcome::Failed(message)
            }
        }
    }

    pub async fn reload(&mut self, api: &dyn EvaluationApi) -> LoadOutcome {
        let (ticket, query) = self.begin_load();
        let result = api.list_videos(&query).await;
        self.finish_load(ticket, result)
    }

    pub fn open_create(&mut self) {
        self.create_form.open();
    }

    /// Submit the hosted form; a created job triggers a reload of the current page
    pub async fn submit_create(&mut self, api: &dyn EvaluationApi) -> SubmitOutcome {
        let outcome = self.create_form.submit(api).await;
        if let SubmitOutcome::Created(video) = &outcome {
            info!("🔄 Reloading videos after creating #{}", video.id);
            self.reload(api).await;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(total_items: u64, total_pages: u32) -> Paginated<Video> {
        Paginated {
            items: Vec::new(),
            total_items,
            total_pages,
            current_page: 1,
        }
    }

    /// A view sitting on page 3 of 5
    fn view_on_page_three() -> VideosListView {
        let mut view = VideosListView::default();
        let (ticket, _) = view.begin_load();
        view.finish_load(ticket, Ok(ApiResponse::success(page_of(50, 5), "OK")));
        view.go_to_page(3);
        assert_eq!(view.page(), 3);
        view
    }

    #[test]
    fn test_defaults() {
        let view = VideosListView::default();
        let query = view.query();
        assert_eq!(query.page, Some(1));
        assert_eq!(query.size, Some(10));
        assert_eq!(query.order_by, Some(SortField::Id));
        assert_eq!(query.order_direction, Some(SortDirection::Desc));
        assert_eq!(query.status_filter, None);
        assert_eq!(query.query, None);
    }

    #[test]
    fn test_result_set_changes_reset_page() {
        let mut view = view_on_page_three();
        view.set_status_filter(Some(VideoStatus::Completed));
        assert_eq!(view.page(), 1);

        let mut view = view_on_page_three();
        view.set_page_size(50).unwrap();
        assert_eq!(view.page(), 1);

        let mut view = view_on_page_three();
        view.set_sort_field(SortField::Title);
        assert_eq!(view.page(), 1);

        let mut view = view_on_page_three();
        view.set_sort_direction(SortDirection::Asc);
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_draft_search_is_not_committed_until_search() {
        let mut view = view_on_page_three();
        view.set_search_draft("final");
        assert_eq!(view.query().query, None);
        assert_eq!(view.page(), 3);

        view.commit_search();
        assert_eq!(view.query().query.as_deref(), Some("final"));
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_reset_filters_keeps_page_size() {
        let mut view = VideosListView::default();
        view.set_page_size(20).unwrap();
        view.set_search_draft("cup");
        view.commit_search();
        view.set_status_filter(Some(VideoStatus::Failed));
        view.set_sort_field(SortField::Status);
        view.set_sort_direction(SortDirection::Asc);

        view.reset_filters();

        assert_eq!(view.search_draft(), "");
        assert_eq!(view.search(), "");
        assert_eq!(view.status_filter(), None);
        assert_eq!(view.order_by(), SortField::Id);
        assert_eq!(view.order_direction(), SortDirection::Desc);
        assert_eq!(view.page_size(), 20);
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_unsupported_page_size_is_rejected() {
        let mut view = VideosListView::default();
        assert!(view.set_page_size(15).is_err());
        assert_eq!(view.page_size(), 10);
        assert_eq!(VideosListView::new(7).page_size(), 10);
    }

    #[test]
    fn test_rows_survive_a_pending_reload() {
        let mut view = VideosListView::default();
        let video = Video {
            id: 1,
            title: "Kept".to_string(),
            original_url: None,
            highlight_url: None,
            status: VideoStatus::Completed,
        };
        let (ticket, _) = view.begin_load();
        assert!(view.is_initial_loading());
        view.finish_load(
            ticket,
            Ok(ApiResponse::success(
                Paginated {
                    items: vec![video],
                    total_items: 1,
                    total_pages: 1,
                    current_page: 1,
                },
                "OK",
            )),
        );

        view.begin_load();
        assert!(view.is_loading());
        assert!(!view.is_initial_loading());
        assert_eq!(view.videos().len(), 1);
    }

    #[test]
    fn test_failed_envelope_sets_error_and_keeps_rows() {
        let mut view = VideosListView::default();
        let (ticket, _) = view.begin_load();
        let outcome = view.finish_load(ticket, Ok(ApiResponse::failed(400, "Invalid status filter")));

        assert_eq!(outcome, LoadOutcome::Failed("Invalid status filter".to_string()));
        assert_eq!(view.error(), Some("Invalid status filter"));
        assert!(!view.is_loading());
    }
}
