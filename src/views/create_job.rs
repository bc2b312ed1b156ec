//! Create-job form
//!
//! `Closed → Editing → Submitting → Closed` on success, or back to `Editing` with an
//! error message on failure. Validation runs before any request is issued.

use tracing::{info, warn};

use crate::api::models::{ApiResponse, CreateVideoRequest, CreateVideoResponse};
use crate::api::EvaluationApi;
use crate::error::{ApiOperation, DashboardError, Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Closed,
    Editing,
    Submitting,
}

/// Result of a submission attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Job created; the form is reset and closed, the parent list should reload
    Created(CreateVideoResponse),
    /// The form stays open showing this message
    Rejected(String),
}

#[derive(Debug, Clone, Default)]
pub struct CreateJobForm {
    state: FormState,
    title: String,
    original_url: String,
    highlight_url: String,
    error: Option<String>,
}

impl CreateJobForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != FormState::Closed
    }

    pub fn is_submitting(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn highlight_url(&self) -> &str {
        &self.highlight_url
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn open(&mut self) {
        if self.state == FormState::Closed {
            self.state = FormState::Editing;
        }
    }

    /// Close and discard the draft. Ignored while a submission is in flight.
    pub fn close(&mut self) -> bool {
        if self.state == FormState::Submitting {
            return false;
        }
        self.clear_fields();
        self.error = None;
        self.state = FormState::Closed;
        true
    }

    pub fn set_title(&mut self, value: &str) {
        if !self.is_submitting() {
            self.title = value.to_string();
        }
    }

    pub fn set_original_url(&mut self, value: &str) {
        if !self.is_submitting() {
            self.original_url = value.to_string();
        }
    }

    pub fn set_highlight_url(&mut self, value: &str) {
        if !self.is_submitting() {
            self.highlight_url = value.to_string();
        }
    }

    /// Check required fields in display order and build the trimmed request body
    pub fn validate(&self) -> std::result::Result<CreateVideoRequest, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        let original_url = self.original_url.trim();
        if original_url.is_empty() {
            return Err(ValidationError::MissingOriginalUrl);
        }
        let highlight_url = self.highlight_url.trim();
        if highlight_url.is_empty() {
            return Err(ValidationError::MissingHighlightUrl);
        }

        Ok(CreateVideoRequest {
            title: title.to_string(),
            original_url: original_url.to_string(),
            highlight_url: highlight_url.to_string(),
        })
    }

    /// Validate and enter `Submitting`. On validation failure the error is shown and
    /// no request must be sent.
    pub fn begin_submit(&mut self) -> Result<CreateVideoRequest> {
        match self.state {
            FormState::Closed => {
                return Err(DashboardError::InvalidInput("the form is not open".to_string()))
            }
            FormState::Submitting => {
                return Err(DashboardError::InvalidInput(
                    "a submission is already in progress".to_string(),
                ))
            }
            FormState::Editing => {}
        }

        match self.validate() {
            Ok(request) => {
                self.error = None;
                self.state = FormState::Submitting;
                Ok(request)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Apply the backend's answer to a submission started with [`begin_submit`]
    ///
    /// [`begin_submit`]: CreateJobForm::begin_submit
    pub fn finish_submit(
        &mut self,
        result: Result<ApiResponse<CreateVideoResponse>>,
    ) -> SubmitOutcome {
        if self.state != FormState::Submitting {
            warn!("Ignoring create response for a form that is not submitting");
            return SubmitOutcome::Rejected("no submission in progress".to_string());
        }

        let fallback = ApiOperation::CreateVideo.failure_message();
        let outcome = match result {
            Ok(response) => response.into_data(fallback),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(video) => {
                info!("✅ Created video job #{} ({})", video.id, video.title);
                self.clear_fields();
                self.error = None;
                self.state = FormState::Closed;
                SubmitOutcome::Created(video)
            }
            Err(e) => {
                let message = e.to_string();
                warn!("Create video job failed: {}", message);
                self.error = Some(message.clone());
                self.state = FormState::Editing;
                SubmitOutcome::Rejected(message)
            }
        }
    }

    /// Validate, send and apply the result in one step
    pub async fn submit(&mut self, api: &dyn EvaluationApi) -> SubmitOutcome {
        let request = match self.begin_submit() {
            Ok(request) => request,
            Err(e) => return SubmitOutcome::Rejected(e.to_string()),
        };

        let result = api.create_video(&request).await;
        self.finish_submit(result)
    }

    fn clear_fields(&mut self) {
        self.title.clear();
        self.original_url.clear();
        self.highlight_url.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{MockEvaluationApi, MockFailure};

    fn filled_form() -> CreateJobForm {
        let mut form = CreateJobForm::new();
        form.open();
        form.set_title("  Cup final  ");
        form.set_original_url("https://cdn.example.com/full.mp4");
        form.set_highlight_url("https://cdn.example.com/highlight.mp4 ");
        form
    }

    #[test]
    fn test_empty_title_blocks_submission_without_request() {
        let api = MockEvaluationApi::new();
        let mut form = CreateJobForm::new();
        form.open();
        form.set_title("   ");
        form.set_original_url("https://cdn.example.com/full.mp4");
        form.set_highlight_url("https://cdn.example.com/highlight.mp4");

        let outcome = tokio_test::block_on(form.submit(&api));

        assert_eq!(outcome, SubmitOutcome::Rejected("Title is required".to_string()));
        assert_eq!(form.error(), Some("Title is required"));
        assert_eq!(form.state(), FormState::Editing);
        assert_eq!(api.request_count(), 0);
    }

    #[test]
    fn test_first_failing_field_is_reported() {
        let mut form = CreateJobForm::new();
        form.open();
        form.set_title("Clip");
        assert_eq!(form.validate(), Err(ValidationError::MissingOriginalUrl));

        form.set_original_url("https://cdn/a.mp4");
        assert_eq!(form.validate(), Err(ValidationError::MissingHighlightUrl));
    }

    #[test]
    fn test_request_is_trimmed() {
        let request = filled_form().validate().unwrap();
        assert_eq!(request.title, "Cup final");
        assert_eq!(request.highlight_url, "https://cdn.example.com/highlight.mp4");
    }

    #[test]
    fn test_successful_submit_resets_and_closes() {
        let api = MockEvaluationApi::new();
        let mut form = filled_form();

        let outcome = tokio_test::block_on(form.submit(&api));

        match outcome {
            SubmitOutcome::Created(video) => assert_eq!(video.title, "Cup final"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(form.state(), FormState::Closed);
        assert!(form.title().is_empty());
        assert!(form.error().is_none());
    }

    #[test]
    fn test_backend_failure_keeps_form_open() {
        let api = MockEvaluationApi::new();
        api.fail(
            ApiOperation::CreateVideo,
            MockFailure::Application("Duplicate title".to_string()),
        );
        let mut form = filled_form();

        let outcome = tokio_test::block_on(form.submit(&api));

        assert_eq!(outcome, SubmitOutcome::Rejected("Duplicate title".to_string()));
        assert_eq!(form.state(), FormState::Editing);
        assert_eq!(form.title(), "  Cup final  ");
    }

    #[test]
    fn test_transport_failure_is_shown_like_backend_failure() {
        let api = MockEvaluationApi::new();
        api.fail(
            ApiOperation::CreateVideo,
            MockFailure::Transport("Bad Gateway".to_string()),
        );
        let mut form = filled_form();

        tokio_test::block_on(form.submit(&api));

        assert_eq!(form.error(), Some("Failed to create video: Bad Gateway"));
        assert!(form.is_open());
    }

    #[test]
    fn test_close_is_ignored_while_submitting() {
        let mut form = filled_form();
        form.begin_submit().unwrap();

        assert!(!form.close());
        assert!(form.is_submitting());
        form.set_title("changed");
        assert_eq!(form.title(), "  Cup final  ");

        form.finish_submit(Err(DashboardError::transport(
            ApiOperation::CreateVideo,
            "Gateway Timeout",
        )));
        assert!(form.close());
        assert_eq!(form.state(), FormState::Closed);
        assert!(form.title().is_empty());
    }

    #[test]
    fn test_submit_requires_open_form() {
        let mut form = CreateJobForm::new();
        assert!(matches!(form.begin_submit(), Err(DashboardError::InvalidInput(_))));
    }
}
