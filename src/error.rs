//! Error types for dashboard operations

use std::fmt;

/// Result type for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Backend calls, used to word transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    FetchVideos,
    FetchHighlights,
    FetchFrames,
    CreateVideo,
}

impl ApiOperation {
    /// Generic message shown when the call fails without a better explanation
    pub fn failure_message(&self) -> &'static str {
        match self {
            ApiOperation::FetchVideos => "Failed to fetch videos",
            ApiOperation::FetchHighlights => "Failed to fetch highlights",
            ApiOperation::FetchFrames => "Failed to fetch frames",
            ApiOperation::CreateVideo => "Failed to create video",
        }
    }
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.failure_message())
    }
}

/// Client-side validation failures of the create-job form
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Original video URL is required")]
    MissingOriginalUrl,

    #[error("Highlight video URL is required")]
    MissingHighlightUrl,
}

/// Error types for dashboard operations
#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    /// Non-2xx response or network failure
    #[error("{operation}: {reason}")]
    Transport {
        operation: ApiOperation,
        reason: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend answered with `status: "failed"`
    #[error("{0}")]
    Application(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn transport(operation: ApiOperation, reason: impl Into<String>) -> Self {
        DashboardError::Transport {
            operation,
            reason: reason.into(),
        }
    }

    /// True for failures below the application envelope (HTTP status, network, decoding)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DashboardError::Transport { .. } | DashboardError::Http(_) | DashboardError::Json(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_message_includes_status_text() {
        let err = DashboardError::transport(ApiOperation::FetchVideos, "Not Found");
        assert_eq!(err.to_string(), "Failed to fetch videos: Not Found");
        assert!(err.is_transport());
    }

    #[test]
    fn test_application_message_is_backend_message() {
        let err = DashboardError::Application("Video already exists".to_string());
        assert_eq!(err.to_string(), "Video already exists");
        assert!(!err.is_transport());
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            DashboardError::from(ValidationError::MissingTitle).to_string(),
            "Title is required"
        );
        assert_eq!(
            ValidationError::MissingHighlightUrl.to_string(),
            "Highlight video URL is required"
        );
    }
}
