//! API data models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DashboardError, Result};

/// Envelope status reported by the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Failed,
}

/// API response wrapper
///
/// `data` is only guaranteed when `status` is `success`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub code: i32,
    pub status: ResponseStatus,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: &str) -> Self {
        Self {
            code: 200,
            status: ResponseStatus::Success,
            message: message.to_string(),
            data: Some(data),
        }
    }

    pub fn failed(code: i32, message: &str) -> Self {
        Self {
            code,
            status: ResponseStatus::Failed,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    /// Unwrap the payload, turning a `failed` envelope into an application error.
    ///
    /// The backend message is used when present, `fallback` otherwise.
    pub fn into_data(self, fallback: &str) -> Result<T> {
        let message = if self.message.trim().is_empty() {
            fallback.to_string()
        } else {
            self.message
        };

        match (self.status, self.data) {
            (ResponseStatus::Success, Some(data)) => Ok(data),
            (ResponseStatus::Success, None) => Err(DashboardError::Application(format!(
                "{}: response carried no data",
                fallback
            ))),
            (ResponseStatus::Failed, _) => Err(DashboardError::Application(message)),
        }
    }
}

/// Pagination envelope wrapping every list endpoint
///
/// `current_page` is decoded for completeness; views track their own page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub total_pages: u32,
    #[serde(default)]
    pub current_page: u32,
}

impl<T> Paginated<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            total_pages: 0,
            current_page: 1,
        }
    }
}

/// Processing status of a video job, owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum VideoStatus {
    Failed,
    Downloading,
    Processing,
    Completed,
    /// Code this client does not know about
    Unknown(i32),
}

impl VideoStatus {
    /// Statuses offered by the list filter
    pub const ALL: [VideoStatus; 4] = [
        VideoStatus::Downloading,
        VideoStatus::Processing,
        VideoStatus::Completed,
        VideoStatus::Failed,
    ];

    pub fn code(&self) -> i32 {
        match self {
            VideoStatus::Failed => -1,
            VideoStatus::Downloading => 0,
            VideoStatus::Processing => 1,
            VideoStatus::Completed => 2,
            VideoStatus::Unknown(code) => *code,
        }
    }

    pub fn label(&self) -> String {
        match self {
            VideoStatus::Failed => "Failed".to_string(),
            VideoStatus::Downloading => "Downloading".to_string(),
            VideoStatus::Processing => "Processing".to_string(),
            VideoStatus::Completed => "Completed".to_string(),
            VideoStatus::Unknown(code) => format!("Unknown ({})", code),
        }
    }
}

impl From<i32> for VideoStatus {
    fn from(code: i32) -> Self {
        match code {
            -1 => VideoStatus::Failed,
            0 => VideoStatus::Downloading,
            1 => VideoStatus::Processing,
            2 => VideoStatus::Completed,
            other => VideoStatus::Unknown(other),
        }
    }
}

impl From<VideoStatus> for i32 {
    fn from(status: VideoStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for VideoStatus {
    type Err = String;

    /// Accepts a status name (`completed`) or its numeric code (`2`, `-1`)
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value = s.trim().to_lowercase();
        match value.as_str() {
            "failed" => Ok(VideoStatus::Failed),
            "downloading" | "pending" => Ok(VideoStatus::Downloading),
            "processing" => Ok(VideoStatus::Processing),
            "completed" => Ok(VideoStatus::Completed),
            _ => match value.parse::<i32>() {
                Ok(code) => match VideoStatus::from(code) {
                    VideoStatus::Unknown(code) => Err(format!("unknown status code {}", code)),
                    status => Ok(status),
                },
                Err(_) => Err(format!(
                    "unknown status '{}' (expected downloading, processing, completed, failed or -1..2)",
                    s
                )),
            },
        }
    }
}

/// A highlight-vs-original comparison job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: u64,
    pub title: String,
    pub original_url: Option<String>,
    pub highlight_url: Option<String>,
    pub status: VideoStatus,
}

/// Payload of a successful create call; same shape as a listed video
pub type CreateVideoResponse = Video;

/// Highlight segment of a video
///
/// Duration and scores stay null until the backend finishes processing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Highlight {
    pub id: u64,
    pub video_id: u64,
    pub duration: Option<f64>,
    pub vmaf_mean: Option<f64>,
    pub vmaf_min: Option<f64>,
    pub vmaf_max: Option<f64>,
}

/// Fully processed score summary of a highlight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightScores {
    pub duration: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl Highlight {
    /// Scores are only reported once every field is present
    pub fn scores(&self) -> Option<HighlightScores> {
        Some(HighlightScores {
            duration: self.duration?,
            mean: self.vmaf_mean?,
            min: self.vmaf_min?,
            max: self.vmaf_max?,
        })
    }

    pub fn is_processing(&self) -> bool {
        self.scores().is_none()
    }
}

/// Low-quality frame of a highlight paired with its original frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    pub id: u64,
    pub highlight_id: u64,
    pub frame_num: u64,
    pub vmaf: f64,
    pub origin_url: Option<String>,
    pub highlight_url: Option<String>,
}

/// Treat null and blank URLs alike
pub fn present_url(url: &Option<String>) -> Option<&str> {
    url.as_deref().map(str::trim).filter(|u| !u.is_empty())
}

/// Sortable columns of the videos list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Id,
    Title,
    Status,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Status => "status",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" => Ok(SortField::Id),
            "title" => Ok(SortField::Title),
            "status" => Ok(SortField::Status),
            other => Err(format!("unknown sort field '{}' (expected id, title or status)", other)),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{}' (expected asc or desc)", other)),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters recognised by `GET /videos`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideosQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub order_by: Option<SortField>,
    pub order_direction: Option<SortDirection>,
    pub status_filter: Option<VideoStatus>,
    pub query: Option<String>,
}

impl VideosQuery {
    pub fn page(page: u32, size: u32) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
            ..Self::default()
        }
    }

    /// Query-string pairs; unset and blank values are left out
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_pair(&mut pairs, "page", self.page.map(|p| p.to_string()));
        push_pair(&mut pairs, "size", self.size.map(|s| s.to_string()));
        push_pair(&mut pairs, "order_by", self.order_by.map(|o| o.as_str().to_string()));
        push_pair(
            &mut pairs,
            "order_direction",
            self.order_direction.map(|d| d.as_str().to_string()),
        );
        push_pair(
            &mut pairs,
            "status_filter",
            self.status_filter.map(|s| s.code().to_string()),
        );
        push_pair(&mut pairs, "query", self.query.clone());
        pairs
    }
}

/// Query parameters for the highlight and frame list endpoints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub order_by: Option<String>,
    pub order_direction: Option<SortDirection>,
}

impl PageQuery {
    pub fn ordered(page: u32, size: u32, order_by: &str, direction: SortDirection) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
            order_by: Some(order_by.to_string()),
            order_direction: Some(direction),
        }
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_pair(&mut pairs, "page", self.page.map(|p| p.to_string()));
        push_pair(&mut pairs, "size", self.size.map(|s| s.to_string()));
        push_pair(&mut pairs, "order_by", self.order_by.clone());
        push_pair(
            &mut pairs,
            "order_direction",
            self.order_direction.map(|d| d.as_str().to_string()),
        );
        pairs
    }
}

fn push_pair(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<String>) {
    if let Some(value) = value {
        if !value.is_empty() {
            pairs.push((key, value));
        }
    }
}

/// Body of `POST /videos`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CreateVideoRequest {
    pub title: String,
    pub original_url: String,
    pub highlight_url: String,
}
