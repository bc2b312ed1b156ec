/// VMAF Dashboard
///
/// Terminal dashboard for reviewing video-quality evaluation jobs: browse the video
/// library, inspect highlights and their VMAF scores, drill into problem frames and
/// import new jobs.

pub mod api;
pub mod config;
pub mod error;
pub mod render;
pub mod shell;
pub mod views;

// Re-export main types for easy access
pub use crate::api::{create_client, EvaluationApi, HttpEvaluationClient, MockEvaluationApi};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{DashboardError, Result};
pub use crate::render::RenderOptions;
pub use crate::views::{CreateJobForm, FramesView, VideoDetailView, VideosListView};
