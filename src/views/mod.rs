/// View state for the dashboard screens
///
/// Each view owns its own pagination, error banner and load generation, so one view's
/// failure or stale response never touches another.

pub mod create_job;
pub mod detail;
pub mod frames;
pub mod generation;
pub mod pagination;
pub mod videos;

pub use create_job::{CreateJobForm, FormState, SubmitOutcome};
pub use detail::VideoDetailView;
pub use frames::{FrameRow, FramesView, ImageSlot, VmafBand};
pub use generation::{GenerationCounter, LoadOutcome, LoadTicket};
pub use pagination::{page_window, total_pages, Pager, ShowingRange};
pub use videos::VideosListView;
