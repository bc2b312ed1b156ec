//! Terminal rendering of the dashboard views

use colored::{Color, Colorize};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use std::fmt::Write;

use crate::api::models::{Highlight, VideoStatus};
use crate::views::create_job::CreateJobForm;
use crate::views::detail::{NO_HIGHLIGHTS_MESSAGE, NO_VIDEO_URL_PLACEHOLDER};
use crate::views::frames::{FramesView, VmafBand, NO_PROBLEM_FRAMES_MESSAGE};
use crate::views::pagination::Pager;
use crate::views::videos::NO_VIDEOS_MESSAGE;
use crate::views::{VideoDetailView, VideosListView};

/// Cells of a full VMAF bar
const BAR_CELLS: usize = 20;

const ORANGE: Color = Color::TrueColor {
    r: 255,
    g: 165,
    b: 0,
};

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { color: true }
    }
}

impl RenderOptions {
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn error_banner(out: &mut String, error: Option<&str>, options: RenderOptions) {
    if let Some(error) = error {
        let _ = writeln!(out, "{}", options.paint(&format!("⚠ {}", error), Color::Red));
    }
}

pub fn status_badge(status: VideoStatus, options: RenderOptions) -> String {
    let color = match status {
        VideoStatus::Downloading => Color::Yellow,
        VideoStatus::Processing => Color::Blue,
        VideoStatus::Completed => Color::Green,
        VideoStatus::Failed => Color::Red,
        VideoStatus::Unknown(_) => Color::White,
    };
    options.paint(&status.label(), color)
}

fn band_color(band: VmafBand) -> Color {
    match band {
        VmafBand::Green => Color::Green,
        VmafBand::Yellow => Color::Yellow,
        VmafBand::Orange => ORANGE,
        VmafBand::Red => Color::Red,
    }
}

/// Score bar sized by `min(vmaf, 100)%` and coloured by band
pub fn vmaf_bar(vmaf: f64, width_percent: f64, band: VmafBand, options: RenderOptions) -> String {
    let filled = ((width_percent / 100.0) * BAR_CELLS as f64).round() as usize;
    let filled = filled.min(BAR_CELLS);
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled));
    format!("{} {:.2}", options.paint(&bar, band_color(band)), vmaf)
}

/// Numeric summary of a processed highlight, or the processing marker
pub fn highlight_summary(highlight: &Highlight) -> String {
    match highlight.scores() {
        Some(scores) => format!(
            "Duration: {:.2}s  VMAF Mean: {:.2}  Min: {:.2}  Max: {:.2}",
            scores.duration, scores.mean, scores.min, scores.max
        ),
        None => "⏳ Processing...".to_string(),
    }
}

/// Previous / page buttons / next, or nothing for a single page
pub fn render_pagination(pager: &Pager) -> String {
    if !pager.is_paginated() {
        return String::new();
    }

    let buttons: Vec<String> = pager
        .window()
        .map(|page| {
            if page == pager.page() {
                format!("[{}]", page)
            } else {
                page.to_string()
            }
        })
        .collect();

    let previous = if pager.has_previous() { "« Prev" } else { "  -   " };
    let next = if pager.has_next() { "Next »" } else { "  -   " };
    format!("{} | {} | {}", previous, buttons.join(" "), next)
}

pub fn render_videos_list(view: &VideosListView, options: RenderOptions) -> String {
    let mut out = String::new();

    if view.is_initial_loading() {
        out.push_str("Loading videos...\n");
        return out;
    }

    let _ = writeln!(out, "{}", options.bold("Videos Library"));
    let status = view
        .status_filter()
        .map(|s| s.label())
        .unwrap_or_else(|| "All Status".to_string());
    let _ = writeln!(
        out,
        "Search: \"{}\" | Status: {} | Sort: {} {} | Per page: {}",
        view.search(),
        status,
        view.order_by(),
        view.order_direction(),
        view.page_size()
    );
    if view.search_draft() != view.search() {
        let _ = writeln!(out, "(draft search: \"{}\")", view.search_draft());
    }

    error_banner(&mut out, view.error(), options);
    let _ = writeln!(out, "{} videos", view.showing());

    if view.videos().is_empty() {
        let _ = writeln!(out, "{}", NO_VIDEOS_MESSAGE);
    } else {
        let mut table = new_table();
        table.set_header(vec!["ID", "Title", "Status"]);
        for video in view.videos() {
            table.add_row(vec![
                video.id.to_string(),
                video.title.clone(),
                status_badge(video.status, options),
            ]);
        }
        let _ = writeln!(out, "{}", table);
    }

    let pagination = render_pagination(view.pager());
    if !pagination.is_empty() {
        let _ = writeln!(out, "{}", pagination);
    }

    if view.create_form().is_open() {
        out.push('\n');
        out.push_str(&render_create_form(view.create_form(), options));
    }

    out
}

pub fn render_create_form(form: &CreateJobForm, options: RenderOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", options.bold("Import New Job"));
    error_banner(&mut out, form.error(), options);
    let _ = writeln!(out, "  Title:              {}", form.title());
    let _ = writeln!(out, "  Original video URL: {}", form.original_url());
    let _ = writeln!(out, "  Highlight video URL: {}", form.highlight_url());
    if form.is_submitting() {
        let _ = writeln!(out, "  Creating...");
    }
    out
}

pub fn render_detail(view: &VideoDetailView, options: RenderOptions) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", options.bold(&view.title()));
    if let Some(video) = view.video() {
        let _ = writeln!(out, "Status: {}", status_badge(video.status, options));
    }
    let _ = writeln!(
        out,
        "Original Video:  {}",
        view.original_url().unwrap_or(NO_VIDEO_URL_PLACEHOLDER)
    );
    let _ = writeln!(
        out,
        "Highlight Video: {}",
        view.highlight_url().unwrap_or(NO_VIDEO_URL_PLACEHOLDER)
    );
    out.push('\n');

    error_banner(&mut out, view.error(), options);

    if view.is_initial_loading() {
        out.push_str("Loading highlights...\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{}",
        options.bold(&format!("Highlights ({})", view.pager().total_items()))
    );

    if view.highlights().is_empty() {
        let _ = writeln!(out, "{}", NO_HIGHLIGHTS_MESSAGE);
    } else {
        let _ = writeln!(out, "Expand a highlight to view its frame scores");
        let mut table = new_table();
        table.set_header(vec!["", "Highlight", "Scores"]);
        for highlight in view.highlights() {
            let marker = if view.expanded_highlight() == Some(highlight.id) {
                "▼"
            } else {
                "▶"
            };
            let summary = if highlight.is_processing() {
                options.paint(&highlight_summary(highlight), Color::Yellow)
            } else {
                highlight_summary(highlight)
            };
            table.add_row(vec![
                marker.to_string(),
                format!("Highlight #{}", highlight.id),
                summary,
            ]);
        }
        let _ = writeln!(out, "{}", table);
    }

    let pagination = render_pagination(view.pager());
    if !pagination.is_empty() {
        let _ = writeln!(out, "{}", pagination);
    }

    if let Some(frames) = view.frames() {
        out.push('\n');
        let _ = writeln!(
            out,
            "{}",
            options.bold(&format!("Frames of highlight #{}", frames.highlight_id()))
        );
        out.push_str(&render_frames(frames, options));
    }

    out
}

pub fn render_frames(view: &FramesView, options: RenderOptions) -> String {
    let mut out = String::new();

    if view.is_initial_loading() {
        out.push_str("Loading frames...\n");
        return out;
    }

    if let Some(error) = view.error() {
        error_banner(&mut out, Some(error), options);
        return out;
    }

    if view.frames().is_empty() {
        let _ = writeln!(out, "{}", options.paint(NO_PROBLEM_FRAMES_MESSAGE, Color::Green));
        return out;
    }

    let _ = writeln!(out, "{}", view.summary());

    let mut table = new_table();
    table.set_header(vec![
        "Frame",
        "VMAF",
        "Original Frame",
        "Highlight Frame",
    ]);
    for row in view.rows() {
        table.add_row(vec![
            format!("Frame #{}", row.frame_num),
            vmaf_bar(row.vmaf, row.bar_width, row.band, options),
            row.original.display().to_string(),
            row.highlight.display().to_string(),
        ]);
    }
    let _ = writeln!(out, "{}", table);

    let pagination = render_pagination(view.pager());
    if !pagination.is_empty() {
        let _ = writeln!(out, "{}", pagination);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{ApiResponse, Frame, Paginated};

    fn processing_highlight() -> Highlight {
        Highlight {
            id: 3,
            video_id: 1,
            duration: Some(10.0),
            vmaf_mean: None,
            vmaf_min: None,
            vmaf_max: None,
        }
    }

    #[test]
    fn test_processing_highlight_has_no_numbers() {
        assert_eq!(highlight_summary(&processing_highlight()), "⏳ Processing...");

        let done = Highlight {
            vmaf_mean: Some(88.456),
            vmaf_min: Some(51.0),
            vmaf_max: Some(99.0),
            ..processing_highlight()
        };
        assert_eq!(
            highlight_summary(&done),
            "Duration: 10.00s  VMAF Mean: 88.46  Min: 51.00  Max: 99.00"
        );
    }

    #[test]
    fn test_pagination_window_rendering() {
        let mut pager = Pager::new(10);
        pager.update_totals(&Paginated::<()> {
            items: Vec::new(),
            total_items: 200,
            total_pages: 20,
            current_page: 1,
        });
        pager.go_to(10);

        assert_eq!(
            render_pagination(&pager),
            "« Prev | 7 8 9 [10] 11 12 13 | Next »"
        );

        pager.go_to(1);
        assert!(render_pagination(&pager).contains("[1] 2 3 4 5 6 7 |"));
    }

    #[test]
    fn test_single_page_has_no_controls() {
        assert!(render_pagination(&Pager::new(10)).is_empty());
    }

    #[test]
    fn test_vmaf_bar_width() {
        let full = vmaf_bar(120.0, 100.0, VmafBand::Green, RenderOptions::plain());
        assert_eq!(full, format!("{} 120.00", "█".repeat(20)));

        let half = vmaf_bar(50.0, 50.0, VmafBand::Orange, RenderOptions::plain());
        assert!(half.starts_with(&format!("{}{}", "█".repeat(10), "░".repeat(10))));
    }

    #[test]
    fn test_frames_rendering() {
        let mut view = FramesView::new(5);
        let (ticket, _) = view.begin_load();
        assert_eq!(render_frames(&view, RenderOptions::plain()), "Loading frames...\n");

        let frames = vec![Frame {
            id: 1,
            highlight_id: 5,
            frame_num: 120,
            vmaf: 42.0,
            origin_url: Some("https://cdn/o/120.jpg".to_string()),
            highlight_url: None,
        }];
        view.finish_load(
            ticket,
            Ok(ApiResponse::success(
                Paginated {
                    items: frames,
                    total_items: 1,
                    total_pages: 1,
                    current_page: 1,
                },
                "OK",
            )),
        );

        let output = render_frames(&view, RenderOptions::plain());
        assert!(output.contains("Total Frames: 1 | Showing 1 frames on page 1 of 1"));
        assert!(output.contains("Frame #120"));
        assert!(output.contains("https://cdn/o/120.jpg"));
        assert!(output.contains("No image available"));
    }

    #[test]
    fn test_empty_frames_message() {
        let mut view = FramesView::new(5);
        let (ticket, _) = view.begin_load();
        view.finish_load(ticket, Ok(ApiResponse::success(Paginated::empty(), "OK")));

        let output = render_frames(&view, RenderOptions::plain());
        assert!(output.contains("All frames are of high quality!"));
    }

    #[test]
    fn test_videos_list_empty_state() {
        let mut view = VideosListView::default();
        let (ticket, _) = view.begin_load();
        assert_eq!(
            render_videos_list(&view, RenderOptions::plain()),
            "Loading videos...\n"
        );

        view.finish_load(ticket, Ok(ApiResponse::success(Paginated::empty(), "OK")));
        let output = render_videos_list(&view, RenderOptions::plain());
        assert!(output.contains("Showing 0 to 0 of 0 videos"));
        assert!(output.contains("No videos found"));
    }

    #[test]
    fn test_detail_without_video() {
        let view = VideoDetailView::new(77);
        let output = render_detail(&view, RenderOptions::plain());
        assert!(output.contains("Video #77"));
        assert!(output.contains("Original Video:  No video URL available"));
    }
}
