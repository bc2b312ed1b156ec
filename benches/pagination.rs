use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tokio::runtime::Runtime;
use vmaf_dashboard::api::models::{SortDirection, SortField, VideoStatus, VideosQuery};
use vmaf_dashboard::api::{EvaluationApi, MockEvaluationApi};
use vmaf_dashboard::render::{render_videos_list, RenderOptions};
use vmaf_dashboard::views::{page_window, VideosListView};

/// Benchmark the page button window across a long list
fn bench_page_window(c: &mut Criterion) {
    c.bench_function("page_window", |b| {
        b.iter(|| {
            for current in 1..=500u32 {
                black_box(page_window(black_box(current), 500));
            }
        })
    });
}

/// Benchmark filtered, sorted listing on the in-memory backend
fn bench_mock_listing(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let api = MockEvaluationApi::new();
    for index in 0..2_000u32 {
        let status = VideoStatus::ALL[(index % 4) as usize];
        api.add_video(&format!("Evaluation {}", index), status);
    }

    let query = VideosQuery {
        page: Some(3),
        size: Some(50),
        order_by: Some(SortField::Title),
        order_direction: Some(SortDirection::Asc),
        status_filter: Some(VideoStatus::Completed),
        query: Some("evaluation 1".to_string()),
    };

    c.bench_function("mock_list_videos", |b| {
        b.iter(|| rt.block_on(async { api.list_videos(black_box(&query)).await }))
    });
}

/// Benchmark rendering a full page of the videos table
fn bench_render_list(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let api = MockEvaluationApi::with_demo_data();
    let mut view = VideosListView::new(100);
    rt.block_on(view.reload(&api));

    c.bench_function("render_videos_list", |b| {
        b.iter(|| render_videos_list(black_box(&view), RenderOptions::plain()))
    });
}

criterion_group!(benches, bench_page_window, bench_mock_listing, bench_render_list);
criterion_main!(benches);
