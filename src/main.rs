use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

use vmaf_dashboard::api::models::{SortDirection, SortField, VideoStatus};
use vmaf_dashboard::api::{create_client, EvaluationApi, MockEvaluationApi};
use vmaf_dashboard::render::{render_detail, render_frames, render_videos_list, RenderOptions};
use vmaf_dashboard::shell::Shell;
use vmaf_dashboard::views::generation::LoadOutcome;
use vmaf_dashboard::views::{FramesView, SubmitOutcome, VideoDetailView, VideosListView};
use vmaf_dashboard::Config;

#[derive(Debug, Parser)]
#[command(
    name = "vmaf-dashboard",
    version,
    author = "TigreRoll",
    about = "Review VMAF evaluation jobs from the terminal"
)]
struct Cli {
    /// Base URL of the evaluation API
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Configuration file (TOML)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use the built-in demo backend instead of the network
    #[arg(long, global = true)]
    offline: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List evaluation jobs
    Videos(VideosArgs),

    /// Show one video with its highlights
    Show {
        /// Video id
        id: u64,

        /// Highlights page; past the end shows the last page
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Also list the problem frames of this highlight
        #[arg(long, value_name = "HIGHLIGHT_ID")]
        expand: Option<u64>,

        /// Frames page of the expanded highlight; past the end shows the last page
        #[arg(long, default_value_t = 1)]
        frames_page: u32,
    },

    /// List problem frames of a highlight
    Frames {
        /// Highlight id
        highlight_id: u64,

        /// Page to show; past the end shows the last page
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Import a new evaluation job
    Create {
        #[arg(long)]
        title: String,

        #[arg(long, value_name = "URL")]
        original_url: String,

        #[arg(long, value_name = "URL")]
        highlight_url: String,
    },

    /// Interactive session
    Browse,

    /// Print the effective configuration
    Config {
        /// Write it to this file as well
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct VideosArgs {
    /// Page to show; past the end shows the last page
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Page size (10, 20, 50 or 100)
    #[arg(long)]
    size: Option<u32>,

    /// Title search
    #[arg(long)]
    query: Option<String>,

    /// downloading, processing, completed or failed
    #[arg(long)]
    status: Option<VideoStatus>,

    /// id, title or status
    #[arg(long, default_value = "id")]
    order_by: SortField,

    /// asc or desc
    #[arg(long, default_value = "desc")]
    direction: SortDirection,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env();
            config
        }
        None => Config::load()?,
    };

    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if cli.no_color {
        config.display.color = false;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

fn default_filter(verbose: bool, level: &str) -> String {
    if verbose {
        "vmaf_dashboard=debug,info".to_string()
    } else {
        format!("vmaf_dashboard={},warn", level)
    }
}

/// Start logging before the config is read, so config problems are reported.
///
/// Returns a handle for applying the configured level, unless `RUST_LOG` or
/// `--verbose` already decide the filter.
fn init_logging(verbose: bool) -> Option<FilterHandle> {
    let from_env = EnvFilter::try_from_default_env().ok();
    let pinned = from_env.is_some() || verbose;
    let filter = from_env.unwrap_or_else(|| EnvFilter::new(default_filter(verbose, "info")));

    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    (!pinned).then_some(handle)
}

fn apply_log_level(handle: Option<FilterHandle>, level: &str) {
    if let Some(handle) = handle {
        if let Err(e) = handle.reload(EnvFilter::new(default_filter(false, level))) {
            warn!("Could not apply log level {}: {}", level, e);
        }
    }
}

fn report(outcome: &LoadOutcome) {
    if let LoadOutcome::Failed(message) = outcome {
        warn!("❌ {}", message);
    }
}

async fn list_videos(api: &dyn EvaluationApi, config: &Config, args: VideosArgs, options: RenderOptions) -> Result<()> {
    let mut view = VideosListView::new(args.size.unwrap_or(config.display.videos_page_size));
    if let Some(size) = args.size {
        view.set_page_size(size)?;
    }
    if let Some(query) = &args.query {
        view.set_search_draft(query);
        view.commit_search();
    }
    view.set_status_filter(args.status);
    view.set_sort_field(args.order_by);
    view.set_sort_direction(args.direction);

    view.seek_page(args.page);
    let mut outcome = view.reload(api).await;
    if outcome.is_applied() && view.pager().is_past_end() {
        view.go_to_page(view.pager().total_pages());
        outcome = view.reload(api).await;
    }
    report(&outcome);

    print!("{}", render_videos_list(&view, options));
    Ok(())
}

async fn show_video(
    api: &dyn EvaluationApi,
    config: &Config,
    id: u64,
    page: u32,
    expand: Option<u64>,
    frames_page: u32,
    options: RenderOptions,
) -> Result<()> {
    let mut view = VideoDetailView::with_page_size(id, config.display.highlights_page_size)
        .with_lookup_scan_size(config.api.lookup_scan_size);

    view.seek_page(page);
    let mut outcome = view.refresh(api).await;
    if outcome.is_applied() && view.pager().is_past_end() {
        view.go_to_page(view.pager().total_pages());
        outcome = view.load_highlights(api).await;
    }
    report(&outcome);

    if let Some(highlight_id) = expand {
        if view.toggle_highlight(highlight_id) {
            if let Some(frames) = view.frames_mut() {
                frames.seek_page(frames_page);
                let mut outcome = frames.load(api).await;
                if outcome.is_applied() && frames.pager().is_past_end() {
                    frames.go_to_page(frames.pager().total_pages());
                    outcome = frames.load(api).await;
                }
                report(&outcome);
            }
        }
    }

    print!("{}", render_detail(&view, options));
    if view.video().is_none() {
        bail!("Video #{} not found", id);
    }
    Ok(())
}

async fn list_frames(api: &dyn EvaluationApi, highlight_id: u64, page: u32, options: RenderOptions) -> Result<()> {
    let mut view = FramesView::new(highlight_id);
    view.seek_page(page);
    let mut outcome = view.load(api).await;
    if outcome.is_applied() && view.pager().is_past_end() {
        view.go_to_page(view.pager().total_pages());
        outcome = view.load(api).await;
    }
    report(&outcome);

    print!("{}", render_frames(&view, options));
    Ok(())
}

async fn create_job(
    api: &dyn EvaluationApi,
    title: &str,
    original_url: &str,
    highlight_url: &str,
) -> Result<()> {
    let mut view = VideosListView::default();
    view.open_create();
    let form = view.create_form_mut();
    form.set_title(title);
    form.set_original_url(original_url);
    form.set_highlight_url(highlight_url);

    match view.submit_create(api).await {
        SubmitOutcome::Created(video) => {
            println!("✅ Created job #{}: {} ({})", video.id, video.title, video.status);
            Ok(())
        }
        SubmitOutcome::Rejected(message) => bail!(message),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = init_logging(cli.verbose);
    let config = load_config(&cli)?;
    apply_log_level(log_filter, &config.logging.level);
    debug!("{}", config.summary());

    let options = RenderOptions {
        color: config.display.color,
    };

    let api: Box<dyn EvaluationApi> = if cli.offline {
        info!("📦 Using built-in demo data");
        Box::new(MockEvaluationApi::with_demo_data())
    } else {
        info!("🌐 API: {}", config.api.base_url);
        create_client(&config.api)?
    };

    match cli.command {
        Commands::Videos(args) => list_videos(api.as_ref(), &config, args, options).await?,
        Commands::Show {
            id,
            page,
            expand,
            frames_page,
        } => show_video(api.as_ref(), &config, id, page, expand, frames_page, options).await?,
        Commands::Frames { highlight_id, page } => {
            list_frames(api.as_ref(), highlight_id, page, options).await?
        }
        Commands::Create {
            title,
            original_url,
            highlight_url,
        } => create_job(api.as_ref(), &title, &original_url, &highlight_url).await?,
        Commands::Browse => {
            let mut shell = Shell::new(api.as_ref(), &config, options);
            shell
                .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                .await?;
        }
        Commands::Config { save } => {
            println!("{}", config.summary());
            if let Some(path) = save {
                config.save(&path)?;
            }
        }
    }

    Ok(())
}
