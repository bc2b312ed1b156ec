//! Interactive `browse` session
//!
//! A line-oriented loop over the videos list and the detail screen. Each command
//! mutates view state, triggers the loads it requires and re-renders the screen.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::api::models::{SortDirection, SortField, VideoStatus};
use crate::api::EvaluationApi;
use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::render::{render_detail, render_videos_list, RenderOptions};
use crate::views::create_job::SubmitOutcome;
use crate::views::{VideoDetailView, VideosListView};

const PROMPT: &str = "> ";

pub const HELP_TEXT: &str = "\
Videos screen:
  n | p | page <n>        next, previous or specific page
  size <10|20|50|100>     change page size
  search [text]           search titles (empty clears)
  status <name|all>       filter by status
  sort <id|title|status>  sort field
  dir <asc|desc>          sort direction
  reset                   clear search, status and sort
  open <id>               open a video
  create                  open the import form
  title|original|highlight <value>  edit the import form
  submit | cancel         submit or close the import form
Detail screen:
  n | p | page <n>        highlights paging
  expand <id> | x         expand a highlight, or collapse
  fn | fp | fpage <n>     frames paging
  back                    return to the videos list
Anywhere:
  refresh | help | quit";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Next,
    Previous,
    Page(u32),
    Size(u32),
    Search(String),
    Status(Option<VideoStatus>),
    Sort(SortField),
    Direction(SortDirection),
    Reset,
    Open(u64),
    Create,
    Title(String),
    OriginalUrl(String),
    HighlightUrl(String),
    Submit,
    Cancel,
    Expand(u64),
    Collapse,
    FramesNext,
    FramesPrevious,
    FramesPage(u32),
    Back,
    Refresh,
    Help,
    Quit,
}

/// Whether the loop keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn parse_number<T: std::str::FromStr>(command: &str, arg: &str) -> std::result::Result<T, String> {
    if arg.is_empty() {
        return Err(format!("`{}` needs a number", command));
    }
    arg.parse()
        .map_err(|_| format!("`{}` expects a number, got `{}`", command, arg))
}

/// Parse one input line
pub fn parse_command(line: &str) -> std::result::Result<ShellCommand, String> {
    let line = line.trim();
    let (word, arg) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "n" | "next" => ShellCommand::Next,
        "p" | "prev" | "previous" => ShellCommand::Previous,
        "page" => ShellCommand::Page(parse_number(word, arg)?),
        "size" => ShellCommand::Size(parse_number(word, arg)?),
        "search" | "s" => ShellCommand::Search(arg.to_string()),
        "status" => match arg.to_lowercase().as_str() {
            "" | "all" => ShellCommand::Status(None),
            other => ShellCommand::Status(Some(other.parse()?)),
        },
        "sort" => ShellCommand::Sort(arg.parse()?),
        "dir" | "direction" => ShellCommand::Direction(arg.parse()?),
        "reset" => ShellCommand::Reset,
        "open" | "o" => ShellCommand::Open(parse_number(word, arg)?),
        "create" | "new" => ShellCommand::Create,
        "title" => ShellCommand::Title(arg.to_string()),
        "original" => ShellCommand::OriginalUrl(arg.to_string()),
        "highlight" => ShellCommand::HighlightUrl(arg.to_string()),
        "submit" => ShellCommand::Submit,
        "cancel" => ShellCommand::Cancel,
        "expand" | "e" => ShellCommand::Expand(parse_number(word, arg)?),
        "x" | "collapse" => ShellCommand::Collapse,
        "fn" => ShellCommand::FramesNext,
        "fp" => ShellCommand::FramesPrevious,
        "fpage" => ShellCommand::FramesPage(parse_number(word, arg)?),
        "back" | "b" => ShellCommand::Back,
        "refresh" | "r" => ShellCommand::Refresh,
        "help" | "h" | "?" => ShellCommand::Help,
        "quit" | "q" | "exit" => ShellCommand::Quit,
        "" => return Err("empty command".to_string()),
        other => return Err(format!("unknown command `{}` (try `help`)", other)),
    };
    Ok(command)
}

fn unavailable(command: &ShellCommand) -> DashboardError {
    DashboardError::InvalidInput(format!("{:?} is not available on this screen", command))
}

/// Interactive session state
pub struct Shell<'a> {
    api: &'a dyn EvaluationApi,
    options: RenderOptions,
    videos: VideosListView,
    detail: Option<VideoDetailView>,
    highlights_page_size: u32,
    lookup_scan_size: u32,
}

impl<'a> Shell<'a> {
    pub fn new(api: &'a dyn EvaluationApi, config: &Config, options: RenderOptions) -> Self {
        Self {
            api,
            options,
            videos: VideosListView::new(config.display.videos_page_size),
            detail: None,
            highlights_page_size: config.display.highlights_page_size,
            lookup_scan_size: config.api.lookup_scan_size,
        }
    }

    pub fn videos(&self) -> &VideosListView {
        &self.videos
    }

    pub fn detail(&self) -> Option<&VideoDetailView> {
        self.detail.as_ref()
    }

    /// Render the current screen
    pub fn render(&self) -> String {
        match &self.detail {
            Some(detail) => render_detail(detail, self.options),
            None => render_videos_list(&self.videos, self.options),
        }
    }

    /// Initial load of the videos list
    pub async fn start(&mut self) {
        self.videos.reload(self.api).await;
    }

    /// Apply one command and perform the loads it requires
    pub async fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        debug!("Executing {:?}", command);
        match command {
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Help => {}
            command if self.detail.is_some() => self.execute_detail(command).await?,
            command => self.execute_videos(command).await?,
        }
        Ok(Flow::Continue)
    }

    async fn execute_videos(&mut self, command: ShellCommand) -> Result<()> {
        let api = self.api;
        let videos = &mut self.videos;

        let reload = match command {
            ShellCommand::Next => videos.next_page(),
            ShellCommand::Previous => videos.previous_page(),
            ShellCommand::Page(page) => videos.go_to_page(page),
            ShellCommand::Size(size) => {
                videos.set_page_size(size)?;
                true
            }
            ShellCommand::Search(text) => {
                videos.set_search_draft(&text);
                videos.commit_search();
                true
            }
            ShellCommand::Status(status) => {
                videos.set_status_filter(status);
                true
            }
            ShellCommand::Sort(field) => {
                videos.set_sort_field(field);
                true
            }
            ShellCommand::Direction(direction) => {
                videos.set_sort_direction(direction);
                true
            }
            ShellCommand::Reset => {
                videos.reset_filters();
                true
            }
            ShellCommand::Refresh => true,
            ShellCommand::Create => {
                videos.open_create();
                false
            }
            ShellCommand::Title(value) => {
                videos.create_form_mut().set_title(&value);
                false
            }
            ShellCommand::OriginalUrl(value) => {
                videos.create_form_mut().set_original_url(&value);
                false
            }
            ShellCommand::HighlightUrl(value) => {
                videos.create_form_mut().set_highlight_url(&value);
                false
            }
            ShellCommand::Cancel => {
                videos.create_form_mut().close();
                false
            }
            ShellCommand::Submit => {
                if let SubmitOutcome::Rejected(message) = videos.submit_create(api).await {
                    debug!("Import rejected: {}", message);
                }
                false
            }
            ShellCommand::Open(video_id) => {
                let mut detail = VideoDetailView::with_page_size(video_id, self.highlights_page_size)
                    .with_lookup_scan_size(self.lookup_scan_size);
                detail.refresh(api).await;
                self.detail = Some(detail);
                false
            }
            other => return Err(unavailable(&other)),
        };

        if reload {
            self.videos.reload(api).await;
        }
        Ok(())
    }

    async fn execute_detail(&mut self, command: ShellCommand) -> Result<()> {
        let api = self.api;
        let Some(detail) = self.detail.as_mut() else {
            return Ok(());
        };

        match command {
            ShellCommand::Back => {
                self.detail = None;
                self.videos.reload(api).await;
            }
            ShellCommand::Next => {
                if detail.next_page() {
                    detail.load_highlights(api).await;
                }
            }
            ShellCommand::Previous => {
                if detail.previous_page() {
                    detail.load_highlights(api).await;
                }
            }
            ShellCommand::Page(page) => {
                if detail.go_to_page(page) {
                    detail.load_highlights(api).await;
                }
            }
            ShellCommand::Refresh => {
                detail.refresh(api).await;
            }
            ShellCommand::Expand(highlight_id) => {
                if detail.toggle_highlight(highlight_id) {
                    if let Some(frames) = detail.frames_mut() {
                        frames.load(api).await;
                    }
                }
            }
            ShellCommand::Collapse => detail.collapse(),
            ShellCommand::FramesNext | ShellCommand::FramesPrevious | ShellCommand::FramesPage(_) => {
                let Some(frames) = detail.frames_mut() else {
                    return Err(DashboardError::InvalidInput(
                        "no highlight is expanded".to_string(),
                    ));
                };
                let changed = match command {
                    ShellCommand::FramesNext => frames.next_page(),
                    ShellCommand::FramesPrevious => frames.previous_page(),
                    ShellCommand::FramesPage(page) => frames.go_to_page(page),
                    _ => false,
                };
                if changed {
                    frames.load(api).await;
                }
            }
            other => return Err(unavailable(&other)),
        }
        Ok(())
    }

    /// Read commands line by line until `quit` or end of input
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.start().await;
        output.write_all(self.render().as_bytes()).await?;

        let mut lines = input.lines();
        loop {
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(message) => {
                    output.write_all(format!("{}\n", message).as_bytes()).await?;
                    continue;
                }
            };

            if command == ShellCommand::Help {
                output.write_all(format!("{}\n", HELP_TEXT).as_bytes()).await?;
                continue;
            }

            match self.execute(command).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {
                    output.write_all(self.render().as_bytes()).await?;
                }
                Err(e) => {
                    output.write_all(format!("{}\n", e).as_bytes()).await?;
                }
            }
        }

        output.flush().await?;
        Ok(())
    }
}
