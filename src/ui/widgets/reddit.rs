use std::any::Any;
use std::sync::Arc;

use chrono::Utc;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem},
    Frame,
};

use crate::config::{ListingMode, RedditConfig};
use crate::feeds::reddit::RedditFetcher;
use crate::feeds::{FeedData, FeedFetcher, RedditPost};
use crate::telemetry::ExceptionSink;
use crate::ui::list_view::ListView;
use crate::ui::widgets::{FeedWidget, SelectedItem};

/// Fallback flair background when the post carries none ("#dadada" upstream).
const FLAIR_DEFAULT_BG: Color = Color::Rgb(0xda, 0xda, 0xda);

pub struct RedditWidget {
    config: RedditConfig,
    view: ListView<RedditPost>,
    sink: Arc<dyn ExceptionSink>,
    selected: bool,
}

impl RedditWidget {
    pub fn new(config: RedditConfig, sink: Arc<dyn ExceptionSink>) -> Self {
        Self {
            config,
            view: ListView::new(),
            sink,
            selected: false,
        }
    }

    pub fn listing_mode(&self) -> ListingMode {
        self.config.listing_mode
    }

    pub fn toggle_listing_mode(&mut self) {
        self.config.listing_mode = match self.config.listing_mode {
            ListingMode::Normal => ListingMode::Compact,
            ListingMode::Compact => ListingMode::Normal,
        };
    }
}

/// Parse an upstream `#rrggbb` flair color.
fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Flair badge style: upstream background (or the neutral default), white
/// text for the "light" class and black otherwise.
fn flair_style(post: &RedditPost) -> Style {
    let background = post
        .flair_background
        .as_deref()
        .and_then(parse_hex_color)
        .unwrap_or(FLAIR_DEFAULT_BG);
    let foreground = match post.flair_text_color.as_deref() {
        Some("light") => Color::White,
        _ => Color::Black,
    };
    Style::default().bg(background).fg(foreground)
}

/// Compact relative age of an epoch-seconds timestamp.
fn format_age(created_utc: i64, now_utc: i64) -> String {
    let elapsed = now_utc - created_utc;
    if elapsed < 60 {
        return "now".to_string();
    }

    let minutes = elapsed / 60;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{days}d ago");
    }
    let months = days / 30;
    if months < 12 {
        return format!("{months}mo ago");
    }
    format!("{}y ago", months / 12)
}

fn render_post<'a>(post: &'a RedditPost, index: usize, mode: ListingMode, now_utc: i64) -> ListItem<'a> {
    let mut title_spans = vec![Span::styled(
        format!("{:>2}. ", index + 1),
        Style::default().fg(Color::DarkGray),
    )];
    if mode == ListingMode::Compact {
        title_spans.push(Span::styled(
            format!("▲{:<6}", post.score),
            Style::default().fg(Color::LightRed),
        ));
    }
    if let Some(ref flair) = post.flair_text {
        title_spans.push(Span::styled(format!(" {flair} "), flair_style(post)));
        title_spans.push(Span::raw(" "));
    }
    title_spans.push(Span::styled(&post.title, Style::default().fg(Color::White)));
    let title_line = Line::from(title_spans);

    if mode == ListingMode::Compact {
        return ListItem::new(title_line);
    }

    let meta_line = Line::from(vec![
        Span::styled(
            format!("    {} points", post.score),
            Style::default().fg(Color::LightRed),
        ),
        Span::styled(
            format!(" | {}", format_age(post.created_utc, now_utc)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(" | {} comments", post.num_comments),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(" | r/{}", post.subreddit),
            Style::default().fg(Color::Cyan),
        ),
    ]);

    ListItem::new(vec![title_line, meta_line])
}

impl FeedWidget for RedditWidget {
    fn id(&self) -> String {
        format!(
            "reddit-{}-{}",
            self.config.position.row, self.config.position.col
        )
    }

    fn title(&self) -> &str {
        &self.config.title
    }

    fn position(&self) -> (usize, usize) {
        (self.config.position.row, self.config.position.col)
    }

    fn render(&self, frame: &mut Frame, area: Rect, selected: bool) {
        let border_style = if selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };

        let title = if self.view.items().is_empty() {
            format!(" {} ", self.config.title)
        } else {
            format!(" {} ({}) ", self.config.title, self.view.items().len())
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let mode = self.config.listing_mode;
        let now_utc = Utc::now().timestamp();
        self.view
            .render(frame, area, block, "No posts for your tags.", |post, index| {
                render_post(post, index, mode, now_utc)
            });
    }

    fn begin_refresh(&mut self) -> u64 {
        self.view.begin_refresh()
    }

    fn update_data(&mut self, generation: u64, data: FeedData) {
        match data {
            FeedData::Reddit(posts) => {
                self.view.commit(generation, Ok(posts));
            }
            FeedData::Error(message) => {
                if self.view.commit(generation, Err(message.clone())) {
                    self.sink.track_exception(&self.id(), &message, true);
                }
            }
            // Cycle starts are driven by begin_refresh, not by messages.
            FeedData::Loading => {}
        }
    }

    fn create_fetcher(&self) -> Box<dyn FeedFetcher> {
        Box::new(RedditFetcher::new(
            self.config.tags.clone(),
            self.config.max_posts,
        ))
    }

    fn scroll_up(&mut self) {
        self.view.scroll_up();
    }

    fn scroll_down(&mut self) {
        self.view.scroll_down();
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn get_selected_item(&self) -> Option<SelectedItem> {
        let post = self.view.selected()?;
        Some(SelectedItem {
            title: post.title.clone(),
            url: Some(post.full_url()),
            source: format!("r/{}", post.subreddit),
            metadata: Some(format!(
                "{} points, {} comments",
                post.score, post.num_comments
            )),
        })
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}
