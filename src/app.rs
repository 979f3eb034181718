use std::sync::Arc;

use chrono::Local;
use tokio::sync::mpsc;

use crate::config::{Config, WidgetConfig};
use crate::feeds::{FeedData, FeedMessage};
use crate::telemetry::ExceptionSink;
use crate::ui::widgets::reddit::RedditWidget;
use crate::ui::widgets::FeedWidget;

/// Top-level dashboard state: the widget set, focus, and the status line.
pub struct App {
    pub widgets: Vec<Box<dyn FeedWidget>>,
    pub focused: usize,
    pub quit: bool,
    pub status: String,
    pub refresh_requested: bool,
}

impl App {
    pub fn new(config: &Config, sink: Arc<dyn ExceptionSink>) -> Self {
        let widgets: Vec<Box<dyn FeedWidget>> = config
            .widgets
            .iter()
            .map(|widget| match widget {
                WidgetConfig::Reddit(reddit) => {
                    Box::new(RedditWidget::new(reddit.clone(), sink.clone()))
                        as Box<dyn FeedWidget>
                }
            })
            .collect();

        let mut app = Self {
            widgets,
            focused: 0,
            quit: false,
            status: "Starting…".to_string(),
            refresh_requested: false,
        };
        if let Some(widget) = app.widgets.get_mut(0) {
            widget.set_selected(true);
        }
        app
    }

    /// Start a new fetch cycle for every widget. Each cycle gets a fresh
    /// generation token; one task per widget performs the fetch and reports
    /// back over the channel.
    pub fn refresh_all(&mut self, tx: &mpsc::UnboundedSender<FeedMessage>) {
        for widget in &mut self.widgets {
            let generation = widget.begin_refresh();
            let widget_id = widget.id();
            let fetcher = widget.create_fetcher();
            let tx = tx.clone();

            tokio::spawn(async move {
                let data = match fetcher.fetch().await {
                    Ok(data) => data,
                    Err(e) => FeedData::Error(e.to_string()),
                };
                // The receiver is gone only when the app is shutting down.
                let _ = tx.send(FeedMessage {
                    widget_id,
                    generation,
                    data,
                });
            });
        }
        self.status = "Refreshing…".to_string();
    }

    /// Route a settled fetch outcome to the widget that started it.
    pub fn handle_message(&mut self, message: FeedMessage) {
        if let Some(widget) = self
            .widgets
            .iter_mut()
            .find(|widget| widget.id() == message.widget_id)
        {
            widget.update_data(message.generation, message.data);
            self.status = format!("Updated {}", Local::now().format("%H:%M:%S"));
        }
    }

    // -- focus ---------------------------------------------------------------

    pub fn focus_next(&mut self) {
        if self.widgets.is_empty() {
            return;
        }
        self.set_focus((self.focused + 1) % self.widgets.len());
    }

    pub fn focus_previous(&mut self) {
        if self.widgets.is_empty() {
            return;
        }
        let previous = self
            .focused
            .checked_sub(1)
            .unwrap_or(self.widgets.len() - 1);
        self.set_focus(previous);
    }

    fn set_focus(&mut self, index: usize) {
        if let Some(widget) = self.widgets.get_mut(self.focused) {
            widget.set_selected(false);
        }
        self.focused = index;
        if let Some(widget) = self.widgets.get_mut(self.focused) {
            widget.set_selected(true);
        }
    }

    // -- actions on the focused widget ---------------------------------------

    pub fn scroll_up(&mut self) {
        if let Some(widget) = self.widgets.get_mut(self.focused) {
            widget.scroll_up();
        }
    }

    pub fn scroll_down(&mut self) {
        if let Some(widget) = self.widgets.get_mut(self.focused) {
            widget.scroll_down();
        }
    }

    pub fn open_selected(&mut self) {
        let Some(item) = self
            .widgets
            .get(self.focused)
            .and_then(|widget| widget.get_selected_item())
        else {
            return;
        };
        let Some(url) = item.url else {
            return;
        };
        match open::that(&url) {
            Ok(()) => self.status = format!("Opened {url}"),
            Err(e) => self.status = format!("Failed to open {url}: {e}"),
        }
    }

    pub fn toggle_listing_mode(&mut self) {
        if let Some(reddit) = self
            .widgets
            .get_mut(self.focused)
            .and_then(|widget| widget.as_any_mut())
            .and_then(|any| any.downcast_mut::<RedditWidget>())
        {
            reddit.toggle_listing_mode();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ListingMode, Position, RedditConfig, Tag};
    use crate::feeds::RedditPost;
    use crate::telemetry::test_support::RecordingSink;

    fn reddit_config(row: usize, col: usize, tags: Vec<Tag>) -> WidgetConfig {
        WidgetConfig::Reddit(RedditConfig {
            title: format!("Reddit {row}-{col}"),
            tags,
            max_posts: 40,
            listing_mode: ListingMode::Normal,
            with_ads: false,
            position: Position { row, col },
        })
    }

    fn two_widget_config() -> Config {
        Config {
            refresh_interval_secs: 300,
            widgets: vec![
                reddit_config(0, 0, vec![]),
                reddit_config(0, 1, vec![]),
            ],
        }
    }

    fn make_app(config: &Config) -> App {
        App::new(config, Arc::new(RecordingSink::default()))
    }

    fn make_post(title: &str) -> RedditPost {
        RedditPost {
            title: title.to_string(),
            subreddit: "test".to_string(),
            flair_text: None,
            flair_background: None,
            flair_text_color: None,
            score: 1,
            num_comments: 0,
            permalink: format!("/r/test/comments/{title}/"),
            created_utc: 1_700_000_000,
        }
    }

    #[test]
    fn builds_one_widget_per_config_entry() {
        let app = make_app(&two_widget_config());
        assert_eq!(app.widgets.len(), 2);
        assert_eq!(app.focused, 0);
        assert!(!app.quit);
    }

    #[test]
    fn focus_wraps_in_both_directions() {
        let mut app = make_app(&two_widget_config());

        app.focus_next();
        assert_eq!(app.focused, 1);
        app.focus_next();
        assert_eq!(app.focused, 0);

        app.focus_previous();
        assert_eq!(app.focused, 1);
    }

    #[test]
    fn focus_on_empty_dashboard_is_a_noop() {
        let config = Config {
            refresh_interval_secs: 300,
            widgets: vec![],
        };
        let mut app = make_app(&config);
        app.focus_next();
        app.focus_previous();
        app.scroll_down();
        assert_eq!(app.focused, 0);
    }

    #[test]
    fn handle_message_routes_by_widget_id() {
        let mut app = make_app(&two_widget_config());
        let generation = app.widgets[1].begin_refresh();

        app.handle_message(FeedMessage {
            widget_id: "reddit-0-1".to_string(),
            generation,
            data: FeedData::Reddit(vec![make_post("routed")]),
        });

        assert_eq!(
            app.widgets[1].get_selected_item().map(|item| item.title),
            Some("routed".to_string())
        );
        assert!(app.widgets[0].get_selected_item().is_none());
    }

    #[test]
    fn message_for_unknown_widget_is_ignored() {
        let mut app = make_app(&two_widget_config());
        app.handle_message(FeedMessage {
            widget_id: "reddit-9-9".to_string(),
            generation: 1,
            data: FeedData::Reddit(vec![make_post("lost")]),
        });
        assert!(app.widgets[0].get_selected_item().is_none());
    }

    #[tokio::test]
    async fn refresh_all_reports_back_for_every_widget() {
        // Widgets whose tags carry no subreddit values resolve without I/O.
        let mut app = make_app(&two_widget_config());
        let (tx, mut rx) = mpsc::unbounded_channel();

        app.refresh_all(&tx);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        let mut ids = vec![first.widget_id.clone(), second.widget_id.clone()];
        ids.sort();
        assert_eq!(ids, vec!["reddit-0-0", "reddit-0-1"]);

        for message in [first, second] {
            assert_eq!(message.data, FeedData::Reddit(vec![]));
            app.handle_message(message);
        }
    }

    #[tokio::test]
    async fn rapid_refreshes_keep_only_the_newest_cycle() {
        // Two refreshes before the first resolves: the late first-cycle
        // response must not overwrite the second cycle's result.
        let mut app = make_app(&two_widget_config());
        let (tx_first, mut rx_first) = mpsc::unbounded_channel();
        let (tx_second, mut rx_second) = mpsc::unbounded_channel();

        app.refresh_all(&tx_first);
        app.refresh_all(&tx_second);

        let for_widget = |messages: [FeedMessage; 2]| {
            messages
                .into_iter()
                .find(|message| message.widget_id == "reddit-0-0")
                .unwrap()
        };

        let mut late =
            for_widget([rx_first.recv().await.unwrap(), rx_first.recv().await.unwrap()]);
        late.data = FeedData::Reddit(vec![make_post("stale")]);

        let mut fresh =
            for_widget([rx_second.recv().await.unwrap(), rx_second.recv().await.unwrap()]);
        fresh.data = FeedData::Reddit(vec![make_post("fresh")]);

        // Deliver the fresh result first, then the straggler.
        app.handle_message(fresh);
        app.handle_message(late);

        assert_eq!(
            app.widgets[0].get_selected_item().map(|item| item.title),
            Some("fresh".to_string())
        );
    }

    #[test]
    fn toggle_listing_mode_reaches_the_focused_widget() {
        let mut app = make_app(&two_widget_config());
        app.toggle_listing_mode();

        let reddit = app.widgets[0]
            .as_any()
            .and_then(|any| any.downcast_ref::<RedditWidget>())
            .unwrap();
        assert_eq!(reddit.listing_mode(), ListingMode::Compact);
    }
}
