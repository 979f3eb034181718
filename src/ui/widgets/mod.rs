pub mod reddit;

use std::any::Any;

use ratatui::{layout::Rect, Frame};

use crate::feeds::{FeedData, FeedFetcher};

/// The currently highlighted row of a widget, used by row-level actions
/// such as opening the item in a browser.
#[derive(Debug, Clone)]
pub struct SelectedItem {
    pub title: String,
    pub url: Option<String>,
    pub source: String,
    pub metadata: Option<String>,
}

/// A dashboard card: owns its display state, knows its grid position, and
/// builds the fetcher that produces its data.
pub trait FeedWidget: Send {
    fn id(&self) -> String;

    fn title(&self) -> &str;

    fn position(&self) -> (usize, usize);

    fn render(&self, frame: &mut Frame, area: Rect, selected: bool);

    /// Start a new fetch cycle, returning its generation token.
    fn begin_refresh(&mut self) -> u64;

    /// Apply a settled fetch outcome for the cycle tagged `generation`.
    fn update_data(&mut self, generation: u64, data: FeedData);

    fn create_fetcher(&self) -> Box<dyn FeedFetcher>;

    fn scroll_up(&mut self);

    fn scroll_down(&mut self);

    fn set_selected(&mut self, selected: bool);

    fn get_selected_item(&self) -> Option<SelectedItem> {
        None
    }

    fn as_any(&self) -> Option<&dyn Any> {
        None
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        None
    }
}
