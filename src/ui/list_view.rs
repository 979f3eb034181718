use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, List, ListItem, ListState},
    Frame,
};

/// Generic list container shared by the dashboard cards.
///
/// Owns the `(items, loading, error)` triple for one widget and renders
/// exactly one of: a loading indicator, the error's message text, an
/// empty-state line, or one rendered row per item. The container knows
/// nothing about the item type; callers supply a per-row renderer.
///
/// Each refresh cycle is tagged with a generation token. Outcomes from
/// superseded cycles are dropped at the commit site, so a slow response can
/// never overwrite the result of a newer refresh.
pub struct ListView<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
    generation: u64,
    state: ListState,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListView<T> {
    pub fn new() -> Self {
        let mut state = ListState::default();
        state.select(Some(0));

        Self {
            items: Vec::new(),
            loading: true,
            error: None,
            generation: 0,
            state,
        }
    }

    /// Start a new fetch cycle: clear the previous rows and error, show the
    /// loading indicator, and return the cycle's generation token.
    pub fn begin_refresh(&mut self) -> u64 {
        self.items.clear();
        self.error = None;
        self.loading = true;
        self.generation += 1;
        self.generation
    }

    /// Commit a settled fetch outcome for the given cycle. Returns whether
    /// the outcome was applied (stale generations are discarded).
    pub fn commit(&mut self, generation: u64, outcome: Result<Vec<T>, String>) -> bool {
        if generation != self.generation {
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(items) => {
                self.items = items;
                self.error = None;
                if !self.items.is_empty() {
                    let selected = self.state.selected().unwrap_or(0);
                    self.state.select(Some(selected.min(self.items.len() - 1)));
                }
            }
            Err(message) => {
                self.items.clear();
                self.error = Some(message);
            }
        }
        true
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selected(&self) -> Option<&T> {
        self.items.get(self.state.selected()?)
    }

    pub fn scroll_up(&mut self) {
        if let Some(selected) = self.state.selected() {
            if selected > 0 {
                self.state.select(Some(selected - 1));
            }
        }
    }

    pub fn scroll_down(&mut self) {
        if let Some(selected) = self.state.selected() {
            if selected < self.items.len().saturating_sub(1) {
                self.state.select(Some(selected + 1));
            }
        }
    }

    /// Draw the container into `area` with one renderer invocation per item.
    pub fn render<F>(
        &self,
        frame: &mut Frame,
        area: Rect,
        block: Block,
        empty_text: &str,
        render_item: F,
    ) where
        F: for<'a> Fn(&'a T, usize) -> ListItem<'a>,
    {
        if self.loading && self.items.is_empty() && self.error.is_none() {
            let loading = List::new(vec![ListItem::new("Loading...")]).block(block);
            frame.render_widget(loading, area);
            return;
        }

        if let Some(ref error) = self.error {
            let error_row = ListItem::new(error.as_str())
                .style(Style::default().fg(Color::Red));
            frame.render_widget(List::new(vec![error_row]).block(block), area);
            return;
        }

        if self.items.is_empty() {
            let empty = List::new(vec![ListItem::new(empty_text)]).block(block);
            frame.render_widget(empty, area);
            return;
        }

        let rows: Vec<ListItem> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| render_item(item, index))
            .collect();

        let list = List::new(rows).block(block).highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

        let mut state = self.state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}
