pub mod list_view;
pub mod widgets;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Draw the complete dashboard for one frame.
pub fn draw(app: &App, frame: &mut Frame) {
    let [grid_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    draw_grid(app, frame, grid_area);
    draw_status_bar(app, frame, status_area);
}

/// Lay the widgets out on a grid derived from their `(row, col)` positions.
/// Rows share the height evenly; widgets within a row share the width evenly.
fn draw_grid(app: &App, frame: &mut Frame, area: Rect) {
    if app.widgets.is_empty() {
        let empty = Paragraph::new("No widgets configured. Add some to config.toml.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let row_count = app
        .widgets
        .iter()
        .map(|widget| widget.position().0)
        .max()
        .unwrap_or(0)
        + 1;

    let row_areas = Layout::vertical(vec![
        Constraint::Ratio(1, row_count as u32);
        row_count
    ])
    .split(area);

    for row in 0..row_count {
        let mut in_row: Vec<usize> = (0..app.widgets.len())
            .filter(|&index| app.widgets[index].position().0 == row)
            .collect();
        if in_row.is_empty() {
            continue;
        }
        in_row.sort_by_key(|&index| app.widgets[index].position().1);

        let col_areas = Layout::horizontal(vec![
            Constraint::Ratio(1, in_row.len() as u32);
            in_row.len()
        ])
        .split(row_areas[row]);

        for (slot, &index) in in_row.iter().enumerate() {
            app.widgets[index].render(frame, col_areas[slot], index == app.focused);
        }
    }
}

fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  q: quit  r: refresh  tab: next card  ↑/↓: scroll  o: open  m: mode"),
    ]));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ListingMode, Position, RedditConfig, Tag, WidgetConfig};
    use crate::telemetry::test_support::RecordingSink;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;

    fn widget_at(row: usize, col: usize) -> WidgetConfig {
        WidgetConfig::Reddit(RedditConfig {
            title: format!("Card {row}{col}"),
            tags: Vec::<Tag>::new(),
            max_posts: 40,
            listing_mode: ListingMode::Normal,
            with_ads: false,
            position: Position { row, col },
        })
    }

    fn render(config: &Config) -> String {
        let app = App::new(config, Arc::new(RecordingSink::default()));
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(&app, frame)).unwrap();

        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    #[test]
    fn draws_every_configured_widget() {
        let config = Config {
            refresh_interval_secs: 300,
            widgets: vec![widget_at(0, 0), widget_at(0, 1), widget_at(1, 0)],
        };
        let screen = render(&config);
        assert!(screen.contains("Card 00"));
        assert!(screen.contains("Card 01"));
        assert!(screen.contains("Card 10"));
    }

    #[test]
    fn draws_placeholder_without_widgets() {
        let config = Config {
            refresh_interval_secs: 300,
            widgets: vec![],
        };
        assert!(render(&config).contains("No widgets configured"));
    }

    #[test]
    fn status_bar_shows_keybindings() {
        let config = Config {
            refresh_interval_secs: 300,
            widgets: vec![widget_at(0, 0)],
        };
        let screen = render(&config);
        assert!(screen.contains("q: quit"));
        assert!(screen.contains("r: refresh"));
    }
}
