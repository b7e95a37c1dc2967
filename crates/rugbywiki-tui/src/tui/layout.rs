// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row): app name, page tabs           |
// +--------------------------------------------------+
// | Filter Bar (4 rows): league chips, year, search   |
// +--------------------------------------------------+
// | Main Panel (fill): active page                    |
// |                                                   |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas.
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub status_bar: Rect,
    pub filter_bar: Rect,
    pub main_panel: Rect,
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(4), // filter bar
            Constraint::Min(6),    // main panel
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        filter_bar: vertical[1],
        main_panel: vertical[2],
        help_bar: vertical[3],
    }
}

/// Split the fixtures panel into upcoming (top) and recent (bottom) halves.
pub fn split_fixture_panel(area: Rect) -> (Rect, Rect) {
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    (halves[0], halves[1])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
