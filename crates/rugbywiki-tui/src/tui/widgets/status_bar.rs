// Status bar widget: app name, page tabs, loading indicator.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use rugbywiki_app::protocol::PageId;

use crate::tui::ViewState;

const APP_NAME: &str = "RugbyWiki";

/// Render the status bar into the given area.
///
/// Layout: [app name] [page tabs] [loading indicator]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", APP_NAME),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(Color::Gray)),
    ];

    spans.extend(tab_spans(state.active_page));

    if is_busy(state) {
        spans.push(Span::styled(
            "Loading...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Build page tab spans with the active page highlighted.
/// E.g. "[1:Fixtures] [2:Teams] [3:Team Stats]"
pub fn tab_spans(active: PageId) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (index, page) in PageId::ALL.into_iter().enumerate() {
        let style = if page == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(
            format!("[{}:{}]", index + 1, page.title()),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    spans
}

/// Whether anything shown on the active page is still loading.
pub fn is_busy(state: &ViewState) -> bool {
    let page_loading = match state.active_page {
        PageId::Fixtures => state.fixtures.as_ref().is_some_and(|v| v.content.is_loading()),
        PageId::Teams => state.teams.as_ref().is_some_and(|v| v.content.is_loading()),
        PageId::TeamStats => state.stats.as_ref().is_some_and(|v| v.content.is_loading()),
    };
    page_loading || state.leagues.is_loading()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::{buffer_lines, populated_state};
    use rugbywiki_app::protocol::LoadState;

    #[test]
    fn tab_spans_contain_page_titles() {
        let spans = tab_spans(PageId::Fixtures);
        let labels: Vec<&str> = spans
            .iter()
            .step_by(2)
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(labels, vec!["[1:Fixtures]", "[2:Teams]", "[3:Team Stats]"]);
    }

    #[test]
    fn tab_spans_highlight_active() {
        let spans = tab_spans(PageId::Teams);
        assert!(spans[2].style.add_modifier.contains(Modifier::BOLD));
        assert!(!spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn busy_while_leagues_or_page_load() {
        let mut state = populated_state();
        assert!(!is_busy(&state));
        state.leagues = LoadState::Loading;
        assert!(is_busy(&state));
        state.leagues = LoadState::Idle;
        state.fixtures.as_mut().unwrap().content = LoadState::Loading;
        assert!(is_busy(&state));
        // Other pages do not count.
        state.active_page = PageId::Teams;
        assert!(!is_busy(&state));
    }

    #[test]
    fn render_shows_name_and_tabs() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let line = &buffer_lines(terminal.backend().buffer())[0];
        assert!(line.contains("RugbyWiki"));
        assert!(line.contains("[3:Team Stats]"));
        assert!(!line.contains("Loading"));
    }
}
