// Fixtures page widget: upcoming matches above, recent results below.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use rugbywiki_app::protocol::{LoadState, PageId};
use rugbywiki_core::card::FixtureCard;

use crate::tui::layout::split_fixture_panel;
use crate::tui::ViewState;

pub const LOADING_MESSAGE: &str = "Loading fixtures...";
pub const NO_UPCOMING_MESSAGE: &str = "No upcoming matches for the selected range.";
pub const NO_RECENT_MESSAGE: &str = "No recent results for the selected range.";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (upcoming_area, recent_area) = split_fixture_panel(area);
    let scroll = u16::try_from(state.scroll(PageId::Fixtures)).unwrap_or(u16::MAX);

    let content = state.fixtures.as_ref().map(|v| &v.content);
    let (upcoming, recent) = match content {
        Some(LoadState::Loaded(cards)) => (
            card_lines(&cards.upcoming, NO_UPCOMING_MESSAGE),
            card_lines(&cards.recent, NO_RECENT_MESSAGE),
        ),
        Some(LoadState::Failed(message)) => (error_lines(message), error_lines(message)),
        Some(LoadState::Idle | LoadState::Loading) | None => {
            (status_lines(LOADING_MESSAGE), status_lines(LOADING_MESSAGE))
        }
    };

    render_section(frame, upcoming_area, "Upcoming Matches", upcoming, scroll);
    render_section(frame, recent_area, "Recent Results", recent, scroll);
}

fn render_section(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>, scroll: u16) {
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        );
    frame.render_widget(paragraph, area);
}

/// Two lines per card separated by a blank line, or `empty` when there are
/// no cards.
pub fn card_lines(cards: &[FixtureCard], empty: &'static str) -> Vec<Line<'static>> {
    if cards.is_empty() {
        return status_lines(empty);
    }
    let mut lines = Vec::with_capacity(cards.len() * 3);
    for (i, card) in cards.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        let title_style = if card.is_result {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(Span::styled(format!(" {}", card.title), title_style)));
        lines.push(Line::from(Span::styled(
            format!(" {}", card.subtitle),
            Style::default().fg(Color::Gray),
        )));
    }
    lines
}

fn status_lines(message: &'static str) -> Vec<Line<'static>> {
    vec![Line::from(Span::styled(
        format!(" {}", message),
        Style::default().fg(Color::DarkGray),
    ))]
}

fn error_lines(message: &str) -> Vec<Line<'static>> {
    vec![Line::from(Span::styled(
        format!(" Error: {}", message),
        Style::default().fg(Color::Red),
    ))]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::{buffer_lines, fixtures_view, populated_state, result_card};
    use rugbywiki_app::protocol::FixtureCards;

    fn draw(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(80, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        buffer_lines(terminal.backend().buffer()).join("\n")
    }

    #[test]
    fn loaded_cards_render_in_recent_half() {
        let screen = draw(&populated_state());
        assert!(screen.contains("Upcoming Matches"));
        assert!(screen.contains(NO_UPCOMING_MESSAGE));
        assert!(screen.contains("Recent Results"));
        assert!(screen.contains("Wales 10 - 15 England"));
        assert!(screen.contains("Saturday 01 March 2025 / Six Nations"));
        assert!(!screen.contains(NO_RECENT_MESSAGE));
    }

    #[test]
    fn loading_and_missing_views_show_loading() {
        let mut state = populated_state();
        state.fixtures = Some(fixtures_view(LoadState::Loading));
        assert!(draw(&state).contains(LOADING_MESSAGE));
        state.fixtures = None;
        assert!(draw(&state).contains(LOADING_MESSAGE));
    }

    #[test]
    fn failure_is_shown_in_both_halves() {
        let mut state = populated_state();
        state.fixtures = Some(fixtures_view(LoadState::Failed(
            "Please select a start date on or before the end date.".into(),
        )));
        let screen = draw(&state);
        assert_eq!(
            screen
                .matches("Error: Please select a start date")
                .count(),
            2
        );
    }

    #[test]
    fn card_lines_separate_cards() {
        let mut upcoming = result_card();
        upcoming.id = 43;
        upcoming.title = "Scotland vs. Italy".into();
        upcoming.is_result = false;
        let lines = card_lines(&[result_card(), upcoming], NO_UPCOMING_MESSAGE);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2].spans.len(), 0);
        assert_eq!(lines[3].spans[0].content, " Scotland vs. Italy");
    }

    #[test]
    fn scroll_offset_hides_leading_lines() {
        let mut state = populated_state();
        state.fixtures = Some(fixtures_view(LoadState::Loaded(FixtureCards {
            upcoming: vec![],
            recent: vec![result_card()],
        })));
        state.scroll_offset.insert(PageId::Fixtures, 1);
        let screen = draw(&state);
        assert!(!screen.contains("Wales 10 - 15 England"));
        assert!(screen.contains("Saturday 01 March 2025"));
    }
}
