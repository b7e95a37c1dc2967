// Filter bar widget: league chips, year, date range and search term.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use rugbywiki_app::protocol::{LoadState, PageId};
use rugbywiki_core::dates::query_date;
use rugbywiki_core::filter::FilterCriteria;

use crate::tui::ViewState;

/// Placeholder chips shown while leagues load.
const SKELETON_CHIPS: usize = 4;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines = match (state.active_page, state.active_criteria()) {
        (PageId::TeamStats, _) | (_, None) => stats_lines(state),
        (_, Some(criteria)) => vec![
            league_line(state, criteria.league_id),
            year_line(state, criteria),
            search_line(state, criteria),
        ],
    };

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}

/// League chips: `All` followed by every league, the selected one highlighted.
pub fn league_line(state: &ViewState, selected: Option<i64>) -> Line<'static> {
    let mut spans = vec![label("League: ")];
    match &state.leagues {
        LoadState::Loaded(_) => {
            for option in state.league_options() {
                let name = match option {
                    None => "All".to_string(),
                    Some(id) => state.league_name(id).unwrap_or("?").to_string(),
                };
                spans.push(chip(name, option == selected));
                spans.push(Span::raw(" "));
            }
        }
        LoadState::Failed(message) => {
            spans.push(Span::styled(
                format!("Error: {}", message),
                Style::default().fg(Color::Red),
            ));
        }
        LoadState::Idle | LoadState::Loading => {
            for _ in 0..SKELETON_CHIPS {
                spans.push(Span::styled("[░░░░░░]", Style::default().fg(Color::DarkGray)));
                spans.push(Span::raw(" "));
            }
        }
    }
    Line::from(spans)
}

fn year_line(state: &ViewState, criteria: &FilterCriteria) -> Line<'static> {
    let date_range = match state.active_page {
        PageId::Fixtures => state.fixtures.as_ref().and_then(|v| v.date_range),
        _ => None,
    };
    match date_range {
        Some((start, end)) => Line::from(vec![
            label("Dates: "),
            Span::styled(
                format!("{} to {}", query_date(start), query_date(end)),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        None => {
            let year = criteria
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "All years".to_string());
            Line::from(vec![
                label("Year:   "),
                Span::styled(year, Style::default().fg(Color::Cyan)),
            ])
        }
    }
}

fn search_line(state: &ViewState, criteria: &FilterCriteria) -> Line<'static> {
    if state.search_mode {
        return Line::from(vec![
            label("Search: "),
            Span::styled(
                format!("{}_", state.search_text),
                Style::default().fg(Color::Yellow),
            ),
        ]);
    }
    let text = if criteria.search.is_empty() {
        Span::styled("(none)", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(criteria.search.clone())
    };
    Line::from(vec![label("Search: "), text])
}

fn stats_lines(state: &ViewState) -> Vec<Line<'static>> {
    let team = state
        .stats
        .as_ref()
        .map(|v| v.team_name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "(none)".to_string());
    vec![Line::from(vec![
        label("Team:   "),
        Span::styled(
            team,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ])]
}

fn label(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().fg(Color::Gray))
}

fn chip(name: String, selected: bool) -> Span<'static> {
    let style = if selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Span::styled(format!("[{}]", name), style)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::{buffer_lines, date, populated_state};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn draw(state: &ViewState) -> Vec<String> {
        let backend = ratatui::backend::TestBackend::new(100, 4);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        buffer_lines(terminal.backend().buffer())
    }

    #[test]
    fn league_chips_highlight_selection() {
        let state = populated_state();
        let line = league_line(&state, Some(4));
        assert_eq!(
            line_text(&line),
            "League: [All] [United Rugby Championship] [Gallagher Premiership] "
        );
        let selected: Vec<&str> = line
            .spans
            .iter()
            .filter(|s| s.style.add_modifier.contains(Modifier::BOLD))
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(selected, vec!["[Gallagher Premiership]"]);
    }

    #[test]
    fn loading_leagues_show_skeleton() {
        let mut state = populated_state();
        state.leagues = LoadState::Loading;
        let text = line_text(&league_line(&state, None));
        assert!(text.contains("░"));
        assert!(!text.contains("[All]"));
    }

    #[test]
    fn failed_leagues_show_error() {
        let mut state = populated_state();
        state.leagues = LoadState::Failed("HTTP error! status: 500, message: boom".into());
        let text = line_text(&league_line(&state, None));
        assert_eq!(
            text,
            "League: Error: HTTP error! status: 500, message: boom"
        );
    }

    #[test]
    fn date_range_replaces_year() {
        let mut state = populated_state();
        let rows = draw(&state);
        assert!(rows.iter().any(|r| r.contains("Year:   2025")));

        state.fixtures.as_mut().unwrap().date_range = Some((date(2025, 6, 1), date(2025, 7, 31)));
        let rows = draw(&state);
        assert!(rows.iter().any(|r| r.contains("Dates: 2025-06-01 to 2025-07-31")));
        assert!(!rows.iter().any(|r| r.contains("Year:")));
    }

    #[test]
    fn search_line_shows_editing_cursor() {
        let mut state = populated_state();
        state.search_mode = true;
        state.search_text = "osp".into();
        let rows = draw(&state);
        assert!(rows.iter().any(|r| r.contains("Search: osp_")));
    }

    #[test]
    fn stats_page_shows_team_name() {
        let mut state = populated_state();
        state.active_page = PageId::TeamStats;
        let rows = draw(&state);
        assert!(rows.iter().any(|r| r.contains("Team:   (none)")));
    }
}
