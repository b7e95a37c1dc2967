// Teams page widget: table of team name and league with a selected row.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use rugbywiki_app::protocol::LoadState;
use rugbywiki_core::filter::FilterCriteria;

use crate::tui::ViewState;

pub const LOADING_MESSAGE: &str = "Loading teams...";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title(" Teams ");

    let Some(view) = state.teams.as_ref() else {
        render_message(frame, area, block, LOADING_MESSAGE.to_string(), Color::DarkGray);
        return;
    };

    match &view.content {
        LoadState::Idle | LoadState::Loading => {
            render_message(frame, area, block, LOADING_MESSAGE.to_string(), Color::DarkGray);
        }
        LoadState::Failed(message) => {
            render_message(frame, area, block, format!("Error: {}", message), Color::Red);
        }
        LoadState::Loaded(cards) if cards.is_empty() => {
            render_message(frame, area, block, empty_message(state, &view.criteria), Color::DarkGray);
        }
        LoadState::Loaded(cards) => {
            let header = Row::new(vec![Cell::from("Team"), Cell::from("League")]).style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );
            let rows: Vec<Row> = cards
                .iter()
                .map(|card| {
                    Row::new(vec![
                        Cell::from(card.name.clone()),
                        Cell::from(card.league.clone()),
                    ])
                })
                .collect();
            let widths = [Constraint::Min(24), Constraint::Min(24)];
            let table = Table::new(rows, widths)
                .header(header)
                .block(block)
                .row_highlight_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");
            let mut table_state = TableState::default().with_selected(Some(state.selected_team));
            frame.render_stateful_widget(table, area, &mut table_state);
        }
    }
}

/// "No teams found for {league} in {year}." with `all leagues` / `all years`
/// standing in for missing criteria.
pub fn empty_message(state: &ViewState, criteria: &FilterCriteria) -> String {
    let league = criteria
        .league_id
        .map(|id| {
            state
                .league_name(id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("league {}", id))
        })
        .unwrap_or_else(|| "all leagues".to_string());
    let year = criteria
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "all years".to_string());
    format!("No teams found for {} in {}.", league, year)
}

fn render_message(frame: &mut Frame, area: Rect, block: Block, message: String, color: Color) {
    let paragraph = Paragraph::new(Line::styled(format!(" {}", message), Style::default().fg(color)))
        .block(block);
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::{buffer_lines, populated_state, teams_view};

    fn draw(state: &ViewState) -> Vec<String> {
        let backend = ratatui::backend::TestBackend::new(80, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        buffer_lines(terminal.backend().buffer())
    }

    #[test]
    fn selected_row_is_marked() {
        let mut state = populated_state();
        state.selected_team = 1;
        let rows = draw(&state);
        let marked: Vec<&String> = rows.iter().filter(|r| r.contains("> ")).collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0].contains("Ospreys"));
        assert!(rows.iter().any(|r| r.contains("Cardiff Rugby")));
    }

    #[test]
    fn empty_list_names_league_and_year() {
        let mut state = populated_state();
        state.teams = Some(teams_view(&[]));
        let rows = draw(&state);
        assert!(rows
            .iter()
            .any(|r| r.contains("No teams found for United Rugby Championship in 2025.")));
    }

    #[test]
    fn empty_message_without_criteria() {
        let state = populated_state();
        let criteria = FilterCriteria::new(None, None);
        assert_eq!(
            empty_message(&state, &criteria),
            "No teams found for all leagues in all years."
        );
    }

    #[test]
    fn loading_and_error_states() {
        let mut state = populated_state();
        state.teams = None;
        assert!(draw(&state).iter().any(|r| r.contains(LOADING_MESSAGE)));

        let mut view = teams_view(&[]);
        view.content = LoadState::Failed("HTTP error! status: 404, message: nope".into());
        state.teams = Some(view);
        assert!(draw(&state)
            .iter()
            .any(|r| r.contains("Error: HTTP error! status: 404")));
    }
}
