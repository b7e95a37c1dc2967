// Team statistics widget: win/loss record, recent form, key fixtures.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use rugbywiki_app::pages::stats::NO_TEAM_MESSAGE;
use rugbywiki_app::protocol::{LoadState, PageId};
use rugbywiki_core::card::{key_fixtures, recent_form, FixtureCard, WinLossCard};
use rugbywiki_core::model::{FormResult, TeamStatistics};

use crate::tui::ViewState;

pub const LOADING_MESSAGE: &str = "Loading team statistics...";
pub const NOT_FOUND_MESSAGE: &str = "No statistics found for this team.";
pub const NO_FORM_MESSAGE: &str = "No recent form available.";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines = match state.stats.as_ref().map(|v| &v.content) {
        None | Some(LoadState::Idle) => vec![message_line(NO_TEAM_MESSAGE.to_string(), Color::DarkGray)],
        Some(LoadState::Loading) => vec![message_line(LOADING_MESSAGE.to_string(), Color::DarkGray)],
        Some(LoadState::Failed(message)) => {
            vec![message_line(format!("Error: {}", message), Color::Red)]
        }
        Some(LoadState::Loaded(None)) => {
            vec![message_line(NOT_FOUND_MESSAGE.to_string(), Color::DarkGray)]
        }
        Some(LoadState::Loaded(Some(stats))) => stats_lines(stats),
    };

    let scroll = u16::try_from(state.scroll(PageId::TeamStats)).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(" Team Stats "));
    frame.render_widget(paragraph, area);
}

/// Full statistics body.
pub fn stats_lines(stats: &TeamStatistics) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let record = WinLossCard::from_stats(stats);

    let mut header = vec![Span::styled(
        format!(" {}", stats.team_name),
        bold.fg(Color::White),
    )];
    if !stats.league_name.is_empty() {
        header.push(Span::styled(
            format!(" ({})", stats.league_name),
            Style::default().fg(Color::Gray),
        ));
    }

    let mut lines = vec![
        Line::from(header),
        Line::default(),
        Line::from(vec![
            Span::raw(" Wins: "),
            Span::styled(record.wins.to_string(), Style::default().fg(Color::Green)),
            Span::raw("  Losses: "),
            Span::styled(record.losses.to_string(), Style::default().fg(Color::Red)),
            Span::raw("  Draws: "),
            Span::styled(record.draws.to_string(), Style::default().fg(Color::Yellow)),
            Span::raw("  Win %: "),
            Span::styled(record.percentage_label(), bold),
        ]),
        Line::raw(format!(
            " Played: {}  Points for: {}  Points against: {}  Total points: {}",
            stats.matches_played, stats.points_for, stats.points_against, stats.total_points
        )),
        Line::default(),
        form_line(&recent_form(stats)),
    ];

    for (heading, fixture, missing) in key_fixtures(stats) {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(format!(" {}", heading), bold)));
        match fixture {
            Some(fixture) => {
                let card = FixtureCard::from_fixture(fixture, fixture.league_name.as_deref());
                lines.push(Line::raw(format!("   {}", card.title)));
                lines.push(Line::from(Span::styled(
                    format!("   {}", card.subtitle),
                    Style::default().fg(Color::Gray),
                )));
            }
            None => lines.push(Line::from(Span::styled(
                format!("   {}", missing),
                Style::default().fg(Color::DarkGray),
            ))),
        }
    }
    lines
}

/// `Recent form: W L D` with each entry colored by outcome.
pub fn form_line(form: &[FormResult]) -> Line<'static> {
    let mut spans = vec![Span::raw(" Recent form: ")];
    if form.is_empty() {
        spans.push(Span::styled(NO_FORM_MESSAGE, Style::default().fg(Color::DarkGray)));
        return Line::from(spans);
    }
    for result in form {
        spans.push(Span::styled(
            result.code().to_string(),
            Style::default()
                .fg(form_color(result))
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn form_color(result: &FormResult) -> Color {
    match result {
        FormResult::Win => Color::Green,
        FormResult::Loss => Color::Red,
        FormResult::Draw => Color::Yellow,
        FormResult::Unknown(_) => Color::Gray,
    }
}

fn message_line(message: String, color: Color) -> Line<'static> {
    Line::from(Span::styled(format!(" {}", message), Style::default().fg(color)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::{buffer_lines, date};
    use rugbywiki_app::protocol::TeamStatsView;
    use rugbywiki_core::model::Fixture;

    fn stats() -> TeamStatistics {
        TeamStatistics {
            team_name: "Leinster".into(),
            league_name: "United Rugby Championship".into(),
            wins: 12,
            losses: 3,
            draws: 1,
            win_percentage: 75.0,
            recent_form: ["W", "W", "L", "D", "W", "W"].iter().map(|s| s.to_string()).collect(),
            last_win: Some(Fixture {
                id: 9,
                home: "Leinster".into(),
                away: "Munster".into(),
                home_score: Some("31".into()),
                away_score: Some("10".into()),
                date_played: date(2025, 4, 12).and_hms_opt(19, 35, 0).unwrap(),
                league_id: 1,
                league_name: Some("United Rugby Championship".into()),
            }),
            last_loss: None,
            biggest_win: None,
            biggest_loss: None,
            matches_played: 16,
            points_for: 480,
            points_against: 250,
            total_points: 60,
        }
    }

    fn draw(content: Option<LoadState<Option<TeamStatistics>>>) -> String {
        let mut state = ViewState::default();
        state.active_page = PageId::TeamStats;
        state.stats = content.map(|content| TeamStatsView {
            team_name: "Leinster".into(),
            content,
        });
        let backend = ratatui::backend::TestBackend::new(90, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        buffer_lines(terminal.backend().buffer()).join("\n")
    }

    #[test]
    fn loaded_stats_render_record_and_fixtures() {
        let screen = draw(Some(LoadState::Loaded(Some(stats()))));
        assert!(screen.contains("Leinster (United Rugby Championship)"));
        assert!(screen.contains("Wins: 12  Losses: 3  Draws: 1  Win %: 75.0%"));
        assert!(screen.contains("Recent form: W L D W W"));
        assert!(screen.contains("Last Win"));
        assert!(screen.contains("Leinster 31 - 10 Munster"));
        assert!(screen.contains("No last loss recorded."));
        assert!(screen.contains("No biggest loss recorded."));
    }

    #[test]
    fn state_messages() {
        assert!(draw(None).contains(NO_TEAM_MESSAGE));
        assert!(draw(Some(LoadState::Loading)).contains(LOADING_MESSAGE));
        assert!(draw(Some(LoadState::Loaded(None))).contains(NOT_FOUND_MESSAGE));
        assert!(draw(Some(LoadState::Failed("HTTP error! status: 500, message: x".into())))
            .contains("Error: HTTP error! status: 500, message: x"));
    }

    #[test]
    fn form_line_colors_outcomes() {
        let line = form_line(&[FormResult::Win, FormResult::Loss]);
        assert_eq!(line.spans[1].style.fg, Some(Color::Green));
        assert_eq!(line.spans[3].style.fg, Some(Color::Red));
    }

    #[test]
    fn empty_form_shows_message() {
        let line = form_line(&[]);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " Recent form: No recent form available.");
    }
}
