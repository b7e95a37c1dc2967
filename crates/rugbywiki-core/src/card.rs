// Display-ready card data for fixtures, teams, and team statistics.
//
// Each card is a plain formatted value; the terminal widgets only lay them
// out.

use crate::dates::pretty_date;
use crate::model::{FormResult, Fixture, Team, TeamStatistics};

/// Maximum number of recent-form entries shown.
pub const RECENT_FORM_LIMIT: usize = 5;

/// A fixture rendered as two lines of text.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureCard {
    pub id: i64,
    /// `Home 10 - 15 Away` for results, `Home vs. Away` otherwise.
    pub title: String,
    /// `<pretty date> / <league name>`.
    pub subtitle: String,
    pub is_result: bool,
}

impl FixtureCard {
    /// Build a card. `league_name` is the resolved display name, if any.
    pub fn from_fixture(fixture: &Fixture, league_name: Option<&str>) -> Self {
        let result = fixture.result();
        let title = match result {
            Some((home, away)) => format!(
                "{} {} - {} {}",
                fixture.home, home, away, fixture.away
            ),
            None => format!("{} vs. {}", fixture.home, fixture.away),
        };
        let subtitle = format!(
            "{} / {}",
            pretty_date(fixture.date_played),
            league_name.unwrap_or("")
        );
        FixtureCard {
            id: fixture.id,
            title,
            subtitle,
            is_result: result.is_some(),
        }
    }

    /// Build a card that never shows a score, used for upcoming fixtures.
    pub fn scheduled(fixture: &Fixture, league_name: Option<&str>) -> Self {
        FixtureCard {
            title: format!("{} vs. {}", fixture.home, fixture.away),
            is_result: false,
            ..FixtureCard::from_fixture(fixture, league_name)
        }
    }
}

/// A team rendered as name plus league.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamCard {
    pub name: String,
    pub league: String,
}

impl From<&Team> for TeamCard {
    fn from(team: &Team) -> Self {
        TeamCard {
            name: team.name.clone(),
            league: team.league_name.clone(),
        }
    }
}

/// Headline counts for the statistics page.
#[derive(Debug, Clone, PartialEq)]
pub struct WinLossCard {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub win_percentage: f64,
}

impl WinLossCard {
    pub fn from_stats(stats: &TeamStatistics) -> Self {
        WinLossCard {
            wins: stats.wins,
            losses: stats.losses,
            draws: stats.draws,
            win_percentage: stats.win_percentage,
        }
    }

    /// Win percentage formatted with one decimal place.
    pub fn percentage_label(&self) -> String {
        format!("{:.1}%", self.win_percentage)
    }
}

/// The last `RECENT_FORM_LIMIT` form entries, oldest first.
pub fn recent_form(stats: &TeamStatistics) -> Vec<FormResult> {
    let form = stats.form();
    let skip = form.len().saturating_sub(RECENT_FORM_LIMIT);
    form.into_iter().skip(skip).collect()
}

/// The four highlighted fixtures of a statistics record, in display order,
/// each with its heading and the message shown when it is missing.
pub fn key_fixtures(stats: &TeamStatistics) -> [(&'static str, Option<&Fixture>, &'static str); 4] {
    [
        ("Last Win", stats.last_win.as_ref(), "No last win recorded."),
        ("Last Loss", stats.last_loss.as_ref(), "No last loss recorded."),
        ("Biggest Win", stats.biggest_win.as_ref(), "No biggest win recorded."),
        ("Biggest Loss", stats.biggest_loss.as_ref(), "No biggest loss recorded."),
    ]
}
