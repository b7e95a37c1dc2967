// Backend entity shapes: fixtures, leagues, teams, and team statistics.
//
// All entities are read-only snapshots of backend data. JSON keys are
// camelCase on the wire.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::dates::date_played_format;

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// A scheduled or played match.
///
/// Scores are only present once a match has been played. Fixture lists send
/// them as numeric strings, statistics records as numbers; both are kept as
/// strings and interpreted through [`parse_score`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub id: i64,
    pub home: String,
    pub away: String,
    #[serde(default, deserialize_with = "score_field")]
    pub home_score: Option<String>,
    #[serde(default, deserialize_with = "score_field")]
    pub away_score: Option<String>,
    #[serde(with = "date_played_format")]
    pub date_played: NaiveDateTime,
    pub league_id: i64,
    #[serde(default)]
    pub league_name: Option<String>,
}

impl Fixture {
    /// Calendar date of the match, time of day dropped.
    pub fn calendar_date(&self) -> NaiveDate {
        self.date_played.date()
    }

    pub fn home_points(&self) -> Option<i32> {
        parse_score(self.home_score.as_deref())
    }

    pub fn away_points(&self) -> Option<i32> {
        parse_score(self.away_score.as_deref())
    }

    /// Final score as `(home, away)`, only when both sides have a score.
    pub fn result(&self) -> Option<(i32, i32)> {
        Some((self.home_points()?, self.away_points()?))
    }
}

/// Interpret a raw score field.
///
/// A score is present only when the trimmed text is non-empty and parses as
/// an integer; everything else means "no score".
pub fn parse_score(raw: Option<&str>) -> Option<i32> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}

/// Accept a score sent as string, integer, or null.
fn score_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawScore {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<RawScore>::deserialize(deserializer)? {
        Some(RawScore::Text(s)) => Some(s),
        Some(RawScore::Int(n)) => Some(n.to_string()),
        Some(RawScore::Float(f)) => Some(f.to_string()),
        None => None,
    })
}

// ---------------------------------------------------------------------------
// League / Team
// ---------------------------------------------------------------------------

/// A named competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: i64,
    pub name: String,
}

/// A team as reported for a league. The name is the identity key within a
/// league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub name: String,
    pub league_id: i64,
    #[serde(default)]
    pub league_name: String,
}

// ---------------------------------------------------------------------------
// Team statistics
// ---------------------------------------------------------------------------

/// Aggregate record for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStatistics {
    pub team_name: String,
    #[serde(default)]
    pub league_name: String,
    pub wins: u32,
    pub losses: u32,
    #[serde(default)]
    pub draws: u32,
    #[serde(default)]
    pub win_percentage: f64,
    /// Outcome codes, most recent last.
    #[serde(default)]
    pub recent_form: Vec<String>,
    #[serde(default)]
    pub last_win: Option<Fixture>,
    #[serde(default)]
    pub last_loss: Option<Fixture>,
    #[serde(default)]
    pub biggest_win: Option<Fixture>,
    #[serde(default)]
    pub biggest_loss: Option<Fixture>,
    #[serde(default)]
    pub matches_played: u32,
    #[serde(default)]
    pub points_for: u32,
    #[serde(default)]
    pub points_against: u32,
    #[serde(default)]
    pub total_points: u32,
}

impl TeamStatistics {
    /// Parsed recent form, most recent last.
    pub fn form(&self) -> Vec<FormResult> {
        self.recent_form.iter().map(|c| FormResult::from_code(c)).collect()
    }
}

/// One entry of a team's recent form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult {
    Win,
    Loss,
    Draw,
    Unknown(String),
}

impl FormResult {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "W" => FormResult::Win,
            "L" => FormResult::Loss,
            "D" => FormResult::Draw,
            _ => FormResult::Unknown(code.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            FormResult::Win => "W",
            FormResult::Loss => "L",
            FormResult::Draw => "D",
            FormResult::Unknown(code) => code,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
