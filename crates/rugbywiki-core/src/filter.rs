// Derived-state filter engine.
//
// Pure functions that turn a raw fetched collection plus a `FilterCriteria`
// into the subsets the views display. `today` is always passed in so every
// derivation is deterministic.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::model::{Fixture, League, Team};

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// The user's current filter selection for a page.
///
/// Treated as an immutable value: the `with_*` methods return a modified copy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    /// `None` selects all leagues.
    pub league_id: Option<i64>,
    /// `None` disables the year filter.
    pub year: Option<i32>,
    pub search: String,
}

impl FilterCriteria {
    pub fn new(league_id: Option<i64>, year: Option<i32>) -> Self {
        FilterCriteria {
            league_id,
            year,
            search: String::new(),
        }
    }

    pub fn with_league(&self, league_id: Option<i64>) -> Self {
        FilterCriteria {
            league_id,
            ..self.clone()
        }
    }

    pub fn with_year(&self, year: Option<i32>) -> Self {
        FilterCriteria {
            year,
            ..self.clone()
        }
    }

    pub fn with_search(&self, search: impl Into<String>) -> Self {
        FilterCriteria {
            search: search.into(),
            ..self.clone()
        }
    }

    /// The search term with surrounding whitespace removed, or `None` when
    /// blank.
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        (!term.is_empty()).then_some(term)
    }
}

// ---------------------------------------------------------------------------
// League name lookup
// ---------------------------------------------------------------------------

/// League id -> name lookup built from the loaded league list.
#[derive(Debug, Clone, Default)]
pub struct LeagueIndex {
    names: HashMap<i64, String>,
}

impl LeagueIndex {
    pub fn new(leagues: &[League]) -> Self {
        LeagueIndex {
            names: leagues.iter().map(|l| (l.id, l.name.clone())).collect(),
        }
    }

    pub fn name(&self, league_id: i64) -> Option<&str> {
        self.names.get(&league_id).map(String::as_str)
    }

    /// Name for display on a fixture: the loaded league list first, then the
    /// name embedded in the fixture itself.
    pub fn display_name<'a>(&'a self, fixture: &'a Fixture) -> Option<&'a str> {
        self.name(fixture.league_id)
            .or(fixture.league_name.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Fixture predicates
// ---------------------------------------------------------------------------

/// A fixture is upcoming when its calendar date is today or later.
pub fn is_upcoming(fixture: &Fixture, today: NaiveDate) -> bool {
    fixture.calendar_date() >= today
}

pub fn is_recent(fixture: &Fixture, today: NaiveDate) -> bool {
    !is_upcoming(fixture, today)
}

pub fn in_year(fixture: &Fixture, year: i32) -> bool {
    fixture.date_played.year() == year
}

/// Case-insensitive substring match on home team, away team, and the league
/// name resolved through `leagues`. An unresolved league counts as an empty
/// name. A blank term matches everything.
pub fn matches_search(fixture: &Fixture, term: &str, leagues: &LeagueIndex) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    let league_name = leagues.name(fixture.league_id).unwrap_or("");
    [fixture.home.as_str(), fixture.away.as_str(), league_name]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
}

// ---------------------------------------------------------------------------
// Collection filters
// ---------------------------------------------------------------------------

pub fn filter_by_league(fixtures: &[Fixture], league_id: i64) -> Vec<Fixture> {
    fixtures
        .iter()
        .filter(|f| f.league_id == league_id)
        .cloned()
        .collect()
}

pub fn filter_by_year(fixtures: &[Fixture], year: i32) -> Vec<Fixture> {
    fixtures.iter().filter(|f| in_year(f, year)).cloned().collect()
}

pub fn filter_by_search(fixtures: &[Fixture], term: &str, leagues: &LeagueIndex) -> Vec<Fixture> {
    fixtures
        .iter()
        .filter(|f| matches_search(f, term, leagues))
        .cloned()
        .collect()
}

/// Fixtures partitioned around today.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FixtureSplit {
    /// Fetch order.
    pub upcoming: Vec<Fixture>,
    /// Most recent first.
    pub recent: Vec<Fixture>,
}

impl FixtureSplit {
    pub fn len(&self) -> usize {
        self.upcoming.len() + self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition fixtures into upcoming (fetch order) and recent (date
/// descending). The sort is stable, so fixtures on the same date keep their
/// fetch order.
pub fn split_fixtures(fixtures: &[Fixture], today: NaiveDate) -> FixtureSplit {
    let (upcoming, mut recent): (Vec<Fixture>, Vec<Fixture>) = fixtures
        .iter()
        .cloned()
        .partition(|f| is_upcoming(f, today));
    recent.sort_by(|a, b| b.date_played.cmp(&a.date_played));
    FixtureSplit { upcoming, recent }
}

/// Full derivation for the fixtures view: league, year, search, then split.
pub fn derive_fixtures(
    fixtures: &[Fixture],
    criteria: &FilterCriteria,
    leagues: &LeagueIndex,
    today: NaiveDate,
) -> FixtureSplit {
    let mut kept = match criteria.league_id {
        Some(league_id) => filter_by_league(fixtures, league_id),
        None => fixtures.to_vec(),
    };
    if let Some(year) = criteria.year {
        kept = filter_by_year(&kept, year);
    }
    let kept = filter_by_search(&kept, criteria.search_term().unwrap_or(""), leagues);
    split_fixtures(&kept, today)
}

/// Case-insensitive team search on team name or league name. Fetch order is
/// kept; a blank term returns every team.
pub fn filter_teams(teams: &[Team], term: &str) -> Vec<Team> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return teams.to_vec();
    }
    teams
        .iter()
        .filter(|t| {
            t.name.to_lowercase().contains(&term) || t.league_name.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

/// Teams view derivation: the selected league (when one is selected), then
/// the search term. The year is not applied here; it only scopes the request.
pub fn derive_teams(teams: &[Team], criteria: &FilterCriteria) -> Vec<Team> {
    let in_league: Vec<Team> = match criteria.league_id {
        Some(league_id) => teams
            .iter()
            .filter(|t| t.league_id == league_id)
            .cloned()
            .collect(),
        None => teams.to_vec(),
    };
    filter_teams(&in_league, criteria.search_term().unwrap_or(""))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixture(id: i64, home: &str, away: &str, day: NaiveDate, league_id: i64) -> Fixture {
        Fixture {
            id,
            home: home.into(),
            away: away.into(),
            home_score: None,
            away_score: None,
            date_played: day.and_time(NaiveTime::MIN),
            league_id,
            league_name: None,
        }
    }

    fn leagues() -> LeagueIndex {
        LeagueIndex::new(&[
            League {
                id: 1,
                name: "United Rugby Championship".into(),
            },
            League {
                id: 4,
                name: "Gallagher Premiership".into(),
            },
        ])
    }

    // -- upcoming / recent --

    #[test]
    fn fixture_dated_today_is_upcoming() {
        let today = date(2025, 3, 1);
        let mut f = fixture(1, "A", "B", today, 1);
        assert!(is_upcoming(&f, today));
        // Late evening kick-off is still today.
        f.date_played = today.and_hms_opt(23, 59, 59).unwrap();
        assert!(is_upcoming(&f, today));
    }

    #[test]
    fn fixture_before_today_is_recent() {
        let today = date(2025, 3, 1);
        let mut f = fixture(1, "A", "B", date(2025, 2, 28), 1);
        f.date_played = date(2025, 2, 28).and_hms_opt(23, 59, 59).unwrap();
        assert!(!is_upcoming(&f, today));
        assert!(is_recent(&f, today));
    }

    #[test]
    fn split_is_exhaustive_and_exclusive() {
        let today = date(2025, 3, 1);
        let all = vec![
            fixture(1, "A", "B", date(2025, 2, 1), 1),
            fixture(2, "C", "D", date(2025, 3, 1), 1),
            fixture(3, "E", "F", date(2025, 4, 1), 1),
            fixture(4, "G", "H", date(2024, 12, 1), 1),
        ];
        let split = split_fixtures(&all, today);
        assert_eq!(split.len(), all.len());
        for f in &split.upcoming {
            assert!(!split.recent.iter().any(|r| r.id == f.id));
        }
        assert_eq!(
            split.upcoming.iter().map(|f| f.id).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn recent_sorted_most_recent_first_upcoming_keeps_fetch_order() {
        let today = date(2025, 6, 1);
        let all = vec![
            fixture(1, "A", "B", date(2025, 1, 10), 1),
            fixture(2, "C", "D", date(2025, 9, 1), 1),
            fixture(3, "E", "F", date(2025, 5, 20), 1),
            fixture(4, "G", "H", date(2025, 7, 1), 1),
            fixture(5, "I", "J", date(2025, 3, 3), 1),
        ];
        let split = split_fixtures(&all, today);
        assert_eq!(
            split.recent.iter().map(|f| f.id).collect::<Vec<_>>(),
            vec![3, 5, 1]
        );
        assert_eq!(
            split.upcoming.iter().map(|f| f.id).collect::<Vec<_>>(),
            vec![2, 4]
        );
        for pair in split.recent.windows(2) {
            assert!(pair[0].date_played >= pair[1].date_played);
        }
    }

    #[test]
    fn equal_dates_keep_fetch_order_in_recent() {
        let today = date(2025, 6, 1);
        let day = date(2025, 5, 1);
        let all = vec![
            fixture(7, "A", "B", day, 1),
            fixture(8, "C", "D", day, 1),
        ];
        let split = split_fixtures(&all, today);
        assert_eq!(
            split.recent.iter().map(|f| f.id).collect::<Vec<_>>(),
            vec![7, 8]
        );
    }

    // -- year --

    #[test]
    fn year_filter_is_exact() {
        let all = vec![
            fixture(1, "A", "B", date(2024, 12, 31), 1),
            fixture(2, "C", "D", date(2025, 1, 1), 1),
            fixture(3, "E", "F", date(2025, 12, 31), 1),
            fixture(4, "G", "H", date(2026, 1, 1), 1),
        ];
        let kept = filter_by_year(&all, 2025);
        assert_eq!(kept.iter().map(|f| f.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    // -- search --

    #[test]
    fn search_matches_team_names_case_insensitively() {
        let idx = leagues();
        let f = fixture(1, "Leinster", "Munster", date(2025, 1, 1), 1);
        assert!(matches_search(&f, "leIN", &idx));
        assert!(matches_search(&f, "MUNSTER", &idx));
        assert!(!matches_search(&f, "ulster", &idx));
    }

    #[test]
    fn search_matches_resolved_league_name() {
        let idx = leagues();
        let f = fixture(1, "Bath", "Sale", date(2025, 1, 1), 4);
        assert!(matches_search(&f, "premiership", &idx));
        assert!(!matches_search(&f, "championship", &idx));
    }

    #[test]
    fn unresolved_league_only_matches_team_names() {
        let idx = leagues();
        let mut f = fixture(1, "Bath", "Sale", date(2025, 1, 1), 99);
        f.league_name = Some("Premiership Cup".into());
        assert!(!matches_search(&f, "cup", &idx));
        assert!(matches_search(&f, "bath", &idx));
    }

    #[test]
    fn empty_search_yields_unfiltered_set() {
        let idx = leagues();
        let all = vec![
            fixture(1, "A", "B", date(2025, 1, 1), 1),
            fixture(2, "C", "D", date(2025, 1, 2), 4),
        ];
        assert_eq!(filter_by_search(&all, "", &idx), all);
        assert_eq!(filter_by_search(&all, "   ", &idx), all);
    }

    // -- derive --

    #[test]
    fn derive_applies_league_year_and_search() {
        let idx = leagues();
        let today = date(2025, 6, 1);
        let all = vec![
            fixture(1, "Bath", "Sale", date(2025, 2, 1), 4),
            fixture(2, "Bath", "Leicester", date(2024, 2, 1), 4),
            fixture(3, "Cardiff", "Bath", date(2025, 8, 1), 1),
            fixture(4, "Saracens", "Harlequins", date(2025, 3, 1), 4),
        ];
        let criteria = FilterCriteria::new(Some(4), Some(2025)).with_search("bath");
        let split = derive_fixtures(&all, &criteria, &idx, today);
        assert!(split.upcoming.is_empty());
        assert_eq!(split.recent.iter().map(|f| f.id).collect::<Vec<_>>(), vec![1]);

        let everything = derive_fixtures(&all, &FilterCriteria::default(), &idx, today);
        assert_eq!(everything.len(), 4);
    }

    #[test]
    fn criteria_copies_leave_original_untouched() {
        let base = FilterCriteria::new(Some(1), Some(2025));
        let searched = base.with_search("  wales ");
        assert_eq!(base.search, "");
        assert_eq!(searched.search_term(), Some("wales"));
        assert_eq!(searched.with_league(None).league_id, None);
        assert_eq!(searched.with_year(Some(2024)).year, Some(2024));
        assert_eq!(base.search_term(), None);
    }

    #[test]
    fn display_name_prefers_loaded_leagues() {
        let idx = leagues();
        let mut f = fixture(1, "A", "B", date(2025, 1, 1), 1);
        f.league_name = Some("URC".into());
        assert_eq!(idx.display_name(&f), Some("United Rugby Championship"));
        f.league_id = 42;
        assert_eq!(idx.display_name(&f), Some("URC"));
        f.league_name = None;
        assert_eq!(idx.display_name(&f), None);
    }

    // -- teams --

    #[test]
    fn team_search_on_name_and_league() {
        let teams = vec![
            Team {
                name: "Bath".into(),
                league_id: 4,
                league_name: "Gallagher Premiership".into(),
            },
            Team {
                name: "Cardiff".into(),
                league_id: 1,
                league_name: "United Rugby Championship".into(),
            },
        ];
        assert_eq!(filter_teams(&teams, "").len(), 2);
        assert_eq!(filter_teams(&teams, "CARD")[0].name, "Cardiff");
        assert_eq!(filter_teams(&teams, "premiership")[0].name, "Bath");
        assert!(filter_teams(&teams, "ulster").is_empty());
    }

    #[test]
    fn derive_teams_scopes_to_selected_league() {
        let teams = vec![
            Team {
                name: "Bath".into(),
                league_id: 4,
                league_name: "Gallagher Premiership".into(),
            },
            Team {
                name: "Cardiff".into(),
                league_id: 1,
                league_name: "United Rugby Championship".into(),
            },
        ];
        let names = |criteria: &FilterCriteria| -> Vec<String> {
            derive_teams(&teams, criteria)
                .into_iter()
                .map(|t| t.name)
                .collect()
        };
        assert_eq!(names(&FilterCriteria::new(Some(4), None)), vec!["Bath"]);
        assert_eq!(names(&FilterCriteria::new(None, None)), vec!["Bath", "Cardiff"]);
        assert!(names(&FilterCriteria::new(Some(4), None).with_search("cardiff")).is_empty());
    }

    #[test]
    fn league_filter_keeps_only_that_league() {
        let all = vec![
            fixture(1, "A", "B", date(2025, 1, 1), 1),
            fixture(2, "C", "D", date(2025, 1, 2), 4),
        ];
        let kept = filter_by_league(&all, 4);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 2);
    }
}
