// Messages exchanged between the TUI and the orchestrator task.
//
// `UserCommand` flows TUI -> app, `UiUpdate` flows app -> TUI. Every update
// carries a complete snapshot of the page it describes, so the TUI never has
// to merge partial state.

use chrono::NaiveDate;

use rugbywiki_core::card::{FixtureCard, TeamCard};
use rugbywiki_core::filter::FilterCriteria;
use rugbywiki_core::model::{League, TeamStatistics};

// ---------------------------------------------------------------------------
// Pages and load state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageId {
    #[default]
    Fixtures,
    Teams,
    TeamStats,
}

impl PageId {
    pub const ALL: [PageId; 3] = [PageId::Fixtures, PageId::Teams, PageId::TeamStats];

    pub fn title(self) -> &'static str {
        match self {
            PageId::Fixtures => "Fixtures",
            PageId::Teams => "Teams",
            PageId::TeamStats => "Team Stats",
        }
    }
}

/// Lifecycle of one load cycle on a page.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            LoadState::Idle => LoadState::Idle,
            LoadState::Loading => LoadState::Loading,
            LoadState::Loaded(value) => LoadState::Loaded(f(value)),
            LoadState::Failed(message) => LoadState::Failed(message),
        }
    }
}

// ---------------------------------------------------------------------------
// TUI -> app
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    SwitchPage(PageId),
    /// `None` selects all leagues. Applies to the active page.
    SelectLeague(Option<i64>),
    /// `None` disables the year filter. Applies to the active page.
    SelectYear(Option<i32>),
    /// Applies to the active page.
    SetSearch(String),
    /// Switch the fixtures page to an explicit schedule window.
    SetDateRange { start: NaiveDate, end: NaiveDate },
    ClearDateRange,
    OpenTeamStats(String),
    Reload,
    Quit,
}

// ---------------------------------------------------------------------------
// app -> TUI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Leagues(LoadState<Vec<League>>),
    Fixtures(Box<FixturesView>),
    Teams(Box<TeamsView>),
    TeamStats(Box<TeamStatsView>),
    PageChanged(PageId),
}

/// Fixture cards split around today.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FixtureCards {
    pub upcoming: Vec<FixtureCard>,
    /// Most recent first.
    pub recent: Vec<FixtureCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixturesView {
    pub criteria: FilterCriteria,
    /// Explicit schedule window, when one is active.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Window suggested when the user opens the date-range editor.
    pub default_window: (NaiveDate, NaiveDate),
    pub years: Vec<i32>,
    pub content: LoadState<FixtureCards>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamsView {
    pub criteria: FilterCriteria,
    pub years: Vec<i32>,
    pub content: LoadState<Vec<TeamCard>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamStatsView {
    pub team_name: String,
    /// `Loaded(None)` means the backend has no statistics for the team.
    pub content: LoadState<Option<TeamStatistics>>,
}
