// Fixtures page orchestrator.
//
// Holds the league/year/search criteria, the raw collection of the latest
// accepted response, and the response cache. Every criteria change either
// re-derives from what is already held or produces a new `FetchRequest`.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use rugbywiki_core::card::FixtureCard;
use rugbywiki_core::dates::{default_schedule_window, year_bounds};
use rugbywiki_core::filter::{derive_fixtures, FilterCriteria, LeagueIndex};
use rugbywiki_core::model::{Fixture, League};

use crate::cache::ResponseCache;
use crate::fetch::FetchRequest;
use crate::protocol::{FixtureCards, FixturesView, LoadState};

pub const INVALID_RANGE_MESSAGE: &str = "Please select a start date on or before the end date.";

// ---------------------------------------------------------------------------
// Strategy / query types
// ---------------------------------------------------------------------------

/// How the fixtures page talks to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixtureStrategy {
    /// Fetch per league (or everything) once, filter year and search locally.
    #[default]
    Cached,
    /// Ask the backend for the exact league/year/search slice on every change.
    Server,
}

/// Cache key for the cached strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureScope {
    All,
    League(i64),
}

/// A concrete fixtures request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureQuery {
    All,
    League(i64),
    DateRange {
        start: NaiveDate,
        end: NaiveDate,
    },
    LeagueRange {
        league_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        search: Option<String>,
    },
}

impl FixtureQuery {
    /// The cache scope this query's response fills, if it is a whole-scope
    /// query.
    pub fn scope(&self) -> Option<FixtureScope> {
        match self {
            FixtureQuery::All => Some(FixtureScope::All),
            FixtureQuery::League(id) => Some(FixtureScope::League(*id)),
            FixtureQuery::DateRange { .. } | FixtureQuery::LeagueRange { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// League gate
// ---------------------------------------------------------------------------

/// Fixture requests wait until the league list has loaded.
#[derive(Debug, Clone, PartialEq)]
enum LeagueGate {
    Pending,
    Ready,
    Failed(String),
}

// ---------------------------------------------------------------------------
// FixturesPage
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct FixturesPage {
    strategy: FixtureStrategy,
    criteria: FilterCriteria,
    date_range: Option<(NaiveDate, NaiveDate)>,
    default_window: (NaiveDate, NaiveDate),
    years: Vec<i32>,
    leagues: LeagueIndex,
    gate: LeagueGate,
    /// Collection behind the current view.
    raw: Arc<Vec<Fixture>>,
    /// Query that produced `raw`, while `raw` is still valid for it.
    loaded_query: Option<FixtureQuery>,
    status: LoadState<()>,
    /// Generation of the most recently issued request.
    generation: u64,
    /// Query of the in-flight request that `generation` refers to.
    pending: Option<FixtureQuery>,
    cache: ResponseCache<FixtureScope, Vec<Fixture>>,
}

impl FixturesPage {
    pub fn new(
        strategy: FixtureStrategy,
        criteria: FilterCriteria,
        years: Vec<i32>,
        today: NaiveDate,
    ) -> Self {
        FixturesPage {
            strategy,
            criteria,
            date_range: None,
            default_window: default_schedule_window(today),
            years,
            leagues: LeagueIndex::default(),
            gate: LeagueGate::Pending,
            raw: Arc::new(Vec::new()),
            loaded_query: None,
            status: LoadState::Idle,
            generation: 0,
            pending: None,
            cache: ResponseCache::new(),
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn cache(&self) -> &ResponseCache<FixtureScope, Vec<Fixture>> {
        &self.cache
    }

    pub fn leagues_failed(&self) -> bool {
        matches!(self.gate, LeagueGate::Failed(_))
    }

    // -- Leagues -------------------------------------------------------------

    /// Record the outcome of the league fetch and issue the first fixture
    /// request once leagues are available.
    pub fn set_leagues(&mut self, result: &Result<Vec<League>, String>) -> Option<FetchRequest> {
        match result {
            Ok(leagues) => {
                self.leagues = LeagueIndex::new(leagues);
                self.gate = LeagueGate::Ready;
                self.request()
            }
            Err(message) => {
                warn!("Fixtures page blocked, leagues failed: {}", message);
                self.gate = LeagueGate::Failed(message.clone());
                self.pending = None;
                self.status = LoadState::Failed(message.clone());
                self.clear_collection();
                None
            }
        }
    }

    /// Mark leagues as being fetched again.
    pub fn leagues_reloading(&mut self) {
        self.gate = LeagueGate::Pending;
        self.status = LoadState::Loading;
    }

    // -- Criteria ------------------------------------------------------------

    pub fn update_criteria(&mut self, criteria: FilterCriteria) -> Option<FetchRequest> {
        if criteria == self.criteria {
            return None;
        }
        self.criteria = criteria;
        self.request()
    }

    /// Switch to an explicit schedule window. A window that ends before it
    /// starts is rejected without a request.
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> Option<FetchRequest> {
        if start > end {
            // Drop whatever is in flight so it cannot overwrite the error.
            self.generation += 1;
            self.pending = None;
            self.clear_collection();
            self.status = LoadState::Failed(INVALID_RANGE_MESSAGE.to_string());
            return None;
        }
        self.date_range = Some((start, end));
        self.request()
    }

    pub fn clear_date_range(&mut self) -> Option<FetchRequest> {
        self.date_range = None;
        self.request()
    }

    /// Re-run the current query. Cached scopes are served from the cache.
    pub fn reload(&mut self) -> Option<FetchRequest> {
        self.pending = None;
        self.loaded_query = None;
        self.request()
    }

    fn clear_collection(&mut self) {
        self.raw = Arc::new(Vec::new());
        self.loaded_query = None;
    }

    // -- Requests ------------------------------------------------------------

    /// The query the current criteria call for.
    pub fn query(&self) -> FixtureQuery {
        if let Some((start, end)) = self.date_range {
            return match self.criteria.league_id {
                Some(league_id) => FixtureQuery::LeagueRange {
                    league_id,
                    start,
                    end,
                    search: self.criteria.search_term().map(String::from),
                },
                None => FixtureQuery::DateRange { start, end },
            };
        }

        match self.strategy {
            FixtureStrategy::Cached => match self.criteria.league_id {
                Some(id) => FixtureQuery::League(id),
                None => FixtureQuery::All,
            },
            FixtureStrategy::Server => {
                let bounds = self.criteria.year.and_then(year_bounds);
                match (self.criteria.league_id, bounds) {
                    (Some(league_id), Some((start, end))) => FixtureQuery::LeagueRange {
                        league_id,
                        start,
                        end,
                        search: self.criteria.search_term().map(String::from),
                    },
                    (None, Some((start, end))) => FixtureQuery::DateRange { start, end },
                    (Some(id), None) => FixtureQuery::League(id),
                    (None, None) => FixtureQuery::All,
                }
            }
        }
    }

    /// Only the cached strategy stores responses.
    fn cache_key(&self, query: &FixtureQuery) -> Option<FixtureScope> {
        match self.strategy {
            FixtureStrategy::Cached => query.scope(),
            FixtureStrategy::Server => None,
        }
    }

    /// Serve the current query from the cache or produce the request for it.
    fn request(&mut self) -> Option<FetchRequest> {
        if self.gate != LeagueGate::Ready {
            return None;
        }
        let query = self.query();

        // Criteria that do not change the query (the year under a date range,
        // a search the endpoint does not take) only re-derive.
        if self.loaded_query.as_ref() == Some(&query) {
            debug!("Fixtures for {:?} already held, re-deriving", query);
            self.generation += 1;
            self.pending = None;
            self.status = LoadState::Loaded(());
            return None;
        }

        if let Some(cached) = self.cache_key(&query).and_then(|key| self.cache.get(&key)) {
            debug!("Fixtures cache hit for {:?}", query);
            // Anything still in flight is now stale.
            self.generation += 1;
            self.pending = None;
            self.raw = cached;
            self.loaded_query = Some(query);
            self.status = LoadState::Loaded(());
            return None;
        }

        if self.status.is_loading() && self.pending.as_ref() == Some(&query) {
            return None;
        }

        self.generation += 1;
        self.pending = Some(query.clone());
        self.status = LoadState::Loading;
        Some(FetchRequest::Fixtures {
            generation: self.generation,
            query,
        })
    }

    // -- Responses -----------------------------------------------------------

    /// Accept a response. Returns `false` when it was stale and the view is
    /// unchanged.
    pub fn apply_response(
        &mut self,
        generation: u64,
        query: FixtureQuery,
        result: Result<Vec<Fixture>, String>,
    ) -> bool {
        let fixtures = match (result, self.cache_key(&query)) {
            (Ok(fixtures), Some(key)) => Ok(self.cache.insert(key, fixtures)),
            (Ok(fixtures), None) => Ok(Arc::new(fixtures)),
            (Err(message), _) => Err(message),
        };

        if generation != self.generation {
            debug!(
                "Discarding stale fixtures response {} (latest {}) for {:?}",
                generation, self.generation, query
            );
            return false;
        }
        self.pending = None;

        match fixtures {
            Ok(fixtures) => {
                debug!("Loaded {} fixtures for {:?}", fixtures.len(), query);
                self.raw = fixtures;
                self.loaded_query = Some(query);
                self.status = LoadState::Loaded(());
            }
            Err(message) => {
                warn!("Fixtures request failed: {}", message);
                self.clear_collection();
                self.status = LoadState::Failed(message);
            }
        }
        true
    }

    // -- View ----------------------------------------------------------------

    pub fn view(&self, today: NaiveDate) -> FixturesView {
        // An explicit window replaces the year filter.
        let criteria = match self.date_range {
            Some(_) => self.criteria.with_year(None),
            None => self.criteria.clone(),
        };
        let content = self.status.clone().map(|()| {
            let split = derive_fixtures(&self.raw, &criteria, &self.leagues, today);
            FixtureCards {
                upcoming: split
                    .upcoming
                    .iter()
                    .map(|f| FixtureCard::scheduled(f, self.leagues.display_name(f)))
                    .collect(),
                recent: split
                    .recent
                    .iter()
                    .map(|f| FixtureCard::from_fixture(f, self.leagues.display_name(f)))
                    .collect(),
            }
        });
        FixturesView {
            criteria: self.criteria.clone(),
            date_range: self.date_range,
            default_window: self.default_window,
            years: self.years.clone(),
            content,
        }
    }
}
