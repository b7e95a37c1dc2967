// Teams page orchestrator: league + year selection backed by the
// teams-from-fixtures endpoint, with search applied locally. Without a year
// the full team list is fetched and narrowed to the selected league here.

use std::sync::Arc;

use tracing::{debug, warn};

use rugbywiki_core::card::TeamCard;
use rugbywiki_core::filter::{derive_teams, FilterCriteria};
use rugbywiki_core::model::Team;

use crate::cache::ResponseCache;
use crate::fetch::FetchRequest;
use crate::protocol::{LoadState, TeamsView};

/// A teams request; also the cache key for its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamsQuery {
    LeagueYear { league_id: i64, year: i32 },
    All,
}

#[derive(Debug)]
pub struct TeamsPage {
    criteria: FilterCriteria,
    years: Vec<i32>,
    /// Nothing is fetched until the page is first shown.
    activated: bool,
    raw: Arc<Vec<Team>>,
    status: LoadState<()>,
    generation: u64,
    pending: Option<TeamsQuery>,
    cache: ResponseCache<TeamsQuery, Vec<Team>>,
}

impl TeamsPage {
    pub fn new(criteria: FilterCriteria, years: Vec<i32>) -> Self {
        TeamsPage {
            criteria,
            years,
            activated: false,
            raw: Arc::new(Vec::new()),
            status: LoadState::Idle,
            generation: 0,
            pending: None,
            cache: ResponseCache::new(),
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn cache(&self) -> &ResponseCache<TeamsQuery, Vec<Team>> {
        &self.cache
    }

    /// Called whenever the page becomes visible; issues the first request.
    pub fn activate(&mut self) -> Option<FetchRequest> {
        if self.activated {
            return None;
        }
        self.activated = true;
        self.request()
    }

    pub fn update_criteria(&mut self, criteria: FilterCriteria) -> Option<FetchRequest> {
        if criteria == self.criteria {
            return None;
        }
        self.criteria = criteria;
        self.request()
    }

    pub fn reload(&mut self) -> Option<FetchRequest> {
        self.pending = None;
        self.request()
    }

    pub fn query(&self) -> TeamsQuery {
        match (self.criteria.league_id, self.criteria.year) {
            (Some(league_id), Some(year)) => TeamsQuery::LeagueYear { league_id, year },
            _ => TeamsQuery::All,
        }
    }

    fn request(&mut self) -> Option<FetchRequest> {
        if !self.activated {
            return None;
        }
        let query = self.query();

        if let Some(cached) = self.cache.get(&query) {
            debug!("Teams cache hit for {:?}", query);
            self.generation += 1;
            self.pending = None;
            self.raw = cached;
            self.status = LoadState::Loaded(());
            return None;
        }

        if self.status.is_loading() && self.pending == Some(query) {
            return None;
        }

        self.generation += 1;
        self.pending = Some(query);
        self.status = LoadState::Loading;
        Some(FetchRequest::Teams {
            generation: self.generation,
            query,
        })
    }

    /// Accept a response. Returns `false` when it was stale.
    pub fn apply_response(
        &mut self,
        generation: u64,
        query: TeamsQuery,
        result: Result<Vec<Team>, String>,
    ) -> bool {
        let teams = result.map(|teams| self.cache.insert(query, teams));

        if generation != self.generation {
            debug!(
                "Discarding stale teams response {} (latest {})",
                generation, self.generation
            );
            return false;
        }
        self.pending = None;

        match teams {
            Ok(teams) => {
                self.raw = teams;
                self.status = LoadState::Loaded(());
            }
            Err(message) => {
                warn!("Teams request failed: {}", message);
                self.raw = Arc::new(Vec::new());
                self.status = LoadState::Failed(message);
            }
        }
        true
    }

    pub fn view(&self) -> TeamsView {
        TeamsView {
            criteria: self.criteria.clone(),
            years: self.years.clone(),
            content: self.status.clone().map(|()| {
                derive_teams(&self.raw, &self.criteria)
                    .iter()
                    .map(TeamCard::from)
                    .collect()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str, league: &str) -> Team {
        team_in(name, 1, league)
    }

    fn team_in(name: &str, league_id: i64, league: &str) -> Team {
        Team {
            name: name.into(),
            league_id,
            league_name: league.into(),
        }
    }

    fn visible(p: &TeamsPage) -> Vec<String> {
        p.view()
            .content
            .loaded()
            .unwrap()
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    fn mixed_leagues() -> Vec<Team> {
        vec![
            team_in("Bath", 4, "Gallagher Premiership"),
            team_in("Cardiff Rugby", 1, "United Rugby Championship"),
        ]
    }

    fn page() -> TeamsPage {
        TeamsPage::new(FilterCriteria::new(Some(1), Some(2025)), vec![2024, 2025])
    }

    fn expect_teams(req: Option<FetchRequest>) -> (u64, TeamsQuery) {
        match req {
            Some(FetchRequest::Teams { generation, query }) => (generation, query),
            other => panic!("expected a teams request, got {other:?}"),
        }
    }

    #[test]
    fn nothing_fetched_until_activated() {
        let mut p = page();
        assert!(p.update_criteria(p.criteria().with_year(Some(2024))).is_none());
        let (_, q) = expect_teams(p.activate());
        assert_eq!(
            q,
            TeamsQuery::LeagueYear {
                league_id: 1,
                year: 2024
            }
        );
        assert!(p.activate().is_none());
    }

    #[test]
    fn missing_league_or_year_fetches_all_teams() {
        let mut p = TeamsPage::new(FilterCriteria::new(None, Some(2025)), vec![]);
        let (_, q) = expect_teams(p.activate());
        assert_eq!(q, TeamsQuery::All);
    }

    #[test]
    fn league_without_year_shows_only_that_league() {
        let mut p = TeamsPage::new(FilterCriteria::new(Some(4), None), vec![]);
        let (g, q) = expect_teams(p.activate());
        assert_eq!(q, TeamsQuery::All);
        p.apply_response(g, q, Ok(mixed_leagues()));
        assert_eq!(visible(&p), vec!["Bath"]);
    }

    #[test]
    fn no_league_no_year_shows_every_team() {
        let mut p = TeamsPage::new(FilterCriteria::new(None, None), vec![]);
        let (g, q) = expect_teams(p.activate());
        assert_eq!(q, TeamsQuery::All);
        p.apply_response(g, q, Ok(mixed_leagues()));
        assert_eq!(visible(&p), vec!["Bath", "Cardiff Rugby"]);
    }

    #[test]
    fn clearing_year_keeps_league_scope() {
        let mut p = TeamsPage::new(FilterCriteria::new(Some(1), Some(2025)), vec![2025]);
        let (g, q) = expect_teams(p.activate());
        p.apply_response(g, q, Ok(vec![team("Cardiff Rugby", "United Rugby Championship")]));

        let (g, q) = expect_teams(p.update_criteria(p.criteria().with_year(None)));
        assert_eq!(q, TeamsQuery::All);
        p.apply_response(g, q, Ok(mixed_leagues()));
        assert_eq!(visible(&p), vec!["Cardiff Rugby"]);

        // Switching league re-derives from the cached full list.
        assert!(p.update_criteria(p.criteria().with_league(Some(4))).is_none());
        assert_eq!(visible(&p), vec!["Bath"]);
        assert!(p.update_criteria(p.criteria().with_league(None)).is_none());
        assert_eq!(visible(&p), vec!["Bath", "Cardiff Rugby"]);
    }

    #[test]
    fn search_filters_locally() {
        let mut p = page();
        let (g, q) = expect_teams(p.activate());
        p.apply_response(
            g,
            q,
            Ok(vec![
                team("Cardiff Rugby", "United Rugby Championship"),
                team("Ospreys", "United Rugby Championship"),
            ]),
        );
        assert!(p.update_criteria(p.criteria().with_search("CARDIFF")).is_none());
        let cards = p.view().content.loaded().unwrap().clone();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Cardiff Rugby");
        assert_eq!(cards[0].league, "United Rugby Championship");
    }

    #[test]
    fn league_year_responses_are_cached() {
        let mut p = page();
        let (g, q) = expect_teams(p.activate());
        p.apply_response(g, q, Ok(vec![team("Ospreys", "URC")]));

        let (g, q) = expect_teams(p.update_criteria(p.criteria().with_year(Some(2024))));
        p.apply_response(g, q, Ok(vec![]));

        assert!(p.update_criteria(p.criteria().with_year(Some(2025))).is_none());
        assert_eq!(p.view().content.loaded().unwrap().len(), 1);
        assert_eq!(p.cache().len(), 2);
    }

    #[test]
    fn stale_teams_response_discarded() {
        let mut p = page();
        let (g1, q1) = expect_teams(p.activate());
        let (g2, q2) = expect_teams(p.update_criteria(p.criteria().with_league(Some(4))));
        assert!(p.apply_response(g2, q2, Ok(vec![team_in("Bath", 4, "Premiership")])));
        assert!(!p.apply_response(g1, q1, Ok(vec![team("Ospreys", "URC")])));
        assert_eq!(p.view().content.loaded().unwrap()[0].name, "Bath");
    }

    #[test]
    fn failure_is_reported() {
        let mut p = page();
        let (g, q) = expect_teams(p.activate());
        p.apply_response(g, q, Err("HTTP error! status: 404, message: none".into()));
        assert_eq!(
            p.view().content.error(),
            Some("HTTP error! status: 404, message: none")
        );
    }
}
