// Application orchestrator: owns all page state and runs the main event loop.
//
// User commands and fetch results are processed one at a time on this task,
// so page state needs no locking. Each backend request runs on its own
// spawned task and reports back through the fetch channel.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use rugbywiki_api::RugbyApi;
use rugbywiki_core::dates::year_options;
use rugbywiki_core::filter::FilterCriteria;
use rugbywiki_core::model::League;

use crate::config::Config;
use crate::fetch::{self, FetchEvent, FetchRequest};
use crate::pages::fixtures::FixturesPage;
use crate::pages::stats::TeamStatsPage;
use crate::pages::teams::TeamsPage;
use crate::protocol::{LoadState, PageId, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    api: Arc<dyn RugbyApi>,
    fetch_tx: mpsc::Sender<FetchEvent>,
    /// Calendar "today", injectable for deterministic tests.
    today: fn() -> NaiveDate,
    pub active_page: PageId,
    pub leagues: LoadState<Vec<League>>,
    pub fixtures: FixturesPage,
    pub teams: TeamsPage,
    pub stats: TeamStatsPage,
}

impl AppState {
    pub fn new(
        config: &Config,
        api: Arc<dyn RugbyApi>,
        fetch_tx: mpsc::Sender<FetchEvent>,
        today: fn() -> NaiveDate,
    ) -> Self {
        let now = today();
        let years = year_options(now.year(), config.years.back, config.years.forward);

        let fixtures = FixturesPage::new(
            config.fixtures.strategy,
            FilterCriteria::new(None, Some(now.year())),
            years.clone(),
            now,
        );
        let teams = TeamsPage::new(
            FilterCriteria::new(Some(config.teams.default_league_id), Some(now.year())),
            years,
        );

        AppState {
            api,
            fetch_tx,
            today,
            active_page: PageId::default(),
            leagues: LoadState::Idle,
            fixtures,
            teams,
            stats: TeamStatsPage::new(),
        }
    }

    /// Run a request on its own task; the result arrives as a `FetchEvent`.
    fn dispatch(&self, request: Option<FetchRequest>) {
        let Some(request) = request else {
            return;
        };
        debug!("Dispatching {:?}", request);
        let api = Arc::clone(&self.api);
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let event = fetch::execute(api.as_ref(), request).await;
            let _ = tx.send(event).await;
        });
    }

    fn request_leagues(&mut self) {
        self.leagues = LoadState::Loading;
        self.dispatch(Some(FetchRequest::Leagues));
    }

    /// Kick off the league fetch and publish the initial snapshots.
    pub async fn start(&mut self, ui_tx: &mpsc::Sender<UiUpdate>) {
        self.request_leagues();
        self.fixtures.leagues_reloading();
        let _ = ui_tx.send(UiUpdate::Leagues(self.leagues.clone())).await;
        let _ = ui_tx.send(UiUpdate::PageChanged(self.active_page)).await;
        self.publish_fixtures(ui_tx).await;
        self.publish_teams(ui_tx).await;
        self.publish_stats(ui_tx).await;
    }

    // -- Publishing ----------------------------------------------------------

    async fn publish_fixtures(&self, ui_tx: &mpsc::Sender<UiUpdate>) {
        let view = self.fixtures.view((self.today)());
        let _ = ui_tx.send(UiUpdate::Fixtures(Box::new(view))).await;
    }

    async fn publish_teams(&self, ui_tx: &mpsc::Sender<UiUpdate>) {
        let _ = ui_tx.send(UiUpdate::Teams(Box::new(self.teams.view()))).await;
    }

    async fn publish_stats(&self, ui_tx: &mpsc::Sender<UiUpdate>) {
        let _ = ui_tx.send(UiUpdate::TeamStats(Box::new(self.stats.view()))).await;
    }

    async fn publish_active(&self, ui_tx: &mpsc::Sender<UiUpdate>) {
        match self.active_page {
            PageId::Fixtures => self.publish_fixtures(ui_tx).await,
            PageId::Teams => self.publish_teams(ui_tx).await,
            PageId::TeamStats => self.publish_stats(ui_tx).await,
        }
    }

    // -- Commands ------------------------------------------------------------

    /// Apply a criteria change to whichever filterable page is active.
    fn update_active_criteria(&mut self, change: impl FnOnce(&FilterCriteria) -> FilterCriteria) {
        let request = match self.active_page {
            PageId::Fixtures => {
                let criteria = change(self.fixtures.criteria());
                self.fixtures.update_criteria(criteria)
            }
            PageId::Teams => {
                let criteria = change(self.teams.criteria());
                self.teams.update_criteria(criteria)
            }
            PageId::TeamStats => None,
        };
        self.dispatch(request);
    }

    pub async fn handle_command(&mut self, command: UserCommand, ui_tx: &mpsc::Sender<UiUpdate>) {
        match command {
            UserCommand::SwitchPage(page) => {
                info!("Switching to {} page", page.title());
                self.active_page = page;
                if page == PageId::Teams {
                    let request = self.teams.activate();
                    self.dispatch(request);
                }
                let _ = ui_tx.send(UiUpdate::PageChanged(page)).await;
            }
            UserCommand::SelectLeague(league_id) => {
                self.update_active_criteria(|c| c.with_league(league_id));
            }
            UserCommand::SelectYear(year) => {
                self.update_active_criteria(|c| c.with_year(year));
            }
            UserCommand::SetSearch(search) => {
                self.update_active_criteria(|c| c.with_search(search));
            }
            UserCommand::SetDateRange { start, end } => {
                let request = self.fixtures.set_date_range(start, end);
                self.dispatch(request);
                self.publish_fixtures(ui_tx).await;
                return;
            }
            UserCommand::ClearDateRange => {
                let request = self.fixtures.clear_date_range();
                self.dispatch(request);
                self.publish_fixtures(ui_tx).await;
                return;
            }
            UserCommand::OpenTeamStats(team_name) => {
                info!("Opening statistics for {}", team_name);
                let request = self.stats.open(&team_name);
                self.dispatch(request);
                self.active_page = PageId::TeamStats;
                let _ = ui_tx.send(UiUpdate::PageChanged(PageId::TeamStats)).await;
            }
            UserCommand::Reload => self.reload(ui_tx).await,
            UserCommand::Quit => {}
        }
        self.publish_active(ui_tx).await;
    }

    async fn reload(&mut self, ui_tx: &mpsc::Sender<UiUpdate>) {
        match self.active_page {
            PageId::Fixtures if self.fixtures.leagues_failed() => {
                info!("Retrying league fetch");
                self.request_leagues();
                self.fixtures.leagues_reloading();
                let _ = ui_tx.send(UiUpdate::Leagues(self.leagues.clone())).await;
            }
            PageId::Fixtures => {
                let request = self.fixtures.reload();
                self.dispatch(request);
            }
            PageId::Teams => {
                let request = self.teams.reload();
                self.dispatch(request);
            }
            PageId::TeamStats => {
                let request = self.stats.reload();
                self.dispatch(request);
            }
        }
    }

    // -- Fetch results -------------------------------------------------------

    pub async fn handle_fetch_event(&mut self, event: FetchEvent, ui_tx: &mpsc::Sender<UiUpdate>) {
        match event {
            FetchEvent::Leagues(result) => {
                self.leagues = match &result {
                    Ok(leagues) => {
                        info!("Loaded {} leagues", leagues.len());
                        LoadState::Loaded(leagues.clone())
                    }
                    Err(message) => {
                        warn!("Leagues request failed: {}", message);
                        LoadState::Failed(message.clone())
                    }
                };
                let _ = ui_tx.send(UiUpdate::Leagues(self.leagues.clone())).await;
                let request = self.fixtures.set_leagues(&result);
                self.dispatch(request);
                self.publish_fixtures(ui_tx).await;
            }
            FetchEvent::Fixtures {
                generation,
                query,
                result,
            } => {
                if self.fixtures.apply_response(generation, query, result) {
                    self.publish_fixtures(ui_tx).await;
                }
            }
            FetchEvent::Teams {
                generation,
                query,
                result,
            } => {
                if self.teams.apply_response(generation, query, result) {
                    self.publish_teams(ui_tx).await;
                }
            }
            FetchEvent::TeamStats {
                generation, result, ..
            } => {
                if self.stats.apply_response(generation, result) {
                    self.publish_stats(ui_tx).await;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Process user commands and fetch results until the user quits or the
/// command channel closes.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut fetch_rx: mpsc::Receiver<FetchEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");
    state.start(&ui_tx).await;

    loop {
        tokio::select! {
            command = cmd_rx.recv() => {
                match command {
                    Some(UserCommand::Quit) => {
                        info!("Quit requested");
                        break;
                    }
                    Some(command) => state.handle_command(command, &ui_tx).await,
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
            event = fetch_rx.recv() => {
                // `state` holds a sender, so the channel never closes here.
                if let Some(event) = event {
                    state.handle_fetch_event(event, &ui_tx).await;
                }
            }
        }
    }

    info!("Application event loop finished");
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
