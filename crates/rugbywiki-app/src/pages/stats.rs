// Team statistics page orchestrator.

use tracing::{debug, warn};

use rugbywiki_core::model::TeamStatistics;

use crate::fetch::FetchRequest;
use crate::protocol::{LoadState, TeamStatsView};

pub const NO_TEAM_MESSAGE: &str = "No team name provided.";

#[derive(Debug, Default)]
pub struct TeamStatsPage {
    team_name: String,
    content: LoadState<Option<TeamStatistics>>,
    generation: u64,
}

impl TeamStatsPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    /// Show statistics for `team_name`. A blank name fails immediately.
    pub fn open(&mut self, team_name: &str) -> Option<FetchRequest> {
        self.team_name = team_name.trim().to_string();
        self.generation += 1;
        if self.team_name.is_empty() {
            self.content = LoadState::Failed(NO_TEAM_MESSAGE.to_string());
            return None;
        }
        self.content = LoadState::Loading;
        Some(FetchRequest::TeamStats {
            generation: self.generation,
            team_name: self.team_name.clone(),
        })
    }

    /// Fetch the current team again. Does nothing before a team was opened.
    pub fn reload(&mut self) -> Option<FetchRequest> {
        if matches!(self.content, LoadState::Idle) {
            return None;
        }
        let name = self.team_name.clone();
        self.open(&name)
    }

    pub fn apply_response(
        &mut self,
        generation: u64,
        result: Result<Option<TeamStatistics>, String>,
    ) -> bool {
        if generation != self.generation {
            debug!(
                "Discarding stale statistics response {} (latest {})",
                generation, self.generation
            );
            return false;
        }
        self.content = match result {
            Ok(stats) => LoadState::Loaded(stats),
            Err(message) => {
                warn!("Statistics for {} failed: {}", self.team_name, message);
                LoadState::Failed(message)
            }
        };
        true
    }

    pub fn view(&self) -> TeamStatsView {
        TeamStatsView {
            team_name: self.team_name.clone(),
            content: self.content.clone(),
        }
    }
}
