// Backend requests issued by the orchestrators and the events they produce.
//
// A `FetchRequest` is a plain value so page logic stays synchronous and
// testable; `execute` performs it against any `RugbyApi`. Errors are carried
// back as their display string, which is what the pages show.

use rugbywiki_api::RugbyApi;
use rugbywiki_core::model::{Fixture, League, Team, TeamStatistics};

use crate::pages::fixtures::FixtureQuery;
use crate::pages::teams::TeamsQuery;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    Leagues,
    Fixtures { generation: u64, query: FixtureQuery },
    Teams { generation: u64, query: TeamsQuery },
    TeamStats { generation: u64, team_name: String },
}

#[derive(Debug)]
pub enum FetchEvent {
    Leagues(Result<Vec<League>, String>),
    Fixtures {
        generation: u64,
        query: FixtureQuery,
        result: Result<Vec<Fixture>, String>,
    },
    Teams {
        generation: u64,
        query: TeamsQuery,
        result: Result<Vec<Team>, String>,
    },
    TeamStats {
        generation: u64,
        team_name: String,
        result: Result<Option<TeamStatistics>, String>,
    },
}

/// Perform one request and wrap its outcome.
pub async fn execute(api: &dyn RugbyApi, request: FetchRequest) -> FetchEvent {
    match request {
        FetchRequest::Leagues => FetchEvent::Leagues(api.leagues().await.map_err(|e| e.to_string())),
        FetchRequest::Fixtures { generation, query } => {
            let result = match &query {
                FixtureQuery::All => api.fixtures().await,
                FixtureQuery::League(id) => api.fixtures_by_league(*id).await,
                FixtureQuery::DateRange { start, end } => {
                    api.fixtures_by_date_range(*start, *end).await
                }
                FixtureQuery::LeagueRange {
                    league_id,
                    start,
                    end,
                    search,
                } => {
                    api.fixtures_by_league_range(*league_id, *start, *end, search.as_deref())
                        .await
                }
            };
            FetchEvent::Fixtures {
                generation,
                query,
                result: result.map_err(|e| e.to_string()),
            }
        }
        FetchRequest::Teams { generation, query } => {
            let result = match query {
                TeamsQuery::LeagueYear { league_id, year } => {
                    api.teams_by_league_and_year(league_id, year).await
                }
                TeamsQuery::All => api.teams().await,
            };
            FetchEvent::Teams {
                generation,
                query,
                result: result.map_err(|e| e.to_string()),
            }
        }
        FetchRequest::TeamStats {
            generation,
            team_name,
        } => {
            let result = api
                .team_statistics(&team_name)
                .await
                .map_err(|e| e.to_string());
            FetchEvent::TeamStats {
                generation,
                team_name,
                result,
            }
        }
    }
}
