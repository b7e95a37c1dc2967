// Backend REST client: one async method per read-only endpoint.
//
// Each call performs a single GET, checks the status, reads the body as text
// and parses it as JSON. Failures are logged with the resource and its
// parameters, then returned to the caller unchanged.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};

use rugbywiki_core::dates::query_date;
use rugbywiki_core::model::{Fixture, League, Team, TeamStatistics};

use crate::error::ApiError;

// ---------------------------------------------------------------------------
// Constants / options
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://rugby-wiki-backend-238f444127b7.herokuapp.com/api";

/// Which flavour of the date-range endpoint the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangeEndpoint {
    /// `/fixtures/date-range?startDate=..&endDate=..`
    #[default]
    DateRange,
    /// `/fixtures/range?start=..&end=..`
    Range,
}

/// Construction options for [`RugbyApiClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Whole-request timeout. `None` leaves the transport default.
    pub timeout: Option<Duration>,
    pub range_endpoint: RangeEndpoint,
}

// ---------------------------------------------------------------------------
// RugbyApi trait
// ---------------------------------------------------------------------------

/// The backend operations the orchestrators depend on.
#[async_trait]
pub trait RugbyApi: Send + Sync {
    /// All fixtures.
    async fn fixtures(&self) -> Result<Vec<Fixture>, ApiError>;

    /// Fixtures played or scheduled between `start` and `end` inclusive.
    async fn fixtures_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Fixture>, ApiError>;

    /// Every fixture of one league, across all years.
    async fn fixtures_by_league(&self, league_id: i64) -> Result<Vec<Fixture>, ApiError>;

    /// Server-side filtered fixtures for a league and date range.
    async fn fixtures_by_league_range(
        &self,
        league_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        search: Option<&str>,
    ) -> Result<Vec<Fixture>, ApiError>;

    async fn leagues(&self) -> Result<Vec<League>, ApiError>;

    async fn teams(&self) -> Result<Vec<Team>, ApiError>;

    /// Teams that have fixtures in `league_id` during `year`.
    async fn teams_by_league_and_year(
        &self,
        league_id: i64,
        year: i32,
    ) -> Result<Vec<Team>, ApiError>;

    /// Statistics for one team; `None` when the backend answers `null`.
    async fn team_statistics(&self, team_name: &str)
        -> Result<Option<TeamStatistics>, ApiError>;
}

// ---------------------------------------------------------------------------
// RugbyApiClient
// ---------------------------------------------------------------------------

/// `reqwest`-backed implementation of [`RugbyApi`].
#[derive(Debug, Clone)]
pub struct RugbyApiClient {
    http: reqwest::Client,
    base_url: Url,
    range_endpoint: RangeEndpoint,
}

impl RugbyApiClient {
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::Url {
            resource: "base URL".into(),
            message: format!("`{base_url}`: {e}"),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Url {
                resource: "base URL".into(),
                message: format!("`{base_url}` cannot carry a path"),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ApiError::Client)?;

        Ok(RugbyApiClient {
            http,
            base_url,
            range_endpoint: options.range_endpoint,
        })
    }

    /// Join path segments (percent-encoded individually) and query pairs
    /// onto the base URL.
    fn endpoint(
        &self,
        resource: &str,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| ApiError::Url {
                resource: resource.to_string(),
                message: format!("`{}` cannot carry a path", self.base_url),
            })?;
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// GET `url` and decode the JSON body, logging any failure.
    async fn get_json<T: DeserializeOwned>(&self, url: Url, resource: &str) -> Result<T, ApiError> {
        debug!("GET {} ({})", url, resource);
        let result = self.fetch(url, resource).await;
        if let Err(e) = &result {
            error!("Failed to fetch {}: {}", resource, e);
        }
        result
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url, resource: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                resource: resource.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Transport {
            resource: resource.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(ApiError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            resource: resource.to_string(),
            source,
        })
    }
}

#[async_trait]
impl RugbyApi for RugbyApiClient {
    async fn fixtures(&self) -> Result<Vec<Fixture>, ApiError> {
        let resource = "all fixtures";
        let url = self.endpoint(resource, &["fixtures"], &[])?;
        self.get_json(url, resource).await
    }

    async fn fixtures_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Fixture>, ApiError> {
        let resource = format!(
            "fixtures for date range {} - {}",
            query_date(start),
            query_date(end)
        );
        let (segment, start_key, end_key) = match self.range_endpoint {
            RangeEndpoint::DateRange => ("date-range", "startDate", "endDate"),
            RangeEndpoint::Range => ("range", "start", "end"),
        };
        let url = self.endpoint(
            &resource,
            &["fixtures", segment],
            &[(start_key, query_date(start)), (end_key, query_date(end))],
        )?;
        self.get_json(url, &resource).await
    }

    async fn fixtures_by_league(&self, league_id: i64) -> Result<Vec<Fixture>, ApiError> {
        let resource = format!("all fixtures for league ID {league_id}");
        let id = league_id.to_string();
        let url = self.endpoint(&resource, &["fixtures", "league", &id], &[])?;
        self.get_json(url, &resource).await
    }

    async fn fixtures_by_league_range(
        &self,
        league_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        search: Option<&str>,
    ) -> Result<Vec<Fixture>, ApiError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let resource = format!(
            "fixtures for league ID {} between {} and {}{}",
            league_id,
            query_date(start),
            query_date(end),
            search.map(|s| format!(" matching `{s}`")).unwrap_or_default()
        );
        let mut query = vec![
            ("league", league_id.to_string()),
            ("start", query_date(start)),
            ("end", query_date(end)),
        ];
        if let Some(term) = search {
            query.push(("searchTerm", term.to_string()));
        }
        let url = self.endpoint(&resource, &["fixtures", "league-range"], &query)?;
        self.get_json(url, &resource).await
    }

    async fn leagues(&self) -> Result<Vec<League>, ApiError> {
        let resource = "leagues";
        let url = self.endpoint(resource, &["leagues"], &[])?;
        self.get_json(url, resource).await
    }

    async fn teams(&self) -> Result<Vec<Team>, ApiError> {
        let resource = "all teams";
        let url = self.endpoint(resource, &["teams"], &[])?;
        self.get_json(url, resource).await
    }

    async fn teams_by_league_and_year(
        &self,
        league_id: i64,
        year: i32,
    ) -> Result<Vec<Team>, ApiError> {
        let resource = format!("teams for league ID {league_id} and year {year}");
        let id = league_id.to_string();
        let year_segment = year.to_string();
        let url = self.endpoint(
            &resource,
            &["teams", "from-fixtures", "league", &id, "year", &year_segment],
            &[],
        )?;
        self.get_json(url, &resource).await
    }

    async fn team_statistics(
        &self,
        team_name: &str,
    ) -> Result<Option<TeamStatistics>, ApiError> {
        let resource = format!("statistics for team `{team_name}`");
        let url = self.endpoint(&resource, &["team-statistics", team_name], &[])?;
        self.get_json(url, &resource).await
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
