use crate::payload::{Payload, SubmissionChannel};
use crate::wire::{Snapshot, WireFixtures, WireLeagueEntry, WireTeamFixtures, WireTournament};
use crate::{Fixtures, LeagueLeg, LegResult, TeamFixtures, Tournament};
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/";

/// Tournament backend client. Reads can be served from a local snapshot;
/// writes always go to the backend.
#[derive(Debug, Clone)]
pub struct FixtureApi {
    client: Client,
    base_url: String,
    timeout: Duration,
    snapshot: Option<PathBuf>,
}

impl Default for FixtureApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("fixture-desk/0.2 (results entry)")
                .build()
                .unwrap_or_default(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(10),
            snapshot: None,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) | ApiError::Parsing(e, _) => Some(e),
            ApiError::NotFound(_) | ApiError::Other(_) => None,
        }
    }
}

impl FixtureApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot = Some(path.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route.trim_start_matches('/'))
    }

    /// Fetch a tournament document. A `null` body or a 404 means the
    /// tournament does not exist.
    pub async fn fetch_tournament(&self, id: &str) -> ApiResult<Tournament> {
        if let Some(path) = &self.snapshot {
            let raw = load_snapshot(path)?
                .tournament
                .ok_or_else(|| ApiError::NotFound(format!("no tournament in {}", path.display())))?;
            return Ok(map_tournament(raw, id));
        }

        let raw: Option<WireTournament> = self.get(&format!("tournament/{id}")).await?;
        let raw = raw.ok_or_else(|| ApiError::NotFound(format!("tournament {id}")))?;
        Ok(map_tournament(raw, id))
    }

    /// Fetch the fixtures document. Before any draw the backend has none,
    /// which maps to empty fixtures.
    pub async fn fetch_fixtures(&self, id: &str) -> ApiResult<Fixtures> {
        if let Some(path) = &self.snapshot {
            return Ok(map_fixtures(load_snapshot(path)?.fixtures));
        }

        let raw: Option<WireFixtures> = self.get(&format!("tournament/{id}/fixtures")).await?;
        Ok(map_fixtures(raw.unwrap_or_default()))
    }

    /// Send a payload to its route. Any 2xx counts as success.
    pub async fn submit_payload(&self, tournament_id: &str, payload: &Payload) -> ApiResult<()> {
        let url = self.url(&payload.route(tournament_id));
        debug!("{} {url}", payload.method());
        let response = self
            .client
            .request(payload.method(), &url)
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        response.error_for_status().map(|_| ()).map_err(|e| {
            error!("{} rejected by {url}: {e}", payload.label());
            ApiError::Api(e, url)
        })
    }

    async fn get<T: DeserializeOwned>(&self, route: &str) -> ApiResult<Option<T>> {
        let url = self.url(route);
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        match response.error_for_status() {
            Ok(res) => res
                .json::<Option<T>>()
                .await
                .map_err(|e| ApiError::Parsing(e, url)),
            Err(e) => Err(ApiError::Api(e, url)),
        }
    }
}

impl SubmissionChannel for FixtureApi {
    async fn submit(&self, tournament_id: &str, payload: &Payload) -> ApiResult<()> {
        self.submit_payload(tournament_id, payload).await
    }
}

// ---------------------------------------------------------------------------
// Snapshot loading
// ---------------------------------------------------------------------------

fn load_snapshot(path: &Path) -> ApiResult<Snapshot> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ApiError::NotFound(format!("could not read {}: {e}", path.display())))?;
    parse_snapshot(&content)
        .map_err(|e| ApiError::Other(format!("invalid snapshot at {}: {e}", path.display())))
}

pub fn parse_snapshot(content: &str) -> serde_json::Result<Snapshot> {
    serde_json::from_str(content)
}

// ---------------------------------------------------------------------------
// Mapping: wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_tournament(raw: WireTournament, requested_id: &str) -> Tournament {
    Tournament {
        id: raw.id.unwrap_or_else(|| requested_id.to_owned()),
        name: raw.name.unwrap_or_default(),
        is_knockout: raw.is_knockout.unwrap_or(false),
        use_two_legs: raw.use_two_legs.unwrap_or(false),
        has_league_fixtures_generated: raw.has_league_fixtures_generated.unwrap_or(false),
        // The backend counts rounds from 1 and uses 0 for "no draw yet".
        current_round: raw
            .current_round
            .filter(|&round| round > 0)
            .map(|round| round as usize - 1),
        teams: raw.teams.unwrap_or_default(),
    }
}

fn map_fixtures(raw: WireFixtures) -> Fixtures {
    Fixtures {
        league_fixtures: raw
            .league_fixtures
            .unwrap_or_default()
            .into_iter()
            .map(map_team_fixtures)
            .collect(),
        knockout_rounds: raw.knockout_rounds.unwrap_or_default(),
    }
}

fn map_team_fixtures(raw: WireTeamFixtures) -> TeamFixtures {
    let legs = |entries: Vec<Option<WireLeagueEntry>>| -> Vec<LeagueLeg> {
        entries.into_iter().map(map_league_entry).collect()
    };
    TeamFixtures { home: legs(raw.home), away: legs(raw.away), neutral: legs(raw.neutral) }
}

fn map_league_entry(raw: Option<WireLeagueEntry>) -> LeagueLeg {
    match raw {
        Some(entry) if entry.is_same_team => LeagueLeg::SameTeam,
        Some(entry) => LeagueLeg::Result(LegResult {
            goals_for: entry.goals_for,
            goals_against: entry.goals_against,
        }),
        None => LeagueLeg::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{build_knockout_payload, forward};
    use mockito::Matcher;
    use serde_json::json;

    fn api_for(server: &mockito::Server) -> FixtureApi {
        FixtureApi::new().with_base_url(server.url())
    }

    #[test]
    fn base_url_gets_a_trailing_slash() {
        let api = FixtureApi::new().with_base_url("http://example.test/api");
        assert_eq!(api.url("tournament/1"), "http://example.test/api/tournament/1");
        assert_eq!(FixtureApi::new().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn current_round_is_one_based_on_the_wire() {
        let raw = |round| WireTournament { current_round: round, ..Default::default() };
        assert_eq!(map_tournament(raw(None), "t").current_round, None);
        assert_eq!(map_tournament(raw(Some(0)), "t").current_round, None);
        assert_eq!(map_tournament(raw(Some(2)), "t").current_round, Some(1));
        assert_eq!(map_tournament(raw(None), "t").id, "t");
    }

    #[test]
    fn league_entries_map_same_team_and_nulls() {
        assert_eq!(map_league_entry(None), LeagueLeg::default());
        assert_eq!(
            map_league_entry(Some(WireLeagueEntry { is_same_team: true, ..Default::default() })),
            LeagueLeg::SameTeam
        );
        assert_eq!(
            map_league_entry(Some(WireLeagueEntry {
                is_same_team: false,
                goals_for: Some(2),
                goals_against: Some(0),
            })),
            LeagueLeg::Result(LegResult::new(2, 0))
        );
    }

    #[test]
    fn snapshot_parses_both_documents() {
        let snapshot = parse_snapshot(
            r#"{
                "tournament": {"_id": "abc", "name": "Cup", "isKnockout": true,
                               "useTwoLegs": true, "currentRound": 1,
                               "teams": [{"teamName": "A"}, {"teamName": "B", "playerName": "bo"}]},
                "fixtures": {"knockoutRounds": [[
                    {"teamIndex": 0, "opponentIndex": 1, "home": {"goalsFor": 2, "goalsAgainst": 1}},
                    {"teamIndex": 1, "opponentIndex": 0}
                ]]}
            }"#,
        )
        .unwrap();
        let tournament = map_tournament(snapshot.tournament.unwrap(), "ignored");
        assert_eq!(tournament.id, "abc");
        assert_eq!(tournament.current_round, Some(0));
        assert_eq!(tournament.teams[1].player_name, "bo");

        let fixtures = map_fixtures(snapshot.fixtures);
        assert_eq!(fixtures.round(0).unwrap()[0].home.score(), Some((2, 1)));
        assert!(fixtures.league_fixtures.is_empty());
    }

    #[tokio::test]
    async fn snapshot_file_serves_reads() {
        let path = std::env::temp_dir().join(format!("fixture-desk-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"tournament": {"name": "League", "hasLeagueFixturesGenerated": true,
                               "teams": [{"teamName": "A"}, {"teamName": "B"}]},
                "fixtures": {"leagueFixtures": [
                    {"neutral": [{"isSameTeam": true}, null]},
                    {"neutral": [{"goalsFor": 1, "goalsAgainst": 1}, {"isSameTeam": true}]}
                ]}}"#,
        )
        .unwrap();

        let api = FixtureApi::new().with_snapshot(&path);
        let tournament = api.fetch_tournament("local").await.unwrap();
        let fixtures = api.fetch_fixtures("local").await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(tournament.id, "local");
        assert!(tournament.has_league_fixtures_generated);
        assert_eq!(fixtures.team_sheet(0).unwrap().neutral[0], LeagueLeg::SameTeam);
        assert_eq!(
            fixtures.team_sheet(1).unwrap().neutral[0],
            LeagueLeg::Result(LegResult::new(1, 1))
        );
    }

    #[tokio::test]
    async fn fetches_tournament_document() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tournament/t1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "_id": "t1",
                    "name": "Office Cup",
                    "isKnockout": false,
                    "useTwoLegs": true,
                    "hasLeagueFixturesGenerated": true,
                    "teams": [{"teamName": "Reds", "playerName": "ann"}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let tournament = api_for(&server).fetch_tournament("t1").await.unwrap();
        mock.assert_async().await;
        assert_eq!(tournament.name, "Office Cup");
        assert!(tournament.use_two_legs);
        assert_eq!(tournament.current_round, None);
        assert_eq!(tournament.teams[0].team_name, "Reds");
    }

    #[tokio::test]
    async fn null_or_missing_tournament_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tournament/gone")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("null")
            .create_async()
            .await;
        server
            .mock("GET", "/tournament/missing")
            .with_status(404)
            .create_async()
            .await;

        let api = api_for(&server);
        assert!(matches!(api.fetch_tournament("gone").await, Err(ApiError::NotFound(_))));
        assert!(matches!(api.fetch_tournament("missing").await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn fixtures_not_set_maps_to_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tournament/t1/fixtures")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("null")
            .create_async()
            .await;

        let fixtures = api_for(&server).fetch_fixtures("t1").await.unwrap();
        assert_eq!(fixtures, Fixtures::default());
    }

    #[tokio::test]
    async fn knockout_results_are_put_as_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/tournament/t1/knockoutResults")
            .match_body(Matcher::Json(json!({ "results": [[2, 1], null] })))
            .with_status(204)
            .create_async()
            .await;

        let payload = build_knockout_payload(vec![Some((2, 1)), None]);
        forward(&api_for(&server), "t1", &payload).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_reported_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/tournament/t1/knockoutResults")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let payload = build_knockout_payload(vec![None]);
        let result = api_for(&server).submit_payload("t1", &payload).await;
        mock.assert_async().await;
        assert!(matches!(result, Err(ApiError::Api(..))));
    }
}
