use crate::Score;
use crate::client::ApiResult;
use crate::collect::LeagueResults;
use log::info;
use reqwest::Method;
use serde::Serialize;
use std::future::Future;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnockoutResultsUpdate {
    pub results: Vec<Option<Score>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueResultsUpdate {
    pub team_index: usize,
    pub home: Vec<Option<Score>>,
    pub away: Vec<Option<Score>>,
    pub neutral: Vec<Option<Score>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsUpdate {
    pub team_names: Vec<String>,
    pub player_names: Vec<String>,
}

/// Everything the desk ever sends to the backend. Serializes as the bare body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    KnockoutResults(KnockoutResultsUpdate),
    LeagueResults(LeagueResultsUpdate),
    Teams(TeamsUpdate),
}

impl Payload {
    /// Route relative to the API base.
    pub fn route(&self, tournament_id: &str) -> String {
        match self {
            Payload::KnockoutResults(_) => format!("tournament/{tournament_id}/knockoutResults"),
            Payload::LeagueResults(_) => format!("tournament/{tournament_id}/leagueResults"),
            Payload::Teams(_) => format!("tournament/{tournament_id}/teams"),
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Payload::KnockoutResults(_) | Payload::LeagueResults(_) => Method::PUT,
            Payload::Teams(_) => Method::POST,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Payload::KnockoutResults(_) => "knockout results",
            Payload::LeagueResults(_) => "league results",
            Payload::Teams(_) => "teams",
        }
    }
}

pub fn build_knockout_payload(results: Vec<Option<Score>>) -> Payload {
    Payload::KnockoutResults(KnockoutResultsUpdate { results })
}

pub fn build_league_payload(results: LeagueResults) -> Payload {
    let LeagueResults { team_index, home, away, neutral } = results;
    Payload::LeagueResults(LeagueResultsUpdate { team_index, home, away, neutral })
}

/// Where validated payloads go. Any `Ok` counts as submitted; errors are
/// handed back untouched and never retried.
pub trait SubmissionChannel {
    fn submit(
        &self,
        tournament_id: &str,
        payload: &Payload,
    ) -> impl Future<Output = ApiResult<()>> + Send;
}

/// Hand a payload to the channel unchanged.
pub async fn forward<C: SubmissionChannel>(
    channel: &C,
    tournament_id: &str,
    payload: &Payload,
) -> ApiResult<()> {
    info!("submitting {} for tournament {tournament_id}", payload.label());
    channel.submit(tournament_id, payload).await
}
