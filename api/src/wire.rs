/// Backend wire types: serde shapes for tournament and fixture documents.
/// These map to the clean domain types in client.rs.
use crate::{FixtureSlot, Team};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Tournament document  (GET tournament/{id})
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireTournament {
    #[serde(alias = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub is_knockout: Option<bool>,
    pub use_two_legs: Option<bool>,
    pub has_league_fixtures_generated: Option<bool>,
    /// 1-based; 0 or missing before the knockout draw.
    pub current_round: Option<u32>,
    pub teams: Option<Vec<Team>>,
}

// ---------------------------------------------------------------------------
// Fixtures document  (GET tournament/{id}/fixtures)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireFixtures {
    pub league_fixtures: Option<Vec<WireTeamFixtures>>,
    pub knockout_rounds: Option<Vec<Vec<FixtureSlot>>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTeamFixtures {
    #[serde(default)]
    pub home: Vec<Option<WireLeagueEntry>>,
    #[serde(default)]
    pub away: Vec<Option<WireLeagueEntry>>,
    #[serde(default)]
    pub neutral: Vec<Option<WireLeagueEntry>>,
}

#[derive(Debug, Deserialize, Default, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct WireLeagueEntry {
    #[serde(default)]
    pub is_same_team: bool,
    pub goals_for: Option<u16>,
    pub goals_against: Option<u16>,
}

// ---------------------------------------------------------------------------
// Local snapshot  (FIXTURE_DESK_SNAPSHOT)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Snapshot {
    pub tournament: Option<WireTournament>,
    #[serde(default)]
    pub fixtures: WireFixtures,
}
