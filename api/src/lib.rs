pub mod aggregate;
pub mod cell;
pub mod client;
pub mod collect;
pub mod entry;
pub mod pairing;
pub mod payload;
pub mod roster;
pub mod session;
pub mod validate;
pub mod wire;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Domain types: independent of the backend wire format
// ---------------------------------------------------------------------------

/// A recorded scoreline from the reference team's perspective:
/// `(goals_for, goals_against)`. Serializes as a two-element array.
pub type Score = (u16, u16);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_name: String,
    #[serde(default)]
    pub player_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegResult {
    #[serde(default)]
    pub goals_for: Option<u16>,
    #[serde(default)]
    pub goals_against: Option<u16>,
}

impl LegResult {
    pub fn new(goals_for: u16, goals_against: u16) -> Self {
        Self { goals_for: Some(goals_for), goals_against: Some(goals_against) }
    }

    /// Both sides, or nothing. A half-recorded leg is not a result.
    pub fn score(&self) -> Option<Score> {
        self.goals_for.zip(self.goals_against)
    }
}

/// One slot of a knockout round. Slots `2k` and `2k + 1` face each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureSlot {
    #[serde(default)]
    pub team_index: usize,
    pub opponent_index: usize,
    /// No team assigned: the partner slot advances on a bye.
    #[serde(default)]
    pub is_empty: bool,
    #[serde(default)]
    pub home: LegResult,
    #[serde(default)]
    pub away: LegResult,
    #[serde(default)]
    pub neutral: LegResult,
}

/// One entry of a league team sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeagueLeg {
    /// The team's own column; never played, never entered.
    SameTeam,
    Result(LegResult),
}

impl Default for LeagueLeg {
    fn default() -> Self {
        LeagueLeg::Result(LegResult::default())
    }
}

impl LeagueLeg {
    pub fn is_same_team(&self) -> bool {
        matches!(self, LeagueLeg::SameTeam)
    }

    pub fn result(&self) -> Option<&LegResult> {
        match self {
            LeagueLeg::SameTeam => None,
            LeagueLeg::Result(result) => Some(result),
        }
    }
}

/// A team's round-robin sheet, each list indexed by opponent roster index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamFixtures {
    pub home: Vec<LeagueLeg>,
    pub away: Vec<LeagueLeg>,
    pub neutral: Vec<LeagueLeg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub is_knockout: bool,
    pub use_two_legs: bool,
    pub has_league_fixtures_generated: bool,
    /// Zero-based index into `Fixtures::knockout_rounds`; `None` before the draw.
    pub current_round: Option<usize>,
    pub teams: Vec<Team>,
}

impl Tournament {
    /// Once fixtures exist the roster names are frozen.
    pub fn fixtures_generated(&self) -> bool {
        self.has_league_fixtures_generated || self.current_round.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fixtures {
    /// Indexed by team roster index.
    pub league_fixtures: Vec<TeamFixtures>,
    pub knockout_rounds: Vec<Vec<FixtureSlot>>,
}

impl Fixtures {
    pub fn round(&self, index: usize) -> Option<&[FixtureSlot]> {
        self.knockout_rounds.get(index).map(Vec::as_slice)
    }

    pub fn team_sheet(&self, team_index: usize) -> Option<&TeamFixtures> {
        self.league_fixtures.get(team_index)
    }
}
