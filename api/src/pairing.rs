//! Who plays whom in a knockout round.
//!
//! A round is a flat list of slots where slot `2k` and slot `2k + 1` are
//! paired with each other. An empty slot gives its partner a bye.

use crate::{FixtureSlot, Team};
use std::fmt;

/// Placeholder shown for a slot with no team.
pub const EMPTY_SLOT: &str = "(empty)";

/// Malformed fixture data. The engine refuses to guess around these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    OddRound { len: usize },
    OpponentOutOfRange { opponent_index: usize, round_len: usize },
    AsymmetricPairing { slot: usize, opponent_index: usize },
    NotAdjacent { slot: usize, opponent_index: usize },
    TeamOutOfRange { team_index: usize, roster_len: usize },
    RosterMismatch { team_index: usize, expected: usize, found: usize },
    UnknownRound(usize),
    UnknownTeam(usize),
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralError::OddRound { len } => {
                write!(f, "knockout round has an odd number of slots ({len})")
            }
            StructuralError::OpponentOutOfRange { opponent_index, round_len } => write!(
                f,
                "opponent slot {opponent_index} is outside a round of {round_len}"
            ),
            StructuralError::AsymmetricPairing { slot, opponent_index } => write!(
                f,
                "slot {slot} points at {opponent_index}, which does not point back"
            ),
            StructuralError::NotAdjacent { slot, opponent_index } => {
                write!(f, "slot {slot} is paired with non-adjacent slot {opponent_index}")
            }
            StructuralError::TeamOutOfRange { team_index, roster_len } => {
                write!(f, "team {team_index} is not in a roster of {roster_len}")
            }
            StructuralError::RosterMismatch { team_index, expected, found } => write!(
                f,
                "fixtures of team {team_index} list {found} opponents, roster has {expected}"
            ),
            StructuralError::UnknownRound(round) => write!(f, "no knockout round {round}"),
            StructuralError::UnknownTeam(team) => write!(f, "no fixtures for team {team}"),
        }
    }
}

impl std::error::Error for StructuralError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing<'a> {
    pub first_team: &'a str,
    pub second_team: &'a str,
    /// The first team goes through without playing.
    pub auto_advance: bool,
}

/// Two slots facing each other; `index` is the even slot.
#[derive(Debug, Clone, Copy)]
pub struct SlotPair<'a> {
    pub index: usize,
    pub first: &'a FixtureSlot,
    pub second: &'a FixtureSlot,
}

impl SlotPair<'_> {
    /// Nothing to play: one side (or both) is empty.
    pub fn is_bye(&self) -> bool {
        self.first.is_empty || self.second.is_empty
    }
}

/// Adjacent slot pairs of a round. A trailing unpaired slot is not yielded;
/// run [`check_round`] first to reject such a round.
pub fn pairs_of(round: &[FixtureSlot]) -> impl Iterator<Item = SlotPair<'_>> {
    round.chunks_exact(2).enumerate().map(|(k, pair)| SlotPair {
        index: 2 * k,
        first: &pair[0],
        second: &pair[1],
    })
}

fn team_name<'a>(slot: &FixtureSlot, teams: &'a [Team]) -> Result<&'a str, StructuralError> {
    teams
        .get(slot.team_index)
        .map(|t| t.team_name.as_str())
        .ok_or(StructuralError::TeamOutOfRange {
            team_index: slot.team_index,
            roster_len: teams.len(),
        })
}

/// Resolve the two names shown for `slot` and whether it advances on a bye.
pub fn resolve_pair<'a>(
    slot: &FixtureSlot,
    round: &[FixtureSlot],
    teams: &'a [Team],
) -> Result<Pairing<'a>, StructuralError> {
    if slot.is_empty {
        return Ok(Pairing { first_team: EMPTY_SLOT, second_team: EMPTY_SLOT, auto_advance: false });
    }

    let first_team = team_name(slot, teams)?;
    let opponent = round.get(slot.opponent_index).ok_or(StructuralError::OpponentOutOfRange {
        opponent_index: slot.opponent_index,
        round_len: round.len(),
    })?;

    if opponent.is_empty {
        Ok(Pairing { first_team, second_team: EMPTY_SLOT, auto_advance: true })
    } else {
        Ok(Pairing { first_team, second_team: team_name(opponent, teams)?, auto_advance: false })
    }
}

/// Validate the shape of a whole round: even length, symmetric pairing on
/// adjacent indices, and every assigned team present in the roster.
pub fn check_round(round: &[FixtureSlot], teams: &[Team]) -> Result<(), StructuralError> {
    if round.len() % 2 != 0 {
        return Err(StructuralError::OddRound { len: round.len() });
    }
    for (slot, fixture) in round.iter().enumerate() {
        let opponent_index = fixture.opponent_index;
        let Some(opponent) = round.get(opponent_index) else {
            return Err(StructuralError::OpponentOutOfRange { opponent_index, round_len: round.len() });
        };
        if opponent.opponent_index != slot {
            return Err(StructuralError::AsymmetricPairing { slot, opponent_index });
        }
        if opponent_index != slot ^ 1 {
            return Err(StructuralError::NotAdjacent { slot, opponent_index });
        }
        if !fixture.is_empty {
            team_name(fixture, teams)?;
        }
    }
    Ok(())
}
