//! Whole-view collection of entered results.
//!
//! Collection is all-or-nothing: the first invalid field aborts and no
//! payload is produced. Blank legs are not errors and collect as `None`.

use crate::aggregate::recorded_leg;
use crate::entry::{PendingEntry, Role};
use crate::pairing::{StructuralError, check_round, pairs_of};
use crate::validate::{Violation, check_leg};
use crate::{FixtureSlot, LeagueLeg, Score, Team, TeamFixtures};
use log::debug;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectError {
    /// A field failed validation; nothing is submitted.
    Aborted(Violation),
    Structural(StructuralError),
    /// The round is no longer the current one and cannot take results.
    RoundClosed,
    /// A payload from this view is still being submitted.
    Busy,
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectError::Aborted(violation) => write!(f, "results not saved: {violation}"),
            CollectError::Structural(e) => write!(f, "fixture data is inconsistent: {e}"),
            CollectError::RoundClosed => f.write_str("this round is closed"),
            CollectError::Busy => f.write_str("results are being submitted"),
        }
    }
}

impl std::error::Error for CollectError {}

impl From<Violation> for CollectError {
    fn from(violation: Violation) -> Self {
        CollectError::Aborted(violation)
    }
}

impl From<StructuralError> for CollectError {
    fn from(e: StructuralError) -> Self {
        CollectError::Structural(e)
    }
}

/// Results of one league team sheet, each list indexed by opponent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeagueResults {
    pub team_index: usize,
    pub home: Vec<Option<Score>>,
    pub away: Vec<Option<Score>>,
    pub neutral: Vec<Option<Score>>,
}

/// Collect a knockout round.
///
/// Two-leg mode yields one result per slot: slot `i`'s home leg from slot
/// `i`'s perspective. Single-match mode yields one neutral result per tie.
/// Bye pairs yield `None` and their inputs are never read.
pub fn collect_knockout_results(
    round: &[FixtureSlot],
    teams: &[Team],
    entry: &PendingEntry,
    use_two_legs: bool,
) -> Result<Vec<Option<Score>>, CollectError> {
    check_round(round, teams)?;

    let mut results = Vec::with_capacity(if use_two_legs { round.len() } else { round.len() / 2 });
    for pair in pairs_of(round) {
        if pair.is_bye() {
            debug!("slot {} is a bye, nothing to collect", pair.index);
            results.push(None);
            if use_two_legs {
                results.push(None);
            }
            continue;
        }

        if use_two_legs {
            check_leg(entry, Role::Home, pair.index)?;
            check_leg(entry, Role::Home, pair.index + 1)?;
            results.push(recorded_leg(entry, Role::Home, pair.index));
            results.push(recorded_leg(entry, Role::Home, pair.index + 1));
        } else {
            check_leg(entry, Role::Neutral, pair.index)?;
            results.push(recorded_leg(entry, Role::Neutral, pair.index));
        }
    }
    Ok(results)
}

/// Fail closed on a sheet that does not line up with the roster.
pub fn check_team_sheet(
    team_index: usize,
    sheet: &TeamFixtures,
    roster_len: usize,
    use_two_legs: bool,
) -> Result<(), StructuralError> {
    if team_index >= roster_len {
        return Err(StructuralError::TeamOutOfRange { team_index, roster_len });
    }
    let lists = if use_two_legs {
        vec![&sheet.home, &sheet.away]
    } else {
        vec![&sheet.neutral]
    };
    for list in lists {
        if list.len() != roster_len {
            return Err(StructuralError::RosterMismatch {
                team_index,
                expected: roster_len,
                found: list.len(),
            });
        }
    }
    Ok(())
}

fn plays_itself(team_index: usize, opponent: usize, leg: &LeagueLeg) -> bool {
    opponent == team_index || leg.is_same_team()
}

/// Collect one team's league sheet. Away legs are entered host-first and
/// recorded reversed; see [`crate::aggregate`].
pub fn collect_league_results(
    team_index: usize,
    sheet: &TeamFixtures,
    teams: &[Team],
    entry: &PendingEntry,
    use_two_legs: bool,
) -> Result<LeagueResults, CollectError> {
    check_team_sheet(team_index, sheet, teams.len(), use_two_legs)?;

    let mut results = LeagueResults { team_index, ..Default::default() };
    for opponent in 0..teams.len() {
        if use_two_legs {
            if plays_itself(team_index, opponent, &sheet.home[opponent]) {
                results.home.push(None);
                results.away.push(None);
                continue;
            }
            check_leg(entry, Role::Home, opponent)?;
            check_leg(entry, Role::Away, opponent)?;
            results.home.push(recorded_leg(entry, Role::Home, opponent));
            results.away.push(recorded_leg(entry, Role::Away, opponent));
        } else {
            if plays_itself(team_index, opponent, &sheet.neutral[opponent]) {
                results.neutral.push(None);
                continue;
            }
            check_leg(entry, Role::Neutral, opponent)?;
            results.neutral.push(recorded_leg(entry, Role::Neutral, opponent));
        }
    }
    Ok(results)
}
