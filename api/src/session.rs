//! One open entry view: a knockout round or a league team sheet.
//!
//! The session owns the only mutable state during entry (the
//! [`PendingEntry`]) and walks the submit cycle:
//! `Editing -> Validating -> Aborted | Collected -> Submitting -> Submitted`.
//! An aborted collection keeps every entered value and flags one field.

use crate::aggregate::displayed_leg;
use crate::collect::{
    CollectError, check_team_sheet, collect_knockout_results, collect_league_results,
};
use crate::entry::{FieldKey, PendingEntry, Role};
use crate::pairing::{StructuralError, check_round, pairs_of};
use crate::payload::{Payload, build_knockout_payload, build_league_payload};
use crate::validate::{Violation, check_field};
use crate::{FixtureSlot, Fixtures, Team, TeamFixtures, Tournament};
use log::{debug, warn};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Editing,
    Validating,
    /// Back to editing with `0.field` flagged.
    Aborted(Violation),
    Collected,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    UnknownField(FieldKey),
    /// Bye inputs are disabled.
    Locked(FieldKey),
    RoundClosed,
    /// A payload is on its way; wait for the outcome.
    Busy,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::UnknownField(key) => write!(f, "{key} is not an input of this view"),
            EditError::Locked(key) => write!(f, "{key} is disabled (automatic advance)"),
            EditError::RoundClosed => f.write_str(
                "this round is closed; clear the current round fixtures to update it",
            ),
            EditError::Busy => f.write_str("results are being submitted"),
        }
    }
}

impl std::error::Error for EditError {}

#[derive(Debug, Clone)]
enum Source {
    Knockout { round: usize, slots: Vec<FixtureSlot> },
    League { team_index: usize, sheet: TeamFixtures },
}

#[derive(Debug, Clone)]
pub struct EntrySession {
    tournament_id: String,
    source: Source,
    teams: Vec<Team>,
    use_two_legs: bool,
    closed: bool,
    entry: PendingEntry,
    locked: BTreeSet<FieldKey>,
    state: SessionState,
    last_error: Option<String>,
}

fn leg_keys(role: Role, index: usize) -> [FieldKey; 2] {
    [FieldKey::goals_for(role, index), FieldKey::goals_against(role, index)]
}

impl EntrySession {
    fn new(tournament: &Tournament, source: Source) -> Self {
        Self {
            tournament_id: tournament.id.clone(),
            source,
            teams: tournament.teams.clone(),
            use_two_legs: tournament.use_two_legs,
            closed: false,
            entry: PendingEntry::new(),
            locked: BTreeSet::new(),
            state: SessionState::Editing,
            last_error: None,
        }
    }

    /// Open knockout round `round`, seeding inputs from stored results.
    /// Rounds other than the tournament's current one open read-only.
    pub fn open_knockout(
        tournament: &Tournament,
        fixtures: &Fixtures,
        round: usize,
    ) -> Result<Self, StructuralError> {
        let slots = fixtures.round(round).ok_or(StructuralError::UnknownRound(round))?;
        check_round(slots, &tournament.teams)?;

        let mut session =
            Self::new(tournament, Source::Knockout { round, slots: slots.to_vec() });
        session.closed = tournament.current_round != Some(round);

        for pair in pairs_of(slots) {
            let keys: Vec<FieldKey> = if session.use_two_legs {
                [pair.index, pair.index + 1]
                    .into_iter()
                    .flat_map(|i| leg_keys(Role::Home, i))
                    .collect()
            } else {
                leg_keys(Role::Neutral, pair.index).to_vec()
            };

            if pair.is_bye() {
                session.locked.extend(keys);
                continue;
            }

            if session.use_two_legs {
                let home = &pair.first.home;
                session.entry.seed_leg(Role::Home, pair.index, home.goals_for, home.goals_against);
                // The second team hosts the return leg: the first slot's away
                // result seen from the host's side.
                let (host, visitor) = displayed_leg(Role::Away, &pair.first.away);
                session.entry.seed_leg(Role::Home, pair.index + 1, host, visitor);
            } else {
                let neutral = &pair.first.neutral;
                session
                    .entry
                    .seed_leg(Role::Neutral, pair.index, neutral.goals_for, neutral.goals_against);
            }
        }

        debug!(
            "opened knockout round {round} with {} inputs ({} locked){}",
            session.entry.len(),
            session.locked.len(),
            if session.closed { ", closed" } else { "" }
        );
        Ok(session)
    }

    /// Open the league sheet of `team_index`.
    pub fn open_league(
        tournament: &Tournament,
        fixtures: &Fixtures,
        team_index: usize,
    ) -> Result<Self, StructuralError> {
        let sheet = fixtures
            .team_sheet(team_index)
            .ok_or(StructuralError::UnknownTeam(team_index))?;
        check_team_sheet(team_index, sheet, tournament.teams.len(), tournament.use_two_legs)?;

        let mut session =
            Self::new(tournament, Source::League { team_index, sheet: sheet.clone() });

        for opponent in 0..tournament.teams.len() {
            if opponent == team_index {
                continue;
            }
            if session.use_two_legs {
                if let Some(home) = sheet.home[opponent].result() {
                    session.entry.seed_leg(Role::Home, opponent, home.goals_for, home.goals_against);
                }
                if let Some(away) = sheet.away[opponent].result() {
                    let (host, visitor) = displayed_leg(Role::Away, away);
                    session.entry.seed_leg(Role::Away, opponent, host, visitor);
                }
            } else if let Some(neutral) = sheet.neutral[opponent].result() {
                session
                    .entry
                    .seed_leg(Role::Neutral, opponent, neutral.goals_for, neutral.goals_against);
            }
        }

        debug!("opened league sheet of team {team_index} with {} inputs", session.entry.len());
        Ok(session)
    }

    pub fn tournament_id(&self) -> &str {
        &self.tournament_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn entry(&self) -> &PendingEntry {
        &self.entry
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn use_two_legs(&self) -> bool {
        self.use_two_legs
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_locked(&self, key: FieldKey) -> bool {
        self.closed || self.locked.contains(&key)
    }

    /// The field the last aborted collection blamed, if still unresolved.
    pub fn flagged(&self) -> Option<&Violation> {
        match &self.state {
            SessionState::Aborted(violation) => Some(violation),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn knockout_round(&self) -> Option<(usize, &[FixtureSlot])> {
        match &self.source {
            Source::Knockout { round, slots } => Some((*round, slots.as_slice())),
            Source::League { .. } => None,
        }
    }

    pub fn league_sheet(&self) -> Option<(usize, &TeamFixtures)> {
        match &self.source {
            Source::League { team_index, sheet } => Some((*team_index, sheet)),
            Source::Knockout { .. } => None,
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!("entry session {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Store the raw text of one input.
    pub fn edit(&mut self, key: FieldKey, raw: impl Into<String>) -> Result<(), EditError> {
        if matches!(self.state, SessionState::Collected | SessionState::Submitting) {
            return Err(EditError::Busy);
        }
        if self.closed {
            return Err(EditError::RoundClosed);
        }
        if self.locked.contains(&key) {
            return Err(EditError::Locked(key));
        }
        if !self.entry.contains(key) {
            return Err(EditError::UnknownField(key));
        }

        self.entry.set(key, raw);
        let resolved = match &self.state {
            SessionState::Aborted(violation) => violation.field == key,
            SessionState::Submitted => true,
            _ => false,
        };
        if resolved {
            self.transition(SessionState::Editing);
        }
        Ok(())
    }

    /// Check a single input, as on blur.
    pub fn check(&self, key: FieldKey) -> Result<(), Violation> {
        check_field(&self.entry, key)
    }

    /// Validate everything and build the payload. On failure nothing is
    /// produced and every entered value stays as it was.
    pub fn collect(&mut self) -> Result<Payload, CollectError> {
        if self.state == SessionState::Submitting {
            return Err(CollectError::Busy);
        }
        if self.closed {
            return Err(CollectError::RoundClosed);
        }
        self.transition(SessionState::Validating);

        let collected = match &self.source {
            Source::Knockout { slots, .. } => {
                collect_knockout_results(slots, &self.teams, &self.entry, self.use_two_legs)
                    .map(build_knockout_payload)
            }
            Source::League { team_index, sheet } => collect_league_results(
                *team_index,
                sheet,
                &self.teams,
                &self.entry,
                self.use_two_legs,
            )
            .map(build_league_payload),
        };

        match collected {
            Ok(payload) => {
                self.transition(SessionState::Collected);
                Ok(payload)
            }
            Err(CollectError::Aborted(violation)) => {
                warn!("collection aborted: {violation}");
                self.transition(SessionState::Aborted(violation));
                Err(CollectError::Aborted(violation))
            }
            Err(e) => {
                self.transition(SessionState::Editing);
                Err(e)
            }
        }
    }

    /// Drop a collected payload without sending it.
    pub fn cancel_submission(&mut self) {
        if self.state == SessionState::Collected {
            self.transition(SessionState::Editing);
        }
    }

    pub fn begin_submission(&mut self) {
        self.last_error = None;
        self.transition(SessionState::Submitting);
    }

    pub fn mark_submitted(&mut self) {
        self.transition(SessionState::Submitted);
    }

    /// The channel refused the payload. Values stay; the error is kept for display.
    pub fn mark_submission_failed(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
        self.transition(SessionState::Editing);
    }

    pub fn finish_submission<E: fmt::Display>(&mut self, outcome: Result<(), E>) {
        match outcome {
            Ok(()) => self.mark_submitted(),
            Err(e) => self.mark_submission_failed(e.to_string()),
        }
    }
}
