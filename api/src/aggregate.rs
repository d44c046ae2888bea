//! Turning entered legs into recorded results.
//!
//! Results are always stored from the reference team's perspective (the team
//! whose sheet or slot is being edited). Away legs are shown host-first, so
//! the left cell of an away leg holds the *opponent's* goals and the recorded
//! result swaps the two cells: a displayed away leg of `3-1` is stored as
//! `[1, 3]`.

use crate::cell::ScoreCell;
use crate::entry::{FieldKey, PendingEntry, Role};
use crate::{LegResult, Score};

/// `None` unless both cells hold a recordable value.
pub fn aggregate_leg(goals_for: ScoreCell, goals_against: ScoreCell) -> Option<Score> {
    Some((goals_for.goals()?, goals_against.goals()?))
}

/// Record an away leg entered host-first.
pub fn aggregate_away_leg(host_goals: ScoreCell, visitor_goals: ScoreCell) -> Option<Score> {
    aggregate_leg(visitor_goals, host_goals)
}

/// The leg under `role` at `index`, as recorded for the reference team.
pub fn recorded_leg(entry: &PendingEntry, role: Role, index: usize) -> Option<Score> {
    let left = entry.cell(FieldKey::goals_for(role, index));
    let right = entry.cell(FieldKey::goals_against(role, index));
    match role {
        Role::Away => aggregate_away_leg(left, right),
        Role::Home | Role::Neutral => aggregate_leg(left, right),
    }
}

/// Inverse of [`recorded_leg`]: the (left, right) cell values for a stored result.
pub fn displayed_leg(role: Role, result: &LegResult) -> (Option<u16>, Option<u16>) {
    match role {
        Role::Away => (result.goals_against, result.goals_for),
        Role::Home | Role::Neutral => (result.goals_for, result.goals_against),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieSide {
    First,
    Second,
}

/// Goals over a whole knockout tie, first team vs second team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TieAggregate {
    pub first_goals: u32,
    pub second_goals: u32,
    legs_recorded: usize,
    legs_total: usize,
}

impl TieAggregate {
    /// `first_home` is the first team's home leg from its own perspective,
    /// `second_home` the second team's home leg from *its* perspective.
    pub fn two_legs(first_home: Option<Score>, second_home: Option<Score>) -> Self {
        let mut tie = TieAggregate { legs_total: 2, ..Default::default() };
        if let Some((first, second)) = first_home {
            tie.add(first, second);
        }
        if let Some((second, first)) = second_home {
            tie.add(first, second);
        }
        tie
    }

    pub fn single(neutral: Option<Score>) -> Self {
        let mut tie = TieAggregate { legs_total: 1, ..Default::default() };
        if let Some((first, second)) = neutral {
            tie.add(first, second);
        }
        tie
    }

    fn add(&mut self, first: u16, second: u16) {
        self.first_goals += u32::from(first);
        self.second_goals += u32::from(second);
        self.legs_recorded += 1;
    }

    pub fn is_complete(&self) -> bool {
        self.legs_total > 0 && self.legs_recorded == self.legs_total
    }

    /// The side through on aggregate. Level ties are left to the backend.
    pub fn qualifier(&self) -> Option<TieSide> {
        if !self.is_complete() {
            return None;
        }
        match self.first_goals.cmp(&self.second_goals) {
            std::cmp::Ordering::Greater => Some(TieSide::First),
            std::cmp::Ordering::Less => Some(TieSide::Second),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_leg_aggregates_to_none() {
        assert_eq!(aggregate_leg(ScoreCell::Blank, ScoreCell::Blank), None);
        assert_eq!(aggregate_leg(ScoreCell::Goals(1), ScoreCell::Blank), None);
        assert_eq!(aggregate_leg(ScoreCell::Goals(2), ScoreCell::Goals(1)), Some((2, 1)));
    }

    #[test]
    fn away_leg_is_recorded_from_the_reference_team() {
        assert_eq!(aggregate_away_leg(ScoreCell::Goals(3), ScoreCell::Goals(1)), Some((1, 3)));

        let mut entry = PendingEntry::new();
        entry.set(FieldKey::goals_for(Role::Away, 0), "3");
        entry.set(FieldKey::goals_against(Role::Away, 0), "1");
        assert_eq!(recorded_leg(&entry, Role::Away, 0), Some((1, 3)));
    }

    #[test]
    fn display_and_record_agree() {
        let stored = LegResult::new(1, 3);
        let (left, right) = displayed_leg(Role::Away, &stored);
        assert_eq!((left, right), (Some(3), Some(1)));

        let mut entry = PendingEntry::new();
        entry.seed_leg(Role::Away, 4, left, right);
        assert_eq!(recorded_leg(&entry, Role::Away, 4), stored.score());

        let (left, right) = displayed_leg(Role::Home, &stored);
        assert_eq!((left, right), (Some(1), Some(3)));
    }

    #[test]
    fn tie_totals_follow_each_hosts_perspective() {
        // First team wins 2-1 at home, loses 0-1 away (second team hosts 1-0).
        let tie = TieAggregate::two_legs(Some((2, 1)), Some((1, 0)));
        assert_eq!((tie.first_goals, tie.second_goals), (2, 2));
        assert!(tie.is_complete());
        assert_eq!(tie.qualifier(), None);

        let tie = TieAggregate::two_legs(Some((2, 1)), Some((0, 1)));
        assert_eq!((tie.first_goals, tie.second_goals), (3, 1));
        assert_eq!(tie.qualifier(), Some(TieSide::First));
    }

    #[test]
    fn half_played_tie_has_no_qualifier() {
        let tie = TieAggregate::two_legs(Some((0, 4)), None);
        assert!(!tie.is_complete());
        assert_eq!(tie.qualifier(), None);

        assert_eq!(TieAggregate::single(Some((0, 1))).qualifier(), Some(TieSide::Second));
        assert_eq!(TieAggregate::single(None).qualifier(), None);
    }
}
