use crate::Tournament;
use crate::payload::TeamsUpdate;
use std::fmt;

pub const MIN_TEAMS: usize = 4;
pub const MAX_TEAMS: usize = 30;

pub fn clamp_team_count(count: usize) -> usize {
    count.clamp(MIN_TEAMS, MAX_TEAMS)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// A roster exists; unlock before changing the team count.
    CountLocked,
    /// Fixtures exist, so team names and team count are frozen.
    FixturesGenerated,
    IndexOutOfRange { index: usize, team_count: usize },
    MissingTeamName(usize),
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterError::CountLocked => f.write_str("team count is locked"),
            RosterError::FixturesGenerated => f.write_str(
                "only player names can change once fixtures are generated; reset the fixtures first",
            ),
            RosterError::IndexOutOfRange { index, team_count } => {
                write!(f, "team {} does not exist ({team_count} teams)", index + 1)
            }
            RosterError::MissingTeamName(index) => write!(f, "team {} needs a name", index + 1),
        }
    }
}

impl std::error::Error for RosterError {}

/// Team and player names being edited before they are posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterDraft {
    team_count: usize,
    count_locked: bool,
    fixtures_generated: bool,
    // Sized to the largest count seen so shrinking and regrowing keeps typed names.
    team_names: Vec<String>,
    player_names: Vec<String>,
}

impl RosterDraft {
    pub fn from_tournament(tournament: &Tournament) -> Self {
        let existing = tournament.teams.len();
        let team_count = if existing == 0 { MIN_TEAMS } else { existing };
        let mut draft = Self {
            team_count,
            count_locked: existing != 0,
            fixtures_generated: tournament.fixtures_generated(),
            team_names: tournament.teams.iter().map(|t| t.team_name.clone()).collect(),
            player_names: tournament.teams.iter().map(|t| t.player_name.clone()).collect(),
        };
        draft.grow_to(team_count);
        draft
    }

    fn grow_to(&mut self, count: usize) {
        if self.team_names.len() < count {
            self.team_names.resize(count, String::new());
            self.player_names.resize(count, String::new());
        }
    }

    pub fn team_count(&self) -> usize {
        self.team_count
    }

    pub fn is_count_locked(&self) -> bool {
        self.count_locked || self.fixtures_generated
    }

    pub fn team_names_locked(&self) -> bool {
        self.fixtures_generated
    }

    pub fn unlock_team_count(&mut self) -> Result<(), RosterError> {
        if self.fixtures_generated {
            return Err(RosterError::FixturesGenerated);
        }
        self.count_locked = false;
        Ok(())
    }

    /// Applies the clamped count and returns it.
    pub fn set_team_count(&mut self, count: usize) -> Result<usize, RosterError> {
        if self.fixtures_generated {
            return Err(RosterError::FixturesGenerated);
        }
        if self.count_locked {
            return Err(RosterError::CountLocked);
        }
        self.team_count = clamp_team_count(count);
        self.grow_to(self.team_count);
        Ok(self.team_count)
    }

    fn check_index(&self, index: usize) -> Result<(), RosterError> {
        if index >= self.team_count {
            return Err(RosterError::IndexOutOfRange { index, team_count: self.team_count });
        }
        Ok(())
    }

    pub fn set_team_name(&mut self, index: usize, name: impl Into<String>) -> Result<(), RosterError> {
        if self.fixtures_generated {
            return Err(RosterError::FixturesGenerated);
        }
        self.check_index(index)?;
        self.team_names[index] = name.into();
        Ok(())
    }

    pub fn set_player_name(&mut self, index: usize, name: impl Into<String>) -> Result<(), RosterError> {
        self.check_index(index)?;
        self.player_names[index] = name.into();
        Ok(())
    }

    pub fn build(&self) -> Result<TeamsUpdate, RosterError> {
        let team_names: Vec<String> = self.team_names[..self.team_count]
            .iter()
            .map(|n| n.trim().to_owned())
            .collect();
        if let Some(index) = team_names.iter().position(String::is_empty) {
            return Err(RosterError::MissingTeamName(index));
        }
        let player_names = self.player_names[..self.team_count]
            .iter()
            .map(|n| n.trim().to_owned())
            .collect();
        Ok(TeamsUpdate { team_names, player_names })
    }
}
