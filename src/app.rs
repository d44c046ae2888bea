use crate::state::app_settings::AppSettings;
use crate::state::app_state::{ActiveView, AppState};
use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use fixture_api::Team;
use fixture_api::entry::FieldKey;
use fixture_api::payload::Payload;
use fixture_api::roster::RosterDraft;
use fixture_api::session::EntrySession;
use fixture_api::{Fixtures, Tournament};
use log::{info, warn};

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        Self { settings, state: AppState::new() }
    }

    // -----------------------------------------------------------------------
    // Network response handlers
    // -----------------------------------------------------------------------

    pub fn on_tournament_loaded(&mut self, tournament: Tournament, fixtures: Fixtures) {
        let source = match &self.settings.snapshot {
            Some(path) => path.display().to_string(),
            None => self.settings.api_url.clone(),
        };
        info!(
            "loaded {} from {source} ({} teams, {})",
            tournament.name,
            tournament.teams.len(),
            if tournament.is_knockout { "knockout" } else { "league" }
        );
        self.state.last_error = None;
        self.state.view = ActiveView::None;
        self.state.tournament = Some(tournament);
        self.state.fixtures = fixtures;
    }

    pub fn on_submitted(&mut self, label: &str) {
        info!("{label} saved");
        self.state.last_error = None;
        self.state.last_submitted = Some(Local::now());
        if let Some(session) = self.state.session_mut() {
            session.mark_submitted();
        }
    }

    pub fn on_submission_failed(&mut self, message: String) {
        if let Some(session) = self.state.session_mut() {
            session.mark_submission_failed(message.clone());
        }
        self.state.last_error = Some(message);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    pub fn tournament(&self) -> Result<&Tournament> {
        self.state.tournament.as_ref().ok_or_else(|| anyhow!("no tournament loaded"))
    }

    // -----------------------------------------------------------------------
    // Opening views
    // -----------------------------------------------------------------------

    /// Round to use when none is given: the current one.
    pub fn default_round(&self) -> Result<usize> {
        self.tournament()?
            .current_round
            .ok_or_else(|| anyhow!("the knockout draw has not been made yet"))
    }

    pub fn open_knockout(&mut self, round: Option<usize>) -> Result<&EntrySession> {
        let tournament = self.tournament()?;
        if !tournament.is_knockout {
            bail!("{} is a league; use the league command", tournament.name);
        }
        let round = match round {
            Some(round) => round,
            None => self.default_round()?,
        };
        let session = EntrySession::open_knockout(tournament, &self.state.fixtures, round)
            .with_context(|| format!("cannot open round {}", round + 1))?;
        if session.is_closed() {
            warn!("round {} is closed; results can only be viewed", round + 1);
        }
        self.state.view = ActiveView::Entry(session);
        self.state.session().ok_or_else(|| anyhow!("no entry view open"))
    }

    pub fn open_league(&mut self, team_index: usize) -> Result<&EntrySession> {
        let tournament = self.tournament()?;
        if tournament.is_knockout {
            bail!("{} is a knockout; use the knockout command", tournament.name);
        }
        if !tournament.has_league_fixtures_generated {
            bail!("fixtures have not been generated yet");
        }
        let session = EntrySession::open_league(tournament, &self.state.fixtures, team_index)
            .with_context(|| format!("cannot open the sheet of team {}", team_index + 1))?;
        self.state.view = ActiveView::Entry(session);
        self.state.session().ok_or_else(|| anyhow!("no entry view open"))
    }

    pub fn open_roster(&mut self) -> Result<()> {
        let draft = RosterDraft::from_tournament(self.tournament()?);
        self.state.view = ActiveView::Roster(draft);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Entry
    // -----------------------------------------------------------------------

    pub fn apply_edits(&mut self, edits: Vec<(FieldKey, String)>) -> Result<()> {
        let session = self.state.session_mut().ok_or_else(|| anyhow!("no entry view open"))?;
        for (key, raw) in edits {
            session.edit(key, raw)?;
            if let Err(violation) = session.check(key) {
                // Blur-time feedback only; collection decides.
                warn!("{violation}");
            }
        }
        Ok(())
    }

    /// Validate the open view and return the tournament id and payload to send.
    pub fn collect(&mut self) -> Result<(String, Payload)> {
        let session = self.state.session_mut().ok_or_else(|| anyhow!("no entry view open"))?;
        let payload = session.collect()?;
        Ok((session.tournament_id().to_owned(), payload))
    }

    pub fn begin_submission(&mut self) {
        if let Some(session) = self.state.session_mut() {
            session.begin_submission();
        }
    }

    /// The collected payload will not be sent; reopen the view for edits.
    pub fn cancel_submission(&mut self) {
        if let Some(session) = self.state.session_mut() {
            session.cancel_submission();
        }
    }

    // -----------------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------------

    pub fn apply_roster(&mut self, teams: Vec<Team>, count: Option<usize>) -> Result<(String, Payload)> {
        let tournament_id = self.tournament()?.id.clone();
        let has_roster = !self.tournament()?.teams.is_empty();
        let draft = self.state.roster_mut().ok_or_else(|| anyhow!("no roster view open"))?;

        let wanted = count.unwrap_or(teams.len());
        if wanted != draft.team_count() && !draft.team_names_locked() {
            if has_roster {
                draft.unlock_team_count()?;
            }
            let applied = draft.set_team_count(wanted)?;
            if applied != wanted {
                warn!("team count {wanted} is out of range, using {applied}");
            }
        }

        let locked = draft.team_names_locked();
        if locked {
            warn!("fixtures exist, only player names will be updated");
        }
        if teams.len() > draft.team_count() {
            warn!("ignoring {} teams beyond the first {}", teams.len() - draft.team_count(), draft.team_count());
        }
        for (index, team) in teams.into_iter().take(draft.team_count()).enumerate() {
            if !locked {
                draft.set_team_name(index, team.team_name)?;
            }
            draft.set_player_name(index, team.player_name)?;
        }
        Ok((tournament_id, Payload::Teams(draft.build()?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixture_api::entry::Role;
    use fixture_api::session::SessionState;
    use fixture_api::{FixtureSlot, LegResult};

    fn teams(names: &[&str]) -> Vec<Team> {
        names
            .iter()
            .map(|n| Team { team_name: (*n).into(), player_name: String::new() })
            .collect()
    }

    fn cup() -> (Tournament, Fixtures) {
        let tournament = Tournament {
            id: "cup".into(),
            name: "Cup".into(),
            is_knockout: true,
            current_round: Some(0),
            teams: teams(&["Reds", "Blues"]),
            ..Default::default()
        };
        let fixtures = Fixtures {
            knockout_rounds: vec![vec![
                FixtureSlot { team_index: 0, opponent_index: 1, ..Default::default() },
                FixtureSlot { team_index: 1, opponent_index: 0, ..Default::default() },
            ]],
            ..Default::default()
        };
        (tournament, fixtures)
    }

    fn loaded(tournament: Tournament, fixtures: Fixtures) -> App {
        let mut app = App::new(AppSettings::default());
        app.on_tournament_loaded(tournament, fixtures);
        app
    }

    #[test]
    fn knockout_entry_round_trip() {
        let (t, f) = cup();
        let mut app = loaded(t, f);
        app.open_knockout(None).unwrap();
        app.apply_edits(vec![
            (FieldKey::goals_for(Role::Neutral, 0), "3".into()),
            (FieldKey::goals_against(Role::Neutral, 0), "1".into()),
        ])
        .unwrap();

        let (id, payload) = app.collect().unwrap();
        assert_eq!(id, "cup");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({ "results": [[3, 1]] })
        );

        app.begin_submission();
        app.on_submitted(payload.label());
        assert_eq!(app.state.session().unwrap().state(), &SessionState::Submitted);
        assert!(app.state.last_submitted.is_some());
    }

    #[test]
    fn aborted_collection_is_an_error_and_keeps_values() {
        let (t, f) = cup();
        let mut app = loaded(t, f);
        app.open_knockout(Some(0)).unwrap();
        app.apply_edits(vec![(FieldKey::goals_for(Role::Neutral, 0), "-2".into())]).unwrap();
        assert!(app.collect().is_err());
        assert_eq!(app.state.session().unwrap().entry().raw(FieldKey::goals_for(Role::Neutral, 0)), "-2");
    }

    #[test]
    fn failed_submission_is_kept_for_display() {
        let (t, f) = cup();
        let mut app = loaded(t, f);
        app.open_knockout(None).unwrap();
        app.collect().unwrap();
        app.begin_submission();
        app.on_submission_failed("API error".into());
        assert_eq!(app.state.last_error.as_deref(), Some("API error"));
        assert_eq!(app.state.session().unwrap().last_error(), Some("API error"));
    }

    #[test]
    fn dry_run_leaves_the_view_editable() {
        let (t, f) = cup();
        let mut app = loaded(t, f);
        app.open_knockout(None).unwrap();
        app.collect().unwrap();
        app.cancel_submission();
        assert_eq!(app.state.session().unwrap().state(), &SessionState::Editing);
        app.apply_edits(vec![(FieldKey::goals_for(Role::Neutral, 0), "1".into())]).unwrap();
        assert!(app.collect().is_ok());
    }

    #[test]
    fn wrong_view_for_format_is_refused() {
        let (t, f) = cup();
        let mut app = loaded(t, f);
        assert!(app.open_league(0).is_err());

        let (mut t, f) = cup();
        t.current_round = None;
        let mut app = loaded(t, f);
        assert!(app.open_knockout(None).is_err());
    }

    #[test]
    fn roster_for_a_new_tournament_sets_count_from_file() {
        let mut app = loaded(Tournament { id: "new".into(), ..Default::default() }, Fixtures::default());
        app.open_roster().unwrap();
        let (id, payload) = app
            .apply_roster(teams(&["A", "B", "C", "D", "E"]), None)
            .unwrap();
        assert_eq!(id, "new");
        let Payload::Teams(update) = payload else {
            panic!("roster builds a teams payload");
        };
        assert_eq!(update.team_names, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn roster_after_the_draw_only_changes_players() {
        let (mut t, f) = cup();
        t.teams = teams(&["Reds", "Blues", "Greens", "Golds"]);
        let mut app = loaded(t, f);
        app.open_roster().unwrap();
        let mut renamed = teams(&["X", "Y", "Z", "W"]);
        renamed[0].player_name = "ann".into();
        let (_, payload) = app.apply_roster(renamed, None).unwrap();
        let Payload::Teams(update) = payload else {
            panic!("roster builds a teams payload");
        };
        assert_eq!(update.team_names, vec!["Reds", "Blues", "Greens", "Golds"]);
        assert_eq!(update.player_names[0], "ann");
    }

    #[test]
    fn stored_results_seed_the_round() {
        let (t, mut f) = cup();
        f.knockout_rounds[0][0].neutral = LegResult::new(0, 0);
        let mut app = loaded(t, f);
        let session = app.open_knockout(None).unwrap();
        assert_eq!(session.entry().raw(FieldKey::goals_for(Role::Neutral, 0)), "0");
    }
}
