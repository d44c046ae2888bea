use chrono::{DateTime, Local};
use fixture_api::roster::RosterDraft;
use fixture_api::session::EntrySession;
use fixture_api::{Fixtures, Tournament};

/// Which editor the loaded tournament is open in.
#[derive(Debug, Default)]
pub enum ActiveView {
    #[default]
    None,
    Entry(EntrySession),
    Roster(RosterDraft),
}

#[derive(Debug, Default)]
pub struct AppState {
    pub tournament: Option<Tournament>,
    pub fixtures: Fixtures,
    pub view: ActiveView,
    pub last_error: Option<String>,
    pub last_submitted: Option<DateTime<Local>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&EntrySession> {
        match &self.view {
            ActiveView::Entry(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut EntrySession> {
        match &mut self.view {
            ActiveView::Entry(session) => Some(session),
            _ => None,
        }
    }

    pub fn roster_mut(&mut self) -> Option<&mut RosterDraft> {
        match &mut self.view {
            ActiveView::Roster(draft) => Some(draft),
            _ => None,
        }
    }
}
