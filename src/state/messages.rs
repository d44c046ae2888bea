use fixture_api::payload::Payload;
use fixture_api::{Fixtures, Tournament};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadTournament { tournament_id: String },
    Submit { tournament_id: String, payload: Payload },
}

#[derive(Debug)]
pub enum NetworkResponse {
    TournamentLoaded { tournament: Tournament, fixtures: Fixtures },
    Submitted { label: &'static str },
    /// The backend refused a payload. Never retried.
    SubmissionFailed { message: String },
    Error { message: String },
}
