use crate::state::messages::{NetworkRequest, NetworkResponse};
use fixture_api::client::{ApiError, FixtureApi};
use fixture_api::payload::{Payload, SubmissionChannel, forward};
use log::{debug, error};
use tokio::sync::mpsc;

/// Owns the backend client; everything that talks to the network goes
/// through here, one request at a time.
pub struct NetworkWorker {
    client: FixtureApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
}

impl NetworkWorker {
    pub fn new(
        client: FixtureApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self { client, requests, responses }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let response = match request {
                NetworkRequest::LoadTournament { tournament_id } => self
                    .handle_load_tournament(&tournament_id)
                    .await
                    .unwrap_or_else(|err| NetworkResponse::Error { message: err.to_string() }),
                NetworkRequest::Submit { tournament_id, payload } => {
                    submit(&self.client, &tournament_id, &payload).await
                }
            };

            debug!("network request complete");
            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_tournament(&self, tournament_id: &str) -> Result<NetworkResponse, ApiError> {
        debug!("loading tournament {tournament_id}");
        let tournament = self.client.fetch_tournament(tournament_id).await?;
        let fixtures = self.client.fetch_fixtures(tournament_id).await?;
        Ok(NetworkResponse::TournamentLoaded { tournament, fixtures })
    }
}

async fn submit<C: SubmissionChannel>(
    channel: &C,
    tournament_id: &str,
    payload: &Payload,
) -> NetworkResponse {
    match forward(channel, tournament_id, payload).await {
        Ok(()) => NetworkResponse::Submitted { label: payload.label() },
        Err(err) => {
            error!("{} not saved: {err}", payload.label());
            NetworkResponse::SubmissionFailed { message: err.to_string() }
        }
    }
}
