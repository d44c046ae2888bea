mod app;
mod entries;
mod report;
mod state;

use crate::app::App;
use crate::entries::{load_entries, load_roster, parse_assignment};
use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse};
use crate::state::network::NetworkWorker;
use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use fixture_api::entry::FieldKey;
use fixture_api::payload::Payload;
use log::error;
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "fixture-desk", version)]
#[command(about = "Enter and submit fixture results for knockout and league tournaments")]
#[command(after_help = "Environment:
  FIXTURE_DESK_API           Backend base URL (default http://localhost:5000/api/)
  FIXTURE_DESK_SNAPSHOT      Read tournament and fixtures from a local JSON snapshot
  FIXTURE_DESK_TIMEOUT_SECS  Request timeout in seconds (default 10)")]
struct Cli {
    /// Backend base URL, overrides FIXTURE_DESK_API
    #[arg(long, global = true)]
    api: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a knockout round or a league team sheet
    Show {
        tournament_id: String,
        /// Knockout round, counted from 1 (default: the current round)
        #[arg(long)]
        round: Option<usize>,
        /// League team, counted from 1 in roster order
        #[arg(long)]
        team: Option<usize>,
    },
    /// Enter results for a knockout round
    Knockout {
        tournament_id: String,
        /// Knockout round, counted from 1 (default: the current round)
        #[arg(long)]
        round: Option<usize>,
        #[command(flatten)]
        input: EntryArgs,
    },
    /// Enter results for one team's league fixtures
    League {
        tournament_id: String,
        /// League team, counted from 1 in roster order
        #[arg(long)]
        team: usize,
        #[command(flatten)]
        input: EntryArgs,
    },
    /// Post team and player names
    Teams {
        tournament_id: String,
        /// JSON array of {"teamName", "playerName"}
        #[arg(long)]
        roster: PathBuf,
        /// Number of teams (4 to 30; default: the roster file length)
        #[arg(long)]
        count: Option<usize>,
        /// Print the payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Args)]
struct EntryArgs {
    /// JSON object of field ids to raw values, e.g. {"homeGoalsFor0": "2"}
    #[arg(long)]
    entries: Option<PathBuf>,
    /// Set one input, e.g. --set homeGoalsFor0=2 (applied after --entries)
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    set: Vec<(FieldKey, String)>,
    /// Print the payload instead of sending it
    #[arg(long)]
    dry_run: bool,
}

impl EntryArgs {
    fn edits(&self) -> Result<Vec<(FieldKey, String)>> {
        let mut edits = match &self.entries {
            Some(path) => load_entries(path)?,
            None => Vec::new(),
        };
        edits.extend(self.set.iter().cloned());
        Ok(edits)
    }
}

impl Command {
    fn tournament_id(&self) -> &str {
        match self {
            Command::Show { tournament_id, .. }
            | Command::Knockout { tournament_id, .. }
            | Command::League { tournament_id, .. }
            | Command::Teams { tournament_id, .. } => tournament_id,
        }
    }
}

/// Counted-from-1 command line value to an index.
fn to_index(value: usize, what: &str) -> Result<usize> {
    value.checked_sub(1).ok_or_else(|| anyhow!("{what} is counted from 1"))
}

struct Desk {
    app: App,
    requests: mpsc::Sender<NetworkRequest>,
    responses: mpsc::Receiver<NetworkResponse>,
}

impl Desk {
    async fn request(&mut self, request: NetworkRequest) -> Result<NetworkResponse> {
        self.requests
            .send(request)
            .await
            .map_err(|_| anyhow!("network worker stopped"))?;
        self.responses.recv().await.ok_or_else(|| anyhow!("network worker stopped"))
    }

    async fn load(&mut self, tournament_id: &str) -> Result<()> {
        let request = NetworkRequest::LoadTournament { tournament_id: tournament_id.to_owned() };
        match self.request(request).await? {
            NetworkResponse::TournamentLoaded { tournament, fixtures } => {
                self.app.on_tournament_loaded(tournament, fixtures);
                Ok(())
            }
            NetworkResponse::Error { message } => {
                error!("Network error: {message}");
                self.app.on_error(message.clone());
                Err(anyhow!(message)).context(format!("could not load tournament {tournament_id}"))
            }
            other => bail!("unexpected response while loading: {other:?}"),
        }
    }

    async fn send(&mut self, tournament_id: String, payload: Payload, dry_run: bool) -> Result<()> {
        if dry_run {
            println!("{} {}", payload.method(), payload.route(&tournament_id));
            println!("{}", serde_json::to_string_pretty(&payload)?);
            self.app.cancel_submission();
            return Ok(());
        }

        self.app.begin_submission();
        match self.request(NetworkRequest::Submit { tournament_id, payload }).await? {
            NetworkResponse::Submitted { label } => {
                self.app.on_submitted(label);
                let at = self.app.state.last_submitted.map(|t| t.format("%H:%M:%S").to_string());
                println!("{label} saved at {}", at.unwrap_or_default());
                Ok(())
            }
            NetworkResponse::SubmissionFailed { message } => {
                self.app.on_submission_failed(message.clone());
                bail!("not saved: {message}")
            }
            other => bail!("unexpected response while submitting: {other:?}"),
        }
    }

    async fn run(&mut self, command: Command) -> Result<()> {
        self.load(command.tournament_id()).await?;

        match command {
            Command::Show { round, team, .. } => {
                let tournament = self.app.tournament()?;
                let fixtures = &self.app.state.fixtures;
                let lines = match (team, tournament.is_knockout) {
                    (Some(team), false) => {
                        report::league_sheet_lines(tournament, fixtures, to_index(team, "team")?)?
                    }
                    (None, false) => bail!("--team is required for a league"),
                    (_, true) => {
                        let round = match round {
                            Some(round) => to_index(round, "round")?,
                            None => self.app.default_round()?,
                        };
                        report::knockout_round_lines(tournament, fixtures, round)?
                    }
                };
                for line in lines {
                    println!("{line}");
                }
                Ok(())
            }
            Command::Knockout { round, input, .. } => {
                let round = round.map(|r| to_index(r, "round")).transpose()?;
                self.app.open_knockout(round)?;
                self.app.apply_edits(input.edits()?)?;
                let (tournament_id, payload) =
                    self.app.collect().context("results not submitted")?;
                self.send(tournament_id, payload, input.dry_run).await
            }
            Command::League { team, input, .. } => {
                self.app.open_league(to_index(team, "team")?)?;
                self.app.apply_edits(input.edits()?)?;
                let (tournament_id, payload) =
                    self.app.collect().context("results not submitted")?;
                self.send(tournament_id, payload, input.dry_run).await
            }
            Command::Teams { roster, count, dry_run, .. } => {
                self.app.open_roster()?;
                let teams = load_roster(&roster)?;
                let (tournament_id, payload) = self.app.apply_roster(teams, count)?;
                self.send(tournament_id, payload, dry_run).await
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    better_panic::install();
    let cli = Cli::parse();

    let _ = dotenvy::dotenv();
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let settings = AppSettings::load().with_api_url(cli.api);
    let client = settings.client();

    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(16);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(16);
    let network_worker = NetworkWorker::new(client, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    let mut desk = Desk {
        app: App::new(settings),
        requests: network_req_tx,
        responses: network_resp_rx,
    };
    let result = desk.run(cli.command).await;

    network_task.abort();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use fixture_api::entry::Role;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn knockout_command_collects_repeated_sets() {
        let cli = Cli::try_parse_from([
            "fixture-desk",
            "knockout",
            "abc",
            "--round",
            "2",
            "--set",
            "homeGoalsFor0=2",
            "--set",
            "homeGoalsAgainst0=1",
            "--dry-run",
        ])
        .unwrap();
        let Command::Knockout { tournament_id, round, input } = cli.command else {
            panic!("expected the knockout command");
        };
        assert_eq!(tournament_id, "abc");
        assert_eq!(round, Some(2));
        assert!(input.dry_run);
        assert_eq!(
            input.edits().unwrap(),
            vec![
                (FieldKey::goals_for(Role::Home, 0), "2".to_owned()),
                (FieldKey::goals_against(Role::Home, 0), "1".to_owned()),
            ]
        );
    }

    #[test]
    fn bad_field_id_is_a_usage_error() {
        assert!(Cli::try_parse_from(["fixture-desk", "league", "abc", "--team", "1", "--set", "goals=1"]).is_err());
        assert!(Cli::try_parse_from(["fixture-desk", "league", "abc"]).is_err());
    }

    #[test]
    fn positions_are_counted_from_one() {
        assert_eq!(to_index(1, "round").unwrap(), 0);
        assert!(to_index(0, "team").is_err());
    }
}
