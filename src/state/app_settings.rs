use fixture_api::client::{DEFAULT_BASE_URL, FixtureApi};
use log::warn;
use std::path::PathBuf;
use std::time::Duration;

pub const API_VAR: &str = "FIXTURE_DESK_API";
pub const SNAPSHOT_VAR: &str = "FIXTURE_DESK_SNAPSHOT";
pub const TIMEOUT_VAR: &str = "FIXTURE_DESK_TIMEOUT_SECS";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub api_url: String,
    pub snapshot: Option<PathBuf>,
    pub timeout: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_owned(),
            snapshot: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AppSettings {
    /// Settings from the process environment. `.env` is loaded by `main`
    /// before logging starts.
    pub fn load() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_blank(API_VAR) {
            settings.api_url = url.trim().to_owned();
        }
        settings.snapshot = non_blank(SNAPSHOT_VAR).map(PathBuf::from);
        if let Some(secs) = non_blank(TIMEOUT_VAR) {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => settings.timeout = Duration::from_secs(secs),
                _ => warn!("ignoring {TIMEOUT_VAR}={secs:?}, using {DEFAULT_TIMEOUT_SECS}s"),
            }
        }
        settings
    }

    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        self
    }

    pub fn client(&self) -> FixtureApi {
        let client = FixtureApi::new()
            .with_base_url(self.api_url.clone())
            .with_timeout(self.timeout);
        match &self.snapshot {
            Some(path) => client.with_snapshot(path.clone()),
            None => client,
        }
    }
}
