use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ProvisionError, Result};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client for the upstream release API.
///
/// The HTTP client, API base URL and repository identifier are all injected,
/// so tests can point it at a local mock server.
#[derive(Debug, Clone)]
pub struct ReleaseFetcher {
    client: Client,
    api_base: String,
    repo: String,
}

impl ReleaseFetcher {
    pub const DEFAULT_API_BASE: &'static str = "https://api.github.com";
    pub const DEFAULT_REPO: &'static str = "NationalSecurityAgency/ghidra";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(client: Client, api_base: impl Into<String>, repo: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        ReleaseFetcher {
            client,
            api_base,
            repo: repo.into(),
        }
    }

    /// Fetcher for the default upstream repository
    pub fn upstream() -> Result<Self> {
        Ok(Self::new(
            Self::default_client(Self::DEFAULT_TIMEOUT)?,
            Self::DEFAULT_API_BASE,
            Self::DEFAULT_REPO,
        ))
    }

    /// Blocking client with the headers the upstream API expects
    pub fn default_client(timeout: Duration) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(APP_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ProvisionError::fetch("<client>", e))
    }

    pub fn latest_release_url(&self) -> String {
        format!("{}/repos/{}/releases/latest", self.api_base, self.repo)
    }

    pub fn tag_ref_url(&self, tag_name: &str) -> String {
        format!(
            "{}/repos/{}/git/ref/tags/{}",
            self.api_base, self.repo, tag_name
        )
    }

    pub fn tag_object_url(&self, sha: &str) -> String {
        format!("{}/repos/{}/git/tags/{}", self.api_base, self.repo, sha)
    }

    /// Fetches the raw body of the latest release.
    ///
    /// Transport and HTTP status failures are logged and reported as `None`.
    pub fn fetch_latest_metadata(&self) -> Option<String> {
        let url = self.latest_release_url();
        match self.get_text(&url) {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(%url, error = %e, "could not fetch latest release");
                None
            }
        }
    }

    /// GETs `url` and decodes the body as JSON.
    ///
    /// # Returns
    /// * `Err(FetchError)` - Transport failure or non-2xx status
    /// * `Err(DecodeError)` - Body is not JSON of the expected shape
    pub fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get_text(url)?;
        serde_json::from_str(&body).map_err(|source| ProvisionError::DecodeError {
            url: url.to_string(),
            source,
        })
    }

    fn get_text(&self, url: &str) -> Result<String> {
        debug!(%url, "GET");
        self.client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|e| ProvisionError::fetch(url, e))
    }
}
