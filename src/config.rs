use crate::{RecommenderError, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Accounts host of the music service.
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Deployment settings, read from the environment at runtime.
///
/// Every value is optional here: a missing setting is only an error for the
/// operation that needs it, reported as [`RecommenderError::Config`] rather
/// than failing at startup. Empty strings count as missing.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the recommendation backend (`BACKEND_URL`)
    #[serde(default)]
    pub backend_url: Option<String>,

    /// Music-service application client id (`SPOTIFY_CLIENT_ID`)
    #[serde(default)]
    pub spotify_client_id: Option<String>,

    /// Where the music service redirects back to (`FRONTEND_URL`)
    #[serde(default)]
    pub frontend_url: Option<String>,

    /// Accounts host override (`SPOTIFY_ACCOUNTS_URL`)
    #[serde(default = "default_accounts_url")]
    pub spotify_accounts_url: String,

    /// Session file override (`ANTIRECOMMENDER_SESSION_FILE`)
    #[serde(default)]
    pub antirecommender_session_file: Option<PathBuf>,
}

fn default_accounts_url() -> String {
    DEFAULT_ACCOUNTS_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: None,
            spotify_client_id: None,
            frontend_url: None,
            spotify_accounts_url: default_accounts_url(),
            antirecommender_session_file: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, honouring a `.env` file.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>()
            .map_err(|e| RecommenderError::Config(format!("a readable configuration ({e})")))
    }

    pub fn backend_url(&self) -> Option<&str> {
        non_empty(&self.backend_url)
    }

    pub fn client_id(&self) -> Option<&str> {
        non_empty(&self.spotify_client_id)
    }

    pub fn redirect_url(&self) -> Option<&str> {
        non_empty(&self.frontend_url)
    }

    pub fn accounts_url(&self) -> &str {
        self.spotify_accounts_url.trim_end_matches('/')
    }

    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = Some(url.into());
        self
    }

    pub fn with_client(mut self, client_id: impl Into<String>, redirect_url: impl Into<String>) -> Self {
        self.spotify_client_id = Some(client_id.into());
        self.frontend_url = Some(redirect_url.into());
        self
    }

    pub fn with_accounts_url(mut self, url: impl Into<String>) -> Self {
        self.spotify_accounts_url = url.into();
        self
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_count_as_missing() {
        let config = Config {
            backend_url: Some("  ".to_string()),
            spotify_client_id: Some(String::new()),
            ..Config::default()
        };
        assert_eq!(config.backend_url(), None);
        assert_eq!(config.client_id(), None);
        assert_eq!(config.redirect_url(), None);
        assert_eq!(config.accounts_url(), DEFAULT_ACCOUNTS_URL);
    }

    #[test]
    fn test_builders() {
        let config = Config::default()
            .with_backend_url("http://localhost:8000")
            .with_client("client", "http://localhost:5173")
            .with_accounts_url("http://accounts.test/");
        assert_eq!(config.backend_url(), Some("http://localhost:8000"));
        assert_eq!(config.client_id(), Some("client"));
        assert_eq!(config.redirect_url(), Some("http://localhost:5173"));
        assert_eq!(config.accounts_url(), "http://accounts.test");
    }
}
