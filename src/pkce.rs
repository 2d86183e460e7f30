//! Authorization-code flow with PKCE against the music service.
//!
//! The flow is split in two phases around the browser navigation:
//!
//! 1. [`PkceAuthorizer::begin_auth`] generates a verifier, stores it in the
//!    session and returns the authorize URL to navigate to.
//! 2. After the service redirects back, [`PkceAuthorizer::complete_auth`]
//!    exchanges the returned code plus the stored verifier for a token.
//!
//! Everything that has to survive the navigation lives in the session store.

use crate::config::Config;
use crate::headers;
use crate::session::Session;
use crate::traits::AuthorizationFlow;
use crate::types::AccessToken;
use crate::{RecommenderError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use http_client::{HttpClient, Request};
use http_types::{Method, Url};
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Scopes needed to read the user's recent listening history.
pub const SCOPES: &[&str] = &["user-read-recently-played", "user-read-playback-position"];

const VERIFIER_LENGTH: usize = 64;

/// Where to send the browser to start authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthRedirect {
    pub url: String,
}

/// Query parameters of the redirect back from the music service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Extract `code` / `error` from the URL the browser was redirected to.
    pub fn from_redirect_url(url: &str) -> Result<Self> {
        let url = url.trim().parse::<Url>().map_err(|e| {
            RecommenderError::Integration(format!("the redirect url is unreadable ({e})"))
        })?;

        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => params.code = Some(value.into_owned()),
                "error" => params.error = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(params)
    }

    /// The redirect carried neither a code nor an error.
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.error.is_none()
    }
}

/// State of the flow after one [`AuthorizationFlow::authorize`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthProgress {
    /// The browser must navigate away; nothing to show yet
    Redirect(AuthRedirect),
    /// The flow finished; `None` when no token was ever handed over
    Completed(Option<AccessToken>),
}

#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Random code verifier made of unreserved characters.
pub fn generate_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(VERIFIER_LENGTH)
        .map(char::from)
        .collect()
}

/// S256 code challenge: base64url (no padding) of the verifier's SHA-256.
pub fn challenge_for(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// PKCE authorization against the music service's accounts host.
pub struct PkceAuthorizer {
    client: Arc<dyn HttpClient>,
    session: Session,
    client_id: String,
    redirect_url: String,
    accounts_url: String,
}

impl PkceAuthorizer {
    pub fn new(
        client: Arc<dyn HttpClient>,
        session: Session,
        client_id: String,
        redirect_url: String,
        accounts_url: String,
    ) -> Self {
        Self {
            client,
            session,
            client_id,
            redirect_url,
            accounts_url: accounts_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the authorizer, failing when the client id or redirect URL is
    /// not configured.
    pub fn from_config(client: Arc<dyn HttpClient>, session: Session, config: &Config) -> Result<Self> {
        match (config.client_id(), config.redirect_url()) {
            (Some(client_id), Some(redirect_url)) => Ok(Self::new(
                client,
                session,
                client_id.to_string(),
                redirect_url.to_string(),
                config.accounts_url().to_string(),
            )),
            _ => Err(RecommenderError::Config(
                "a music service client id or frontend url".to_string(),
            )),
        }
    }

    /// Phase one: remember a fresh verifier and build the authorize URL.
    pub fn begin_auth(&self) -> Result<AuthRedirect> {
        let verifier = generate_verifier();
        let challenge = challenge_for(&verifier);
        self.session.store_verifier(&verifier)?;

        let scope = SCOPES.join(" ");
        let url = Url::parse_with_params(
            &format!("{}/authorize", self.accounts_url),
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_url.as_str()),
                ("scope", scope.as_str()),
                ("code_challenge_method", "S256"),
                ("code_challenge", challenge.as_str()),
            ],
        )
        .map_err(|e| RecommenderError::Config(format!("a valid accounts url ({e})")))?;

        log::debug!("Authorization redirect prepared");
        Ok(AuthRedirect { url: url.into() })
    }

    /// Phase two: exchange the code from the redirect for a token.
    ///
    /// The token is stored in the session and the verifier discarded.
    pub async fn complete_auth(&self, params: &CallbackParams) -> Result<AccessToken> {
        if let Some(error) = &params.error {
            self.session.clear_verifier()?;
            return Err(RecommenderError::AuthRefused(error.clone()));
        }

        let code = params.code.as_deref().ok_or_else(|| {
            RecommenderError::Integration("the redirect carried no authorization code".to_string())
        })?;

        let verifier = self.session.pending_verifier().ok_or_else(|| {
            RecommenderError::Integration("there is no pending authorization to complete".to_string())
        })?;

        let token = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_url.as_str()),
                ("client_id", self.client_id.as_str()),
                ("code_verifier", verifier.as_str()),
            ])
            .await?;

        self.session.store_service_token(&token)?;
        self.session.clear_verifier()?;
        log::info!("Authorized with the music service");
        Ok(token)
    }

    /// Trade the refresh token of an expired token for a new one.
    pub async fn refresh(&self, expired: &AccessToken) -> Result<AccessToken> {
        let mut token = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", expired.refresh_token.as_str()),
                ("client_id", self.client_id.as_str()),
            ])
            .await?;

        // The service may omit the refresh token when it does not rotate it
        if token.refresh_token.is_empty() {
            token.refresh_token = expired.refresh_token.clone();
        }

        self.session.store_service_token(&token)?;
        log::info!("Refreshed the music service token");
        Ok(token)
    }

    async fn request_token(&self, fields: &[(&str, &str)]) -> Result<AccessToken> {
        let url = format!("{}/api/token", self.accounts_url)
            .parse::<Url>()
            .map_err(|e| RecommenderError::Config(format!("a valid accounts url ({e})")))?;

        let mut request = Request::new(Method::Post, url);
        headers::add_form_headers(&mut request);
        request.set_body(headers::encode_form(fields));

        let mut response = self.client.send(request).await.map_err(|e| {
            RecommenderError::Integration(format!("could not reach the music service ({e})"))
        })?;

        let status: u16 = response.status().into();
        let body = response.body_string().await.map_err(|e| {
            RecommenderError::Integration(format!("unreadable token response ({e})"))
        })?;

        log::debug!("Token endpoint answered {status}");

        if !(200..300).contains(&status) {
            return Err(match serde_json::from_str::<TokenErrorBody>(&body) {
                Ok(error) if status == 400 || status == 401 => RecommenderError::AuthRefused(
                    error.error_description.unwrap_or(error.error),
                ),
                Ok(error) => RecommenderError::Integration(format!(
                    "token endpoint failed with {status}: {}",
                    error.error
                )),
                Err(_) => RecommenderError::Integration(format!(
                    "token endpoint failed with {status}"
                )),
            });
        }

        AccessToken::from_json(&body)
            .map(AccessToken::stamped)
            .map_err(|e| RecommenderError::Integration(format!("unreadable token response ({e})")))
    }
}

#[async_trait(?Send)]
impl AuthorizationFlow for PkceAuthorizer {
    async fn authorize(&self, callback: Option<CallbackParams>) -> Result<AuthProgress> {
        if let Some(params) = callback.as_ref().filter(|p| !p.is_empty()) {
            let token = self.complete_auth(params).await?;
            return Ok(AuthProgress::Completed(Some(token)));
        }

        if let Some(token) = self.session.service_token() {
            if !token.is_expired() {
                return Ok(AuthProgress::Completed(Some(token)));
            }
            if token.can_refresh() {
                match self.refresh(&token).await {
                    Ok(token) => return Ok(AuthProgress::Completed(Some(token))),
                    Err(e) => log::warn!("Token refresh failed, starting over: {e}"),
                }
            }
            self.session.forget_service_auth()?;
        }

        if callback.is_some() {
            // Came back from the service without a code or an error
            return Ok(AuthProgress::Completed(None));
        }

        Ok(AuthProgress::Redirect(self.begin_auth()?))
    }

    fn is_authenticated(&self) -> bool {
        self.session
            .service_token()
            .is_some_and(|token| !token.is_expired())
    }
}
