use crate::config::Config;
use crate::headers;
use crate::types::BackendReply;
use crate::{RecommenderError, Result};
use http_client::{HttpClient, Request};
use http_types::{Method, Url};
use serde::Serialize;
use std::sync::Arc;

/// A response from the backend with its body already read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub status: u16,
    pub body: String,
}

impl BackendResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thin JSON transport to the recommendation backend.
///
/// Shared by the account and recommendation clients. It owns the backend
/// base URL check and the transport-level half of error classification:
/// a request that never got a response becomes
/// [`RecommenderError::Transport`], a response whose body cannot be read
/// becomes [`RecommenderError::Unknown`].
///
/// # Examples
///
/// ```rust,no_run
/// use antirecommender::{BackendClient, Config};
/// use std::sync::Arc;
///
/// let config = Config::default().with_backend_url("http://localhost:8000");
/// let http_client = http_client::native::NativeClient::new();
/// let backend = BackendClient::from_config(Arc::new(http_client), &config);
/// assert_eq!(backend.base_url(), Some("http://localhost:8000"));
/// ```
#[derive(Clone)]
pub struct BackendClient {
    client: Arc<dyn HttpClient>,
    base_url: Option<String>,
}

impl BackendClient {
    /// Create a client; `base_url` of `None` makes every request fail with a
    /// configuration error.
    pub fn new(client: Arc<dyn HttpClient>, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        Self { client, base_url }
    }

    pub fn from_config(client: Arc<dyn HttpClient>, config: &Config) -> Self {
        Self::new(client, config.backend_url().map(str::to_string))
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| RecommenderError::Config("a backend server url".to_string()))?;

        format!("{base}{path}")
            .parse::<Url>()
            .map_err(|e| RecommenderError::Config(format!("a valid backend server url ({e})")))
    }

    /// POST `body` as JSON to `{backend}{path}` and read the response.
    ///
    /// Any status is returned as-is; deciding what a non-2xx status means is
    /// up to the caller.
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<BackendResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let payload = serde_json::to_string(body)
            .map_err(|e| RecommenderError::Unknown(format!("could not encode request: {e}")))?;

        let mut request = Request::new(Method::Post, url);
        headers::add_json_headers(&mut request);
        request.set_body(payload);

        log::debug!("POST {path}");
        let mut response = self
            .client
            .send(request)
            .await
            .map_err(|e| RecommenderError::Transport(e.to_string()))?;

        let status: u16 = response.status().into();
        let body = response
            .body_string()
            .await
            .map_err(|e| RecommenderError::Unknown(format!("unreadable response body: {e}")))?;

        log::debug!("POST {path} answered {status}");
        Ok(BackendResponse { status, body })
    }
}

/// Classify a failed (non-2xx) backend response.
///
/// A `{ "detail": string }` body becomes [`RecommenderError::Backend`] with the
/// detail verbatim; anything else is [`RecommenderError::Unknown`].
pub fn classify_failure(response: &BackendResponse) -> RecommenderError {
    match BackendReply::parse_api_error(&response.body) {
        Some(error) => RecommenderError::backend(response.status, error.detail),
        None => RecommenderError::Unknown(format!("status {}", response.status)),
    }
}
