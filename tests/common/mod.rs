#![allow(dead_code)]
use antirecommender::{AccessToken, Config, Session};
use http_client::HttpClient;
use http_types::{Error, Request, Response, StatusCode};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const BACKEND_URL: &str = "http://backend.test";
pub const ACCOUNTS_URL: &str = "http://accounts.test";
pub const FRONTEND_URL: &str = "http://localhost:5173/";
pub const CLIENT_ID: &str = "test-client-id";

/// A request the fake client received, with its body already read.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body should be JSON")
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Reply(u16, String),
    Fail(String),
}

/// HTTP client answering from a per-path script, recording everything sent.
///
/// Paths without a scripted answer fail like an unreachable host.
#[derive(Debug, Default)]
pub struct FakeHttpClient {
    script: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response for the next request to `path`.
    pub fn reply(&self, path: &str, status: u16, body: &str) {
        self.push(path, Scripted::Reply(status, body.to_string()));
    }

    /// Queue a connection failure for the next request to `path`.
    pub fn fail(&self, path: &str, message: &str) {
        self.push(path, Scripted::Fail(message.to_string()));
    }

    fn push(&self, path: &str, scripted: Scripted) {
        self.script
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(scripted);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.ends_with(path))
            .collect()
    }
}

#[async_trait::async_trait]
impl HttpClient for FakeHttpClient {
    async fn send(&self, mut req: Request) -> Result<Response, Error> {
        let path = req.url().path().to_string();
        let body = req.body_string().await?;
        self.requests.lock().unwrap().push(RecordedRequest {
            method: req.method().to_string(),
            url: req.url().to_string(),
            content_type: req.content_type().map(|mime| mime.essence().to_string()),
            body,
        });

        let next = self
            .script
            .lock()
            .unwrap()
            .get_mut(&path)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Scripted::Reply(status, body)) => {
                let mut response = Response::new(status);
                response.set_body(body);
                Ok(response)
            }
            Some(Scripted::Fail(message)) => Err(Error::from_str(StatusCode::BadGateway, message)),
            None => Err(Error::from_str(
                StatusCode::BadGateway,
                format!("connection refused: {path}"),
            )),
        }
    }
}

/// Configuration pointing every host at the fake client.
pub fn test_config() -> Config {
    Config::default()
        .with_backend_url(BACKEND_URL)
        .with_client(CLIENT_ID, FRONTEND_URL)
        .with_accounts_url(ACCOUNTS_URL)
}

pub fn as_http_client(fake: &Arc<FakeHttpClient>) -> Arc<dyn HttpClient> {
    fake.clone()
}

/// A token response as the accounts host sends it.
pub const TOKEN_RESPONSE: &str = r#"{
    "access_token": "BQD-access",
    "token_type": "Bearer",
    "expires_in": 3600,
    "refresh_token": "AQB-refresh",
    "scope": "user-read-recently-played user-read-playback-position"
}"#;

pub fn valid_token() -> AccessToken {
    AccessToken::from_json(TOKEN_RESPONSE).unwrap().stamped()
}

pub fn expired_token() -> AccessToken {
    AccessToken {
        expires: 1,
        ..AccessToken::from_json(TOKEN_RESPONSE).unwrap()
    }
}

pub fn personalized_body(song_count: usize) -> String {
    let songs: Vec<serde_json::Value> = (1..=song_count)
        .map(|i| serde_json::json!({ "id": i.to_string(), "name": format!("Song {i}") }))
        .collect();
    serde_json::json!({
        "isRandom": false,
        "fromSongs": songs,
        "recommended": { "id": "r", "name": "Obscure Polka", "image": "https://img/r.png" }
    })
    .to_string()
}

pub const RANDOM_BODY: &str = r#"{
    "isRandom": true,
    "fromSongs": [{"name": "Mainstream Hit"}],
    "recommended": {"name": "Random Noise"}
}"#;

/// Session that already went through registration and authorization.
pub fn authenticated_session() -> Session {
    let session = Session::in_memory();
    session.record_backend_account("listener@example.com").unwrap();
    session.store_service_token(&valid_token()).unwrap();
    session
}
