use antirecommender::{AccountClient, AuthOrchestrator, BackendClient, Config, FileStore, Session};
use http_client::HttpClient;
use std::sync::Arc;

/// Everything a command needs: settings, the persisted session and an HTTP client.
pub struct AppContext {
    pub config: Config,
    pub session: Session,
    pub http_client: Arc<dyn HttpClient>,
}

impl AppContext {
    /// Open the session file (the configured one, or the default under the
    /// XDG data directory) and create the native HTTP client.
    pub fn load(config: Config) -> antirecommender::Result<Self> {
        let store = match &config.antirecommender_session_file {
            Some(path) => FileStore::open(path.clone())?,
            None => FileStore::open_default()?,
        };
        log::debug!("Using session file {}", store.path().display());

        Ok(Self {
            config,
            session: Session::new(Arc::new(store)),
            http_client: Arc::new(http_client::native::NativeClient::new()),
        })
    }

    pub fn account_client(&self) -> AccountClient {
        let backend = BackendClient::from_config(self.http_client.clone(), &self.config);
        AccountClient::new(backend, self.session.clone())
    }

    pub fn orchestrator(&self) -> AuthOrchestrator {
        AuthOrchestrator::from_config(self.http_client.clone(), self.session.clone(), &self.config)
    }
}

/// Label of the start button: returning users skip straight to the login.
pub fn start_label(session: &Session) -> &'static str {
    if session.has_backend_account() {
        "Start!"
    } else {
        "Log In"
    }
}
