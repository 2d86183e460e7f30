use crate::client::{classify_failure, BackendClient};
use crate::session::Session;
use crate::traits::AccountRegistry;
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;

#[derive(Serialize)]
struct MailPetition<'a> {
    mail: &'a str,
}

/// Client for the backend's user allow-list (`POST /user`).
pub struct AccountClient {
    backend: BackendClient,
    session: Session,
}

impl AccountClient {
    pub fn new(backend: BackendClient, session: Session) -> Self {
        Self { backend, session }
    }
}

#[async_trait(?Send)]
impl AccountRegistry for AccountClient {
    /// Register `email` with the backend.
    ///
    /// The email is recorded as the session's backend account only when the
    /// backend accepted it. A missing backend URL fails before any request.
    async fn register(&self, email: &str) -> Result<()> {
        let response = self
            .backend
            .post_json("/user", &MailPetition { mail: email })
            .await?;

        if !response.is_success() {
            log::info!("Registration rejected with status {}", response.status);
            return Err(classify_failure(&response));
        }

        self.session.record_backend_account(email)?;
        log::info!("Registered {email} with the backend");
        Ok(())
    }
}
