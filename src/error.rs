use std::fmt;
use thiserror::Error;

/// Error types for Anti-Recommender client operations.
///
/// Every variant renders a message meant to be shown to the person using the
/// app. The view layer never sees anything but this text, so each message is
/// complete on its own.
///
/// # Error Handling Examples
///
/// ```rust,no_run
/// use antirecommender::{AccountRegistry, RecommenderError};
///
/// async fn sign_up(accounts: &dyn AccountRegistry) {
///     match accounts.register("listener@example.com").await {
///         Ok(()) => println!("Registered"),
///         Err(RecommenderError::Config(setting)) => eprintln!("Misconfigured: {setting}"),
///         Err(RecommenderError::Backend { detail, .. }) => eprintln!("Backend said: {detail}"),
///         Err(e) => eprintln!("{e}"),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum RecommenderError {
    /// A required deployment setting is missing.
    ///
    /// Never retried. The payload names the missing setting.
    #[error("The person who deployed the app didn't specify {0}. Please contact them.")]
    Config(String),

    /// The backend could not be reached at all.
    ///
    /// This includes connection failures, DNS errors and timeouts reported
    /// by the underlying HTTP client.
    #[error("We couldn't contact the backend API. Error: {0}")]
    Transport(String),

    /// The backend answered with a structured `{ "detail": ... }` error body.
    #[error("{kind} She says: {detail}")]
    Backend {
        /// HTTP status of the failed response
        status: u16,
        /// Category derived from the status, for clearer diagnostics
        kind: BackendErrorKind,
        /// The backend's own explanation, verbatim
        detail: String,
    },

    /// The backend answered with a body matching neither expected schema.
    #[error("The API returned something that we didn't expect.")]
    UnexpectedShape,

    /// The authorization flow finished without handing over a token, or
    /// otherwise misbehaved.
    #[error("The music service login didn't go as expected: {0}")]
    Integration(String),

    /// The user declined access, or the flow reports not being authenticated.
    #[error("The music service refused the login: {0}")]
    AuthRefused(String),

    /// Anything the classification above does not cover.
    #[error("We don't know what went bad. Sorry for that ({0})")]
    Unknown(String),

    /// The session store could not be read or written.
    #[error("Could not access the saved session: {0}")]
    Storage(String),
}

/// Category of a structured backend failure, picked from the HTTP status.
///
/// This is a presentation aid only: every kind is an error all the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// The request was rejected as malformed (400, 422)
    Validation,
    /// The backend found its own data inconsistent (409, 500)
    ServerInconsistency,
    /// The backend failed talking to the music service (502, 503, 504)
    UpstreamIntegration,
    /// Any other status
    Other,
}

impl BackendErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::Validation,
            409 | 500 => Self::ServerInconsistency,
            502..=504 => Self::UpstreamIntegration,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Validation => "The API rejected what we sent.",
            Self::ServerInconsistency => "The API found something inconsistent on its side.",
            Self::UpstreamIntegration => "The API couldn't talk to the music service.",
            Self::Other => "The API says we did something bad :(.",
        };
        f.write_str(text)
    }
}

impl RecommenderError {
    /// Build a structured backend error, categorising it by status.
    pub fn backend(status: u16, detail: impl Into<String>) -> Self {
        Self::Backend {
            status,
            kind: BackendErrorKind::from_status(status),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_categories() {
        assert_eq!(BackendErrorKind::from_status(422), BackendErrorKind::Validation);
        assert_eq!(BackendErrorKind::from_status(400), BackendErrorKind::Validation);
        assert_eq!(
            BackendErrorKind::from_status(500),
            BackendErrorKind::ServerInconsistency
        );
        assert_eq!(
            BackendErrorKind::from_status(503),
            BackendErrorKind::UpstreamIntegration
        );
        assert_eq!(BackendErrorKind::from_status(418), BackendErrorKind::Other);
    }

    #[test]
    fn test_backend_message_embeds_detail() {
        let err = RecommenderError::backend(401, "bad token");
        let message = err.to_string();
        assert!(message.contains("bad token"));
        assert!(message.starts_with("The API says we did something bad"));
        assert_eq!(message.matches("The API says").count(), 1);
    }

    #[test]
    fn test_config_message_names_setting() {
        let err = RecommenderError::Config("a backend url".to_string());
        assert!(err.to_string().contains("a backend url"));
    }
}
