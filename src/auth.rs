use crate::config::Config;
use crate::pkce::{AuthProgress, AuthRedirect, CallbackParams, PkceAuthorizer};
use crate::session::Session;
use crate::traits::{AuthorizationFlow, RecommendationSource};
use crate::{Recommender, RecommenderError, Result};
use http_client::HttpClient;
use std::sync::Arc;

/// Where a login attempt ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginStep {
    /// The browser has to visit the music service first
    Redirect(AuthRedirect),
    /// Authorized, and the backend answered with a recommendation
    Recommended(Recommender),
}

/// Drives the music-service authorization and hands the token on to the
/// recommendation source.
///
/// # Examples
///
/// ```rust,no_run
/// use antirecommender::{AuthOrchestrator, BackendClient, Config, LoginStep, Session};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let config = Config::from_env()?;
/// let http_client: Arc<dyn http_client::HttpClient> =
///     Arc::new(http_client::native::NativeClient::new());
/// let session = Session::in_memory();
/// let orchestrator = AuthOrchestrator::from_config(http_client, session, &config);
///
/// match orchestrator.login(None).await? {
///     LoginStep::Redirect(redirect) => println!("Open {}", redirect.url),
///     LoginStep::Recommended(rec) => println!("Listen to {}", rec.recommended.name),
/// }
/// # Ok::<(), antirecommender::RecommenderError>(())
/// # });
/// ```
pub struct AuthOrchestrator {
    flow: Option<Arc<dyn AuthorizationFlow>>,
    recommendations: Arc<dyn RecommendationSource>,
}

impl AuthOrchestrator {
    /// `flow` is `None` when the deployment lacks the music-service settings;
    /// every login then fails with a configuration error.
    pub fn new(
        flow: Option<Arc<dyn AuthorizationFlow>>,
        recommendations: Arc<dyn RecommendationSource>,
    ) -> Self {
        Self {
            flow,
            recommendations,
        }
    }

    /// Wire the PKCE flow and the backend recommendation client from config.
    pub fn from_config(client: Arc<dyn HttpClient>, session: Session, config: &Config) -> Self {
        let flow = match PkceAuthorizer::from_config(client.clone(), session, config) {
            Ok(authorizer) => Some(Arc::new(authorizer) as Arc<dyn AuthorizationFlow>),
            Err(e) => {
                log::warn!("Music service login unavailable: {e}");
                None
            }
        };
        let backend = crate::BackendClient::from_config(client, config);
        let recommendations = Arc::new(crate::RecommendationClient::new(backend));
        Self::new(flow, recommendations)
    }

    /// Run one login attempt.
    ///
    /// `callback` holds the parameters of the redirect back from the music
    /// service, when the app was reached that way. The token the flow hands
    /// over is forwarded to the recommendation source exactly once.
    pub async fn login(&self, callback: Option<CallbackParams>) -> Result<LoginStep> {
        let flow = self.flow.as_ref().ok_or_else(|| {
            RecommenderError::Config("a music service client id or frontend url".to_string())
        })?;

        let token = match flow.authorize(callback).await? {
            AuthProgress::Redirect(redirect) => {
                log::debug!("Login needs a redirect to the music service");
                return Ok(LoginStep::Redirect(redirect));
            }
            AuthProgress::Completed(Some(token)) => token,
            AuthProgress::Completed(None) => {
                return Err(RecommenderError::Integration(
                    "the authorization finished without handing over a token".to_string(),
                ));
            }
        };

        if !flow.is_authenticated() {
            return Err(RecommenderError::AuthRefused(
                "the music service doesn't consider you logged in".to_string(),
            ));
        }

        let recommender = self.recommendations.fetch_recommendation(&token).await?;
        Ok(LoginStep::Recommended(recommender))
    }
}
