use crate::pkce::{AuthProgress, CallbackParams};
use crate::{AccessToken, Recommender, Result};
use async_trait::async_trait;

/// Registers a user's contact address with the backend.
///
/// # Mocking Support
///
/// When the `mock` feature is enabled, this crate provides
/// `MockAccountRegistry` implemented with the `mockall` library.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait(?Send)]
pub trait AccountRegistry {
    /// Allow-list `email` with the backend and record it in the session.
    async fn register(&self, email: &str) -> Result<()>;
}

/// Source of recommendations for an authorized music-service user.
///
/// When the `mock` feature is enabled, `MockRecommendationSource` is available.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait(?Send)]
pub trait RecommendationSource {
    /// Exchange the user's music-service token for a recommendation.
    async fn fetch_recommendation(&self, token: &AccessToken) -> Result<Recommender>;
}

/// The music service's redirect-based authorization flow.
///
/// This is the seam between the orchestrator and the authorization library.
/// A flow either asks for a browser navigation ([`AuthProgress::Redirect`])
/// or completes, handing over the token it obtained. Completing without a
/// token means the library never invoked its callback.
///
/// When the `mock` feature is enabled, `MockAuthorizationFlow` is available.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait(?Send)]
pub trait AuthorizationFlow {
    /// Advance the flow, given the parameters of the redirect back to the
    /// app when there was one.
    async fn authorize(&self, callback: Option<CallbackParams>) -> Result<AuthProgress>;

    /// Whether the flow currently holds a usable token.
    fn is_authenticated(&self) -> bool;
}
