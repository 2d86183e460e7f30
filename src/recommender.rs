use crate::client::{classify_failure, BackendClient};
use crate::traits::RecommendationSource;
use crate::types::{AccessToken, BackendReply, Recommender};
use crate::{RecommenderError, Result};
use async_trait::async_trait;

/// Client for the backend's recommendation endpoint (`POST /recommend`).
///
/// Each call is exactly one request; nothing is cached between calls.
pub struct RecommendationClient {
    backend: BackendClient,
}

impl RecommendationClient {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

#[async_trait(?Send)]
impl RecommendationSource for RecommendationClient {
    async fn fetch_recommendation(&self, token: &AccessToken) -> Result<Recommender> {
        let response = self.backend.post_json("/recommend", token).await?;

        match BackendReply::parse(&response.body) {
            BackendReply::Recommendation(recommender) if response.is_success() => {
                log::info!(
                    "Received {} recommendation based on {} songs",
                    if recommender.is_random { "a random" } else { "a" },
                    recommender.from_songs.len()
                );
                Ok(recommender)
            }
            BackendReply::Error(error) => {
                Err(RecommenderError::backend(response.status, error.detail))
            }
            _ if !response.is_success() => Err(classify_failure(&response)),
            _ => Err(RecommenderError::UnexpectedShape),
        }
    }
}
