//! Data types exchanged with the backend and the music service.
//!
//! This module contains the wire shapes of the recommendation API (songs,
//! recommendations and error bodies), the discriminated parse of backend
//! replies, and the music-service access token that is forwarded to the
//! backend.

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};

/// Artwork shown for songs the backend sent without an image.
pub const DEFAULT_ARTWORK: &str = "https://www.pngmart.com/files/8/Compact-Disk-PNG-HD-Photo.png";

// ================================================================================================
// RECOMMENDATION PAYLOAD
// ================================================================================================

/// A track as described by the backend.
///
/// # Examples
///
/// ```rust
/// use antirecommender::{Song, DEFAULT_ARTWORK};
///
/// let song = Song {
///     id: "4uLU6hMCjMI75M1A2tKUQC".to_string(),
///     name: "Never Gonna Give You Up".to_string(),
///     image: None,
/// };
///
/// assert_eq!(song.artwork(), DEFAULT_ARTWORK);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Song {
    /// Track identifier (empty when the backend does not send one)
    #[serde(default)]
    pub id: String,
    /// The track name
    pub name: String,
    /// Cover art URL, if the backend has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Song {
    /// The image to display, falling back to [`DEFAULT_ARTWORK`].
    pub fn artwork(&self) -> &str {
        self.image
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_ARTWORK)
    }
}

impl std::fmt::Display for Song {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A recommendation plus the listening history that justifies it.
///
/// `is_random` is decided by the backend alone: it is `true` when none of the
/// user's recent songs were found in the backend's dataset and an arbitrary
/// song was picked instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommender {
    pub is_random: bool,
    /// Recent listening history, most recent first, in backend order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub from_songs: Vec<Song>,
    pub recommended: Song,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Song>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Song>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The backend's error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub detail: String,
}

/// A backend response body, classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendReply {
    Recommendation(Recommender),
    Error(ApiError),
    /// Neither shape matched
    Unexpected,
}

impl BackendReply {
    /// Classify a response body.
    ///
    /// An object carrying a boolean `isRandom` must parse completely as a
    /// [`Recommender`]; a half-valid recommendation is reported as
    /// [`BackendReply::Unexpected`] rather than passed through.
    pub fn parse(body: &str) -> Self {
        let value: serde_json::Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(_) => return Self::Unexpected,
        };

        let Some(object) = value.as_object() else {
            return Self::Unexpected;
        };

        if object.get("isRandom").is_some_and(|v| v.is_boolean()) {
            return match serde_json::from_value::<Recommender>(value) {
                Ok(recommender) => Self::Recommendation(recommender),
                Err(e) => {
                    log::debug!("Body looked like a recommendation but failed to parse: {e}");
                    Self::Unexpected
                }
            };
        }

        if object.get("detail").is_some_and(|v| v.is_string()) {
            if let Ok(error) = serde_json::from_value::<ApiError>(value) {
                return Self::Error(error);
            }
        }

        Self::Unexpected
    }

    /// Only recognise the `{ "detail": string }` envelope.
    pub fn parse_api_error(body: &str) -> Option<ApiError> {
        match Self::parse(body) {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }
}

// ================================================================================================
// MUSIC SERVICE TOKEN
// ================================================================================================

/// Access token obtained from the music service's PKCE flow.
///
/// The backend receives this object as-is on `/recommend`, so the field names
/// follow the service's token response. `expires` is the absolute expiry in
/// epoch milliseconds, computed when the token is received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub expires: i64,
}

impl AccessToken {
    /// Fill in `expires` from `expires_in`, counting from now.
    ///
    /// Out-of-range lifetimes saturate instead of overflowing.
    pub fn stamped(mut self) -> Self {
        self.expires = Utc::now()
            .timestamp_millis()
            .saturating_add(self.expires_in.saturating_mul(1000));
        self
    }

    pub fn is_expired(&self) -> bool {
        self.expires <= Utc::now().timestamp_millis()
    }

    pub fn can_refresh(&self) -> bool {
        !self.refresh_token.is_empty()
    }

    /// Serialize token to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize token from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
