pub mod account;
pub mod auth;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod headers;
pub mod pager;
pub mod pkce;
pub mod presentation;
pub mod recommender;
pub mod session;
pub mod store;
pub mod traits;
pub mod types;
pub mod view;

pub use account::AccountClient;
pub use auth::{AuthOrchestrator, LoginStep};
pub use client::{BackendClient, BackendResponse};
pub use config::Config;
pub use envelope::ResultEnvelope;
pub use error::{BackendErrorKind, RecommenderError};
pub use pager::{Pager, DEFAULT_PAGE_SIZE};
pub use pkce::{AuthProgress, AuthRedirect, CallbackParams, PkceAuthorizer};
pub use presentation::RecommendationView;
pub use recommender::RecommendationClient;
pub use session::{Route, Session};
pub use store::{FileStore, MemoryStore, SessionStore};
pub use traits::{AccountRegistry, AuthorizationFlow, RecommendationSource};
pub use types::{AccessToken, ApiError, BackendReply, Recommender, Song, DEFAULT_ARTWORK};
pub use view::{LoginScreen, RecommendationsScreen, Screen, ViewState};

#[cfg(feature = "mock")]
pub use traits::{MockAccountRegistry, MockAuthorizationFlow, MockRecommendationSource};

pub type Result<T> = std::result::Result<T, RecommenderError>;
