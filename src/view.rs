//! Per-screen state machines.
//!
//! Each screen moves `Idle → Loading → Success | Error` exactly once per
//! mount. Going back from `Error` clears the session facts, going back from
//! `Success` keeps them.

use crate::auth::{AuthOrchestrator, LoginStep};
use crate::pager::{Pager, DEFAULT_PAGE_SIZE};
use crate::pkce::{AuthRedirect, CallbackParams};
use crate::presentation::RecommendationView;
use crate::session::Session;
use crate::traits::AccountRegistry;
use crate::{Recommender, Result};
use std::future::Future;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> ViewState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }
}

/// One screen's state machine.
#[derive(Debug)]
pub struct Screen<T> {
    state: ViewState<T>,
}

impl<T> Default for Screen<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Screen<T> {
    pub fn new() -> Self {
        Self {
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// Start `operation` if the screen is idle and record its outcome.
    ///
    /// A screen that already started (or finished) ignores further loads
    /// without calling `operation`; re-running requires [`Screen::go_back`]
    /// first.
    pub async fn load<F, Fut>(&mut self, operation: F) -> &ViewState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !self.state.is_idle() {
            log::debug!("Screen already mounted, ignoring load");
            return &self.state;
        }

        self.state = ViewState::Loading;
        self.resolve(operation().await);
        &self.state
    }

    fn resolve(&mut self, outcome: Result<T>) {
        self.state = match outcome {
            Ok(value) => ViewState::Success(value),
            Err(e) => {
                log::info!("Screen failed: {e}");
                ViewState::Error(e.to_string())
            }
        };
    }

    /// Leave a finished screen.
    ///
    /// From `Error` this also logs out; from `Success` the session is kept.
    /// Does nothing while `Idle` or `Loading`.
    pub fn go_back(&mut self, session: &Session) -> Result<()> {
        match self.state {
            ViewState::Error(_) => {
                session.logout()?;
                self.state = ViewState::Idle;
            }
            ViewState::Success(_) => self.state = ViewState::Idle,
            ViewState::Idle | ViewState::Loading => {}
        }
        Ok(())
    }
}

/// Registration screen: asks for the email to allow-list.
#[derive(Debug, Default)]
pub struct LoginScreen {
    screen: Screen<()>,
}

impl LoginScreen {
    /// Shown while the registration request is in flight.
    pub const LOADING_MESSAGE: &'static str =
        "We're adding you to our allowed users database. Please wait....";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState<()> {
        self.screen.state()
    }

    /// Submit `email`; on success the recommendations screen comes next.
    pub async fn submit(&mut self, accounts: &dyn AccountRegistry, email: &str) -> &ViewState<()> {
        self.screen.load(|| accounts.register(email)).await
    }

    pub fn go_back(&mut self, session: &Session) -> Result<()> {
        self.screen.go_back(session)
    }
}

/// Recommendations screen.
///
/// Mounting starts a login; when the flow has to leave for the music service
/// the screen stays `Loading` and keeps the redirect, to be resumed by a new
/// mount once the browser comes back.
#[derive(Debug, Default)]
pub struct RecommendationsScreen {
    screen: Screen<Recommender>,
    redirect: Option<AuthRedirect>,
    pager: Option<Pager>,
}

impl RecommendationsScreen {
    pub const LOADING_MESSAGE: &'static str =
        "We're analyzing your song history and sending it to our model. Please wait";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState<Recommender> {
        self.screen.state()
    }

    /// The pending navigation, while the screen waits on the music service.
    pub fn redirect(&self) -> Option<&AuthRedirect> {
        self.redirect.as_ref()
    }

    pub async fn mount(
        &mut self,
        orchestrator: &AuthOrchestrator,
        callback: Option<CallbackParams>,
    ) -> &ViewState<Recommender> {
        if !self.screen.state().is_idle() {
            return self.screen.state();
        }

        self.screen.state = ViewState::Loading;
        match orchestrator.login(callback).await {
            Ok(LoginStep::Redirect(redirect)) => {
                self.redirect = Some(redirect);
            }
            Ok(LoginStep::Recommended(recommender)) => {
                self.pager = Some(Pager::new(recommender.from_songs.len(), DEFAULT_PAGE_SIZE));
                self.screen.resolve(Ok(recommender));
            }
            Err(e) => self.screen.resolve(Err(e)),
        }
        self.screen.state()
    }

    /// Mount with the URL the browser was sent back to.
    ///
    /// An unreadable URL leaves the screen in `Error` like any other failed
    /// login, so going back still logs out.
    pub async fn mount_from_redirect(
        &mut self,
        orchestrator: &AuthOrchestrator,
        redirect_url: &str,
    ) -> &ViewState<Recommender> {
        match CallbackParams::from_redirect_url(redirect_url) {
            Ok(params) => self.mount(orchestrator, Some(params)).await,
            Err(e) => {
                if self.screen.state().is_idle() {
                    self.screen.resolve(Err(e));
                }
                self.screen.state()
            }
        }
    }

    /// Presentation of the loaded recommendation.
    pub fn view(&self) -> Option<RecommendationView<'_>> {
        let recommender = self.screen.state().success()?;
        let pager = self
            .pager
            .unwrap_or_else(|| Pager::new(recommender.from_songs.len(), DEFAULT_PAGE_SIZE));
        Some(RecommendationView::with_pager(recommender, pager))
    }

    pub fn next_page(&mut self) -> Option<usize> {
        self.pager.as_mut().map(Pager::next)
    }

    pub fn previous_page(&mut self) -> Option<usize> {
        self.pager.as_mut().map(Pager::previous)
    }

    pub fn go_to_page(&mut self, page: usize) -> Option<usize> {
        self.pager.as_mut().map(|pager| pager.go_to(page))
    }

    pub fn go_back(&mut self, session: &Session) -> Result<()> {
        self.redirect = None;
        self.pager = None;
        self.screen.go_back(session)
    }
}
