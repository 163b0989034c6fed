//! The companion instance: one session walking the screen graph.
//!
//! Every operation belongs to a screen. Simulated calls are bound to the
//! cancellation token of the screen that started them; leaving the screen
//! cancels the token, so a late completion never lands on another screen.
//! The state mutex is never held across an await.

mod features;
mod onboarding;

#[cfg(test)]
mod tests;

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::catalog::{ChatReply, DigitalId, PriceQuote, RouteOption};
use crate::navigation::{Gate, NavigationError, Navigator, Screen};
use crate::notify::Notification;
use crate::platform::{CapabilityError, InstallOutcome, InstallPrompt};
use crate::session::{Identity, Language, SafetyBand, Session};
use crate::simulate::{Cancelled, Latency};

pub use features::{DashboardView, FeatureTile, TripForm, TripPlan};
pub use onboarding::{LoginForm, ProfileProgress, SignupForm, VerificationStep};

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Traveler,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: u32,
    pub speaker: Speaker,
    pub text: String,
    pub suggestions: Vec<String>,
    pub sent_at: DateTime<Utc>,
}

/// Input rejected before any simulated call starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("routes have not been calculated yet")]
    RoutesNotCalculated,
    #[error("trip cannot end before it starts")]
    TripDatesReversed,
    #[error("at least one traveler is required")]
    NoTravelers,
}

/// Error raised by companion operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error("operation belongs to {expected} but the current screen is {actual}")]
    WrongScreen { expected: Screen, actual: Screen },
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    #[error("no traveler is signed in")]
    NotSignedIn,
    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

/// Point-in-time view of an instance.
#[derive(Debug, Clone, Serialize)]
pub struct CompanionSnapshot {
    pub screen: Screen,
    pub session: Session,
    pub safety_label: &'static str,
    pub profile: ProfileProgress,
    pub digital_id: Option<DigitalId>,
    pub pending_notifications: usize,
}

#[derive(Debug)]
struct CompanionState {
    session: Session,
    navigator: Navigator,
    screen_token: CancellationToken,
    notifications: Vec<Notification>,
    profile: ProfileProgress,
    digital_id: Option<DigitalId>,
    routes: Option<Vec<RouteOption>>,
    last_quote: Option<PriceQuote>,
    chat: Vec<ChatMessage>,
    trip: Option<TripPlan>,
}

impl CompanionState {
    fn new() -> Self {
        Self {
            session: Session::default(),
            navigator: Navigator::default(),
            screen_token: CancellationToken::new(),
            notifications: Vec::new(),
            profile: ProfileProgress::default(),
            digital_id: None,
            routes: None,
            last_quote: None,
            chat: Vec::new(),
            trip: None,
        }
    }

    fn gate_satisfied(&self, gate: Gate) -> bool {
        match gate {
            Gate::SignedIn => self.session.user().is_some(),
            Gate::ProfileVerified => self.profile.verified,
            Gate::IdIssued => self.session.last_issued_id().is_some(),
        }
    }

    fn notify(&mut self, notification: Notification) {
        info!(title = %notification.title, level = ?notification.level, "notification raised");
        self.notifications.push(notification);
    }

    fn navigate(&mut self, to: Screen) -> Result<Screen, FlowError> {
        let satisfied: Vec<Gate> = Gate::ALL
            .into_iter()
            .filter(|gate| self.gate_satisfied(*gate))
            .collect();
        let from = self
            .navigator
            .navigate(to, |gate| satisfied.contains(&gate))?;

        self.screen_token.cancel();
        self.screen_token = CancellationToken::new();
        info!(%from, %to, "screen changed");
        self.on_enter(from, to);
        Ok(from)
    }

    fn on_enter(&mut self, from: Screen, to: Screen) {
        match (from, to) {
            (Screen::DigitalId, Screen::Dashboard) => self.notify(Notification::info(
                "Welcome to SafeYatri!",
                "Your account setup is complete. Let's keep you safe!",
            )),
            (Screen::Dashboard, Screen::Welcome) => self.sign_out(),
            (_, Screen::RiskNews) => self.notify(Notification::info(
                "Real-time Updates Active",
                "Receiving live safety alerts for your area",
            )),
            (_, Screen::Chatbot) if self.chat.is_empty() => {
                let greeting = crate::catalog::chat::greeting();
                self.push_chat(Speaker::Assistant, greeting);
            }
            (_, Screen::SafeRoute) => self.routes = None,
            _ => {}
        }
    }

    fn sign_out(&mut self) {
        self.session.set_user(None);
        self.session.set_last_issued_id(None);
        self.session.set_solo_mode(false);
        self.profile = ProfileProgress::default();
        self.digital_id = None;
        self.routes = None;
        self.last_quote = None;
        self.chat.clear();
        self.trip = None;
        info!("traveler signed out");
    }

    fn push_chat(&mut self, speaker: Speaker, reply: ChatReply) -> ChatMessage {
        let message = ChatMessage {
            id: self.chat.len() as u32 + 1,
            speaker,
            text: reply.text,
            suggestions: reply.suggestions,
            sent_at: Utc::now(),
        };
        self.chat.push(message.clone());
        message
    }

    /// Token of the current screen, if it is `expected`.
    fn enter(&self, expected: Screen) -> Result<CancellationToken, FlowError> {
        let actual = self.navigator.current();
        if actual != expected {
            return Err(FlowError::WrongScreen { expected, actual });
        }
        Ok(self.screen_token.clone())
    }
}

/// A single traveler's running application instance.
#[derive(Debug)]
pub struct Companion {
    state: Mutex<CompanionState>,
    latency: Latency,
}

impl Default for Companion {
    fn default() -> Self {
        Self::new(Latency::default())
    }
}

impl Companion {
    pub fn new(latency: Latency) -> Self {
        Self {
            state: Mutex::new(CompanionState::new()),
            latency,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CompanionState> {
        self.state.lock().expect("companion state mutex poisoned")
    }

    /// Token for `expected`, failing when the traveler is elsewhere.
    fn enter(&self, expected: Screen) -> Result<CancellationToken, FlowError> {
        self.lock().enter(expected)
    }

    /// Re-acquire the state after a simulated call, unless the screen that
    /// started it has been left in the meantime.
    fn resume(
        &self,
        token: &CancellationToken,
        cancelled: Cancelled,
    ) -> Result<MutexGuard<'_, CompanionState>, FlowError> {
        let state = self.lock();
        if token.is_cancelled() {
            return Err(cancelled.into());
        }
        Ok(state)
    }

    /// Record a notification and hand back `error`.
    fn reject<T>(&self, notification: Notification, error: impl Into<FlowError>) -> Result<T, FlowError> {
        self.lock().notify(notification);
        Err(error.into())
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    pub fn screen(&self) -> Screen {
        self.lock().navigator.current()
    }

    pub fn history(&self) -> Vec<Screen> {
        self.lock().navigator.history().to_vec()
    }

    /// Follow an edge of the screen graph. Leaving a screen cancels whatever
    /// it still had in flight.
    pub fn navigate(&self, to: Screen) -> Result<Screen, FlowError> {
        self.lock().navigate(to)
    }

    /// Copy of the session.
    pub fn session(&self) -> Session {
        self.lock().session.clone()
    }

    /// Run `f` against the live session.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.lock().session)
    }

    pub fn set_language(&self, language: Language) {
        self.with_session(|session| session.set_selected_language(language));
        info!(language = %language, "language changed");
    }

    pub fn set_location(&self, location: impl Into<String>) {
        let location = location.into();
        info!(%location, "location changed");
        self.with_session(|session| session.set_current_location(location));
    }

    pub fn user(&self) -> Option<Identity> {
        self.lock().session.user().cloned()
    }

    pub fn snapshot(&self) -> CompanionSnapshot {
        let state = self.lock();
        CompanionSnapshot {
            screen: state.navigator.current(),
            session: state.session.clone(),
            safety_label: state.session.safety_score().band().label(),
            profile: state.profile.clone(),
            digital_id: state.digital_id.clone(),
            pending_notifications: state.notifications.len(),
        }
    }

    pub fn safety_band(&self) -> SafetyBand {
        self.lock().session.safety_score().band()
    }

    /// Notifications raised since the last drain, oldest first.
    pub fn drain_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.lock().notifications)
    }

    pub fn pending_notifications(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    /// Ask the platform to install the app.
    pub fn request_install(&self, prompt: &dyn InstallPrompt) -> Result<InstallOutcome, FlowError> {
        match prompt.prompt() {
            Ok(outcome) => {
                info!(?outcome, "install prompt answered");
                Ok(outcome)
            }
            Err(err) => self.reject(
                Notification::destructive("Install unavailable", err.to_string()),
                err,
            ),
        }
    }
}
