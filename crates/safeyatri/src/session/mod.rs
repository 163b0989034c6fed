//! Per-instance session state shared by every screen.
//!
//! A [`Session`] lives exactly as long as the companion instance that owns it
//! and is handed to screen operations by reference. Nothing here is persisted.

mod language;

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use language::Language;

pub const DEFAULT_SAFETY_SCORE: u8 = 85;
pub const DEFAULT_LOCATION: &str = "Connaught Place, Delhi";

/// Identifier wrapper for live companion instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

impl SessionId {
    pub fn next() -> Self {
        let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        SessionId(format!("ses-{id:06}"))
    }
}

/// Safety score clamped to `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", from = "u8")]
pub struct SafetyScore(u8);

impl SafetyScore {
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn band(self) -> SafetyBand {
        match self.0 {
            75..=u8::MAX => SafetyBand::Safe,
            50..=74 => SafetyBand::Moderate,
            _ => SafetyBand::HighRisk,
        }
    }
}

impl Default for SafetyScore {
    fn default() -> Self {
        Self(DEFAULT_SAFETY_SCORE)
    }
}

impl From<u8> for SafetyScore {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<SafetyScore> for u8 {
    fn from(score: SafetyScore) -> Self {
        score.0
    }
}

/// Dashboard label for a safety score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyBand {
    Safe,
    Moderate,
    HighRisk,
}

impl SafetyBand {
    pub fn label(self) -> &'static str {
        match self {
            SafetyBand::Safe => "SAFE",
            SafetyBand::Moderate => "MODERATE",
            SafetyBand::HighRisk => "HIGH RISK",
        }
    }
}

/// Signed-in traveler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub joined_date: NaiveDate,
    pub issued_credential_id: Option<String>,
    pub emergency_contact: Option<String>,
}

/// Mutable state read and written by every screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    user: Option<Identity>,
    safety_score: SafetyScore,
    current_location: String,
    selected_language: Language,
    last_issued_id: Option<String>,
    solo_mode: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            user: None,
            safety_score: SafetyScore::default(),
            current_location: DEFAULT_LOCATION.to_string(),
            selected_language: Language::default(),
            last_issued_id: None,
            solo_mode: false,
        }
    }
}

impl Session {
    pub fn user(&self) -> Option<&Identity> {
        self.user.as_ref()
    }

    pub fn user_mut(&mut self) -> Option<&mut Identity> {
        self.user.as_mut()
    }

    pub fn set_user(&mut self, user: Option<Identity>) {
        self.user = user;
    }

    pub fn safety_score(&self) -> SafetyScore {
        self.safety_score
    }

    pub fn set_safety_score(&mut self, score: impl Into<SafetyScore>) {
        self.safety_score = score.into();
    }

    pub fn current_location(&self) -> &str {
        &self.current_location
    }

    pub fn set_current_location(&mut self, location: impl Into<String>) {
        self.current_location = location.into();
    }

    pub fn selected_language(&self) -> Language {
        self.selected_language
    }

    pub fn set_selected_language(&mut self, language: Language) {
        self.selected_language = language;
    }

    pub fn last_issued_id(&self) -> Option<&str> {
        self.last_issued_id.as_deref()
    }

    pub fn set_last_issued_id(&mut self, id: Option<String>) {
        self.last_issued_id = id;
    }

    pub fn solo_mode(&self) -> bool {
        self.solo_mode
    }

    pub fn set_solo_mode(&mut self, enabled: bool) {
        self.solo_mode = enabled;
    }
}

/// Errors raised at the session boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session {0} is not active")]
    NotActive(SessionId),
    #[error("unsupported language code '{0}'")]
    UnknownLanguage(String),
}
