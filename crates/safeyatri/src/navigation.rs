//! Screen graph and the navigator that walks it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    Welcome,
    Login,
    Signup,
    CompleteProfile,
    DigitalId,
    Dashboard,
    SafeRoute,
    RiskNews,
    Negotiation,
    Chatbot,
    SoloFemale,
    Police,
    TripPlanner,
}

impl Screen {
    pub const ALL: [Screen; 13] = [
        Screen::Welcome,
        Screen::Login,
        Screen::Signup,
        Screen::CompleteProfile,
        Screen::DigitalId,
        Screen::Dashboard,
        Screen::SafeRoute,
        Screen::RiskNews,
        Screen::Negotiation,
        Screen::Chatbot,
        Screen::SoloFemale,
        Screen::Police,
        Screen::TripPlanner,
    ];

    /// Screens the dashboard fans out to.
    pub const FEATURES: [Screen; 7] = [
        Screen::SafeRoute,
        Screen::RiskNews,
        Screen::Negotiation,
        Screen::Chatbot,
        Screen::SoloFemale,
        Screen::Police,
        Screen::TripPlanner,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Screen::Welcome => "/",
            Screen::Login => "/login",
            Screen::Signup => "/signup",
            Screen::CompleteProfile => "/complete-profile",
            Screen::DigitalId => "/digital-id",
            Screen::Dashboard => "/dashboard",
            Screen::SafeRoute => "/safe-route",
            Screen::RiskNews => "/risk-news",
            Screen::Negotiation => "/negotiation",
            Screen::Chatbot => "/chatbot",
            Screen::SoloFemale => "/solo-female",
            Screen::Police => "/police",
            Screen::TripPlanner => "/trip-planner",
        }
    }

    pub fn from_path(path: &str) -> Option<Screen> {
        let path = path.trim();
        let normalized = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        Screen::ALL
            .into_iter()
            .find(|screen| screen.path() == normalized)
    }

    pub fn is_feature(self) -> bool {
        Screen::FEATURES.contains(&self)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Screen {
    type Err = NavigationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Screen::from_path(value).ok_or_else(|| NavigationError::UnknownScreen(value.to_string()))
    }
}

/// Precondition an edge needs before it can be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    SignedIn,
    ProfileVerified,
    IdIssued,
}

impl Gate {
    pub const ALL: [Gate; 3] = [Gate::SignedIn, Gate::ProfileVerified, Gate::IdIssued];
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gate::SignedIn => "sign-in",
            Gate::ProfileVerified => "profile verification",
            Gate::IdIssued => "digital ID issuance",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Open,
    Gated(Gate),
}

/// The edge from `from` to `to`, if the graph has one.
pub fn edge(from: Screen, to: Screen) -> Option<Edge> {
    use Screen::*;

    match (from, to) {
        (Welcome, Login | Signup) => Some(Edge::Open),
        (Login, Welcome | Signup) => Some(Edge::Open),
        (Login, Dashboard) => Some(Edge::Gated(Gate::SignedIn)),
        (Signup, Welcome | Login) => Some(Edge::Open),
        (Signup, CompleteProfile) => Some(Edge::Gated(Gate::SignedIn)),
        (CompleteProfile, DigitalId) => Some(Edge::Gated(Gate::ProfileVerified)),
        (DigitalId, Dashboard) => Some(Edge::Gated(Gate::IdIssued)),
        (Dashboard, Welcome) => Some(Edge::Open),
        (Dashboard, feature) if feature.is_feature() => Some(Edge::Open),
        (feature, Dashboard) if feature.is_feature() => Some(Edge::Open),
        _ => None,
    }
}

/// Every screen reachable in one step from `from`.
pub fn neighbours(from: Screen) -> Vec<(Screen, Edge)> {
    Screen::ALL
        .into_iter()
        .filter_map(|to| edge(from, to).map(|edge| (to, edge)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: Screen, to: Screen },
    #[error("{to} requires {gate} first")]
    Blocked { from: Screen, to: Screen, gate: Gate },
    #[error("unknown screen '{0}'")]
    UnknownScreen(String),
}

/// Screens kept in the trail; older entries are dropped first.
pub const HISTORY_LIMIT: usize = 32;

/// Current screen plus the most recent part of the trail that led to it.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Screen,
    history: Vec<Screen>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            current: Screen::Welcome,
            history: Vec::new(),
        }
    }
}

impl Navigator {
    pub fn current(&self) -> Screen {
        self.current
    }

    pub fn history(&self) -> &[Screen] {
        &self.history
    }

    /// Follow an edge, consulting `satisfied` for gated ones. Returns the
    /// screen that was left.
    pub fn navigate(
        &mut self,
        to: Screen,
        satisfied: impl Fn(Gate) -> bool,
    ) -> Result<Screen, NavigationError> {
        let from = self.current;
        match edge(from, to) {
            None => return Err(NavigationError::NoRoute { from, to }),
            Some(Edge::Gated(gate)) if !satisfied(gate) => {
                return Err(NavigationError::Blocked { from, to, gate })
            }
            Some(_) => {}
        }

        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(from);
        self.current = to;
        Ok(from)
    }
}
