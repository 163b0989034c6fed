//! Dashboard and the feature screens it fans out to.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{ChatMessage, Companion, FlowError, Speaker, ValidationError};
use crate::catalog::chat::{self, ChatReply};
use crate::catalog::news::{self, NewsFilter, RiskNewsItem};
use crate::catalog::police::{self, DigitalIdVerification, PoliceOverview};
use crate::catalog::pricing::{self, PriceQuote, GENERAL_CATEGORY};
use crate::catalog::routes::{self, RouteOption};
use crate::catalog::solo::{self, SoloService};
use crate::navigation::Screen;
use crate::notify::Notification;
use crate::platform::{self, SpeechToText};
use crate::session::Language;
use crate::simulate::{pause, simulate, Cancelled, SimulatedOperation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureTile {
    pub title: &'static str,
    pub description: &'static str,
    pub screen: Screen,
}

const FEATURE_TILES: [FeatureTile; 7] = [
    FeatureTile {
        title: "Safe Route Generator",
        description: "AI-powered safe paths",
        screen: Screen::SafeRoute,
    },
    FeatureTile {
        title: "Local Risk News",
        description: "Real-time safety alerts",
        screen: Screen::RiskNews,
    },
    FeatureTile {
        title: "Smart Price Assistant",
        description: "Fair price suggestions",
        screen: Screen::Negotiation,
    },
    FeatureTile {
        title: "Voice Chat Bot",
        description: "Multilingual support",
        screen: Screen::Chatbot,
    },
    FeatureTile {
        title: "Solo Female Mode",
        description: "Enhanced safety features for women travelers",
        screen: Screen::SoloFemale,
    },
    FeatureTile {
        title: "Police Dashboard",
        description: "Tourist clusters, SOS calls and auto-filed FIRs",
        screen: Screen::Police,
    },
    FeatureTile {
        title: "Trip Planner",
        description: "Plan your itinerary",
        screen: Screen::TripPlanner,
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub traveler: Option<String>,
    pub safety_score: u8,
    pub safety_label: &'static str,
    pub current_location: String,
    pub language: Language,
    pub solo_mode: bool,
    pub features: Vec<FeatureTile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TripForm {
    pub origin: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_travelers")]
    pub travelers: u8,
}

fn default_travelers() -> u8 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripPlan {
    pub origin: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travelers: u8,
    pub days: i64,
}

impl Companion {
    pub fn dashboard(&self) -> Result<DashboardView, FlowError> {
        let state = self.lock();
        state.enter(Screen::Dashboard)?;
        let score = state.session.safety_score();
        Ok(DashboardView {
            traveler: state.session.user().map(|user| user.name.clone()),
            safety_score: score.value(),
            safety_label: score.band().label(),
            current_location: state.session.current_location().to_string(),
            language: state.session.selected_language(),
            solo_mode: state.session.solo_mode(),
            features: FEATURE_TILES.to_vec(),
        })
    }

    /// Wait on the dashboard until the geofence check flags the area.
    /// Leaving the dashboard first cancels the alert.
    pub async fn watch_geofence(&self) -> Result<Notification, FlowError> {
        let token = self.enter(Screen::Dashboard)?;
        let operation = SimulatedOperation::GeofenceAlert;
        pause(self.latency, operation, &token).await?;

        let mut state = self.resume(&token, Cancelled { operation })?;
        let alert = Notification::destructive(
            "⚠️ Geo-fence Alert",
            "You are entering a high-risk zone. Would you like to reroute?",
        );
        warn!(location = %state.session.current_location(), "geofence alert raised");
        state.notify(alert.clone());
        Ok(alert)
    }

    /// Panic button. Available on any screen once signed in.
    pub fn trigger_sos(&self) -> Result<Notification, FlowError> {
        let mut state = self.lock();
        if state.session.user().is_none() {
            return Err(FlowError::NotSignedIn);
        }
        let alert = Notification::destructive(
            "🆘 SOS ACTIVATED",
            "Alert sent to nearest police station & emergency contacts with live location.",
        );
        warn!(location = %state.session.current_location(), "SOS activated");
        state.notify(alert.clone());
        Ok(alert)
    }

    /// Compute route options. The destination must be filled in but does not
    /// change the options returned.
    pub async fn calculate_routes(&self, destination: &str) -> Result<Vec<RouteOption>, FlowError> {
        let token = self.enter(Screen::SafeRoute)?;
        let destination = destination.trim();
        if destination.is_empty() {
            return self.reject(
                Notification::destructive(
                    "Enter Destination",
                    "Please enter your destination to calculate routes.",
                ),
                ValidationError::MissingField("destination"),
            );
        }
        debug!(destination, "destination recorded; route options are fixed");

        let operation = SimulatedOperation::RouteCalculation;
        let options = simulate(self.latency, operation, &token, || {
            routes::options_for(destination)
        })
        .await?;

        let mut state = self.resume(&token, Cancelled { operation })?;
        state.routes = Some(options.clone());
        state.notify(Notification::info(
            "Routes Calculated",
            format!(
                "Found {} routes based on safety data and crime statistics.",
                options.len()
            ),
        ));
        Ok(options)
    }

    /// Pick a calculated route and head back to the dashboard.
    pub async fn select_route(&self, choice: &str) -> Result<RouteOption, FlowError> {
        let token = self.enter(Screen::SafeRoute)?;
        let route = {
            let mut state = self.lock();
            if state.routes.is_none() {
                return Err(ValidationError::RoutesNotCalculated.into());
            }
            let route = routes::select(choice);
            state.notify(Notification::info(
                format!("Route Selected: {}", route.label),
                format!(
                    "Starting navigation with safety score {}/100",
                    route.safety_score
                ),
            ));
            route
        };

        let operation = SimulatedOperation::RouteSelection;
        pause(self.latency, operation, &token).await?;

        let mut state = self.resume(&token, Cancelled { operation })?;
        state.navigate(Screen::Dashboard)?;
        info!(route = %route.label, "navigation started");
        Ok(route)
    }

    pub fn risk_news(&self, filter: &NewsFilter) -> Result<Vec<RiskNewsItem>, FlowError> {
        self.enter(Screen::RiskNews)?;
        Ok(news::feed(filter))
    }

    pub fn refresh_news(&self, filter: &NewsFilter) -> Result<Vec<RiskNewsItem>, FlowError> {
        let mut state = self.lock();
        state.enter(Screen::RiskNews)?;
        state.notify(Notification::info(
            "News Updated",
            "Latest safety alerts refreshed",
        ));
        Ok(news::feed(filter))
    }

    /// Look up fair prices for an item.
    pub async fn scan_price(&self, item: &str) -> Result<PriceQuote, FlowError> {
        let token = self.enter(Screen::Negotiation)?;
        let item = item.trim();
        if item.is_empty() {
            return self.reject(
                Notification::destructive(
                    "Enter Item Name",
                    "Please enter an item name to get price suggestions",
                ),
                ValidationError::MissingField("item name"),
            );
        }

        let operation = SimulatedOperation::PriceScan;
        let quote = simulate(self.latency, operation, &token, || pricing::quote(item)).await?;

        let mut state = self.resume(&token, Cancelled { operation })?;
        if quote.category != GENERAL_CATEGORY {
            state.notify(Notification::info(
                "Price Analysis Complete",
                "AI has analyzed current market prices for this item",
            ));
        }
        state.last_quote = Some(quote.clone());
        info!(item, quoted = quote.quoted_price, markup = quote.markup_percent, "price scanned");
        Ok(quote)
    }

    pub fn last_quote(&self) -> Option<PriceQuote> {
        self.lock().last_quote.clone()
    }

    /// Send a chat message and wait for the assistant's reply.
    pub async fn send_chat(&self, text: &str) -> Result<ChatMessage, FlowError> {
        let token = self.enter(Screen::Chatbot)?;
        self.send_chat_on(&token, text).await
    }

    /// Post `text` and its reply to the chat opened under `token`.
    async fn send_chat_on(
        &self,
        token: &CancellationToken,
        text: &str,
    ) -> Result<ChatMessage, FlowError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::MissingField("message").into());
        }

        let operation = SimulatedOperation::ChatReply;
        self.resume(token, Cancelled { operation })?.push_chat(
            Speaker::Traveler,
            ChatReply {
                text: text.to_string(),
                suggestions: Vec::new(),
            },
        );

        let reply = simulate(self.latency, operation, token, || chat::reply(text)).await?;

        let mut state = self.resume(token, Cancelled { operation })?;
        let message = state.push_chat(Speaker::Assistant, reply);
        if chat::is_urgent(text) {
            state.notify(Notification::info(
                "Emergency Information Provided",
                "Important: Save emergency numbers for quick access",
            ));
        }
        debug!(topic = ?chat::topic(text), "chat reply sent");
        Ok(message)
    }

    /// Dictate a chat message in the session language, then send it. Leaving
    /// the chat while listening drops the utterance.
    pub async fn dictate_chat(&self, speech: &dyn SpeechToText) -> Result<ChatMessage, FlowError> {
        let token = self.enter(Screen::Chatbot)?;
        let language = self.lock().session.selected_language();

        let text = match platform::dictate(speech, language, &token).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                return Err(Cancelled {
                    operation: SimulatedOperation::ChatReply,
                }
                .into())
            }
            Err(err) => {
                return self.reject(
                    Notification::rejected("Voice input unavailable", &err),
                    err,
                )
            }
        };

        self.send_chat_on(&token, &text).await
    }

    pub fn chat_history(&self) -> Vec<ChatMessage> {
        self.lock().chat.clone()
    }

    pub fn set_solo_mode(&self, enabled: bool) -> Result<Vec<SoloService>, FlowError> {
        let mut state = self.lock();
        state.enter(Screen::SoloFemale)?;
        state.session.set_solo_mode(enabled);
        let notification = if enabled {
            Notification::info(
                "Solo Female Mode Activated",
                "Dashboard enhanced with women-specific safety features",
            )
        } else {
            Notification::info(
                "Solo Female Mode Disabled",
                "Returned to standard safety mode",
            )
        };
        state.notify(notification);
        Ok(solo::services())
    }

    pub fn solo_services(&self) -> Result<Vec<SoloService>, FlowError> {
        self.enter(Screen::SoloFemale)?;
        Ok(solo::services())
    }

    pub fn police_overview(&self) -> Result<PoliceOverview, FlowError> {
        self.enter(Screen::Police)?;
        Ok(police::overview())
    }

    pub fn search_digital_id(&self, digital_id: &str) -> Result<DigitalIdVerification, FlowError> {
        self.enter(Screen::Police)?;
        let digital_id = digital_id.trim();
        if digital_id.is_empty() {
            return self.reject(
                Notification::destructive(
                    "Enter Digital ID",
                    "Please enter a tourist's digital ID to search",
                ),
                ValidationError::MissingField("digital ID"),
            );
        }

        let verification = police::verify_digital_id(digital_id);
        self.lock().notify(Notification::info(
            "Digital ID Found",
            format!("Tourist verification successful for ID: {digital_id}"),
        ));
        Ok(verification)
    }

    /// Save an itinerary and return to the dashboard.
    pub fn plan_trip(&self, form: TripForm) -> Result<TripPlan, FlowError> {
        self.enter(Screen::TripPlanner)?;

        let validation = if form.origin.trim().is_empty() {
            Err(ValidationError::MissingField("origin"))
        } else if form.destination.trim().is_empty() {
            Err(ValidationError::MissingField("destination"))
        } else if form.end_date < form.start_date {
            Err(ValidationError::TripDatesReversed)
        } else if form.travelers == 0 {
            Err(ValidationError::NoTravelers)
        } else {
            Ok(())
        };
        if let Err(err) = validation {
            return self.reject(Notification::rejected("Trip not planned", &err), err);
        }

        let plan = TripPlan {
            origin: form.origin.trim().to_string(),
            destination: form.destination.trim().to_string(),
            start_date: form.start_date,
            end_date: form.end_date,
            travelers: form.travelers,
            days: (form.end_date - form.start_date).num_days() + 1,
        };

        let mut state = self.lock();
        state.trip = Some(plan.clone());
        state.notify(Notification::info("Trip planned", "Your itinerary is ready."));
        state.navigate(Screen::Dashboard)?;
        info!(destination = %plan.destination, days = plan.days, "trip planned");
        Ok(plan)
    }

    pub fn trip(&self) -> Option<TripPlan> {
        self.lock().trip.clone()
    }
}
