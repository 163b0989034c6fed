//! Login, signup, profile verification and digital-ID issuance.

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Companion, FlowError, ValidationError};
use crate::catalog::digital_id::{self, DigitalId, ISSUED_ID};
use crate::navigation::Screen;
use crate::notify::Notification;
use crate::session::Identity;
use crate::simulate::{pause, simulate, Cancelled, SimulatedOperation};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub id_type: Option<String>,
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub emergency_name: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
}

impl SignupForm {
    fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("full name", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("password", &self.password),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ValidationError::MissingField(*field));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }

    fn identity(&self) -> Identity {
        Identity {
            name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            joined_date: Local::now().date_naive(),
            issued_credential_id: None,
            emergency_contact: self
                .emergency_contact
                .as_deref()
                .map(str::trim)
                .filter(|contact| !contact.is_empty())
                .map(str::to_string),
        }
    }
}

/// Checks run while the profile is being completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStep {
    Email,
    Phone,
    KycDocuments,
    SecuritySetup,
}

impl VerificationStep {
    pub const ALL: [VerificationStep; 4] = [
        VerificationStep::Email,
        VerificationStep::Phone,
        VerificationStep::KycDocuments,
        VerificationStep::SecuritySetup,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VerificationStep::Email => "Email Verification",
            VerificationStep::Phone => "Phone Verification",
            VerificationStep::KycDocuments => "KYC Document Verification",
            VerificationStep::SecuritySetup => "Security Setup",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileProgress {
    pub percent: u8,
    pub completed: Vec<VerificationStep>,
    pub verified: bool,
}

impl ProfileProgress {
    fn complete(&mut self, step: VerificationStep) {
        if !self.completed.contains(&step) {
            self.completed.push(step);
        }
        let share = 100 / VerificationStep::ALL.len();
        self.percent = (self.completed.len() * share).min(100) as u8;
        self.verified = self.completed.len() == VerificationStep::ALL.len();
    }
}

/// The demo account every login resolves to.
fn returning_traveler(email: String) -> Identity {
    Identity {
        name: "Priya Sharma".to_string(),
        email,
        phone: "+91 9876543210".to_string(),
        joined_date: Local::now().date_naive(),
        issued_credential_id: Some(ISSUED_ID.to_string()),
        emergency_contact: Some("+91 9876543211".to_string()),
    }
}

impl Companion {
    /// Sign in with any non-blank credentials and land on the dashboard.
    pub async fn login(&self, form: LoginForm) -> Result<Identity, FlowError> {
        let token = self.enter(Screen::Login)?;

        let missing = if form.email.trim().is_empty() {
            Some("email")
        } else if form.password.is_empty() {
            Some("password")
        } else {
            None
        };
        if let Some(field) = missing {
            let err = ValidationError::MissingField(field);
            return self.reject(Notification::rejected("Error", &err), err);
        }

        let email = form.email.trim().to_string();
        let operation = SimulatedOperation::Login;
        let identity = simulate(self.latency, operation, &token, move || {
            returning_traveler(email)
        })
        .await?;

        let mut state = self.resume(&token, Cancelled { operation })?;
        state.session.set_user(Some(identity.clone()));
        state
            .session
            .set_last_issued_id(identity.issued_credential_id.clone());
        state.notify(Notification::info(
            "Welcome back!",
            "Login successful. Redirecting to dashboard...",
        ));
        state.navigate(Screen::Dashboard)?;
        info!(email = %identity.email, "traveler signed in");
        Ok(identity)
    }

    /// Create an account and move on to profile completion. Validation
    /// failures keep the traveler on the signup screen.
    pub async fn signup(&self, form: SignupForm) -> Result<Identity, FlowError> {
        let token = self.enter(Screen::Signup)?;

        if let Err(err) = form.validate() {
            return self.reject(Notification::rejected("Error", &err), err);
        }

        let operation = SimulatedOperation::Signup;
        let identity = simulate(self.latency, operation, &token, || form.identity()).await?;

        let mut state = self.resume(&token, Cancelled { operation })?;
        state.session.set_user(Some(identity.clone()));
        state.notify(Notification::info(
            "Account created!",
            "Please complete your profile to continue...",
        ));
        state.navigate(Screen::CompleteProfile)?;
        info!(email = %identity.email, "traveler signed up");
        Ok(identity)
    }

    /// Run the remaining verification steps, one simulated call each.
    pub async fn verify_profile(&self) -> Result<ProfileProgress, FlowError> {
        let token = self.enter(Screen::CompleteProfile)?;
        let operation = SimulatedOperation::ProfileVerificationStep;

        for step in VerificationStep::ALL {
            if self.lock().profile.completed.contains(&step) {
                continue;
            }

            pause(self.latency, operation, &token).await?;

            let mut state = self.resume(&token, Cancelled { operation })?;
            state.profile.complete(step);
            info!(step = step.label(), percent = state.profile.percent, "verification step passed");
        }

        Ok(self.lock().profile.clone())
    }

    /// Mint the traveler's digital ID. Issuing twice returns the same card.
    pub async fn issue_digital_id(&self) -> Result<DigitalId, FlowError> {
        let token = self.enter(Screen::DigitalId)?;

        let holder = {
            let state = self.lock();
            if let Some(card) = &state.digital_id {
                return Ok(card.clone());
            }
            state
                .session
                .user()
                .map(|user| user.name.clone())
                .ok_or(FlowError::NotSignedIn)?
        };

        let operation = SimulatedOperation::DigitalIdGeneration;
        let card = simulate(self.latency, operation, &token, || {
            digital_id::issue(&holder, Local::now().date_naive())
        })
        .await?;

        let mut state = self.resume(&token, Cancelled { operation })?;
        if let Some(user) = state.session.user_mut() {
            user.issued_credential_id = Some(card.id.clone());
        }
        state.session.set_last_issued_id(Some(card.id.clone()));
        state.digital_id = Some(card.clone());
        state.notify(Notification::info(
            "Digital ID Generated!",
            "Your blockchain-secured digital ID is ready.",
        ));
        info!(id = %card.id, "digital ID issued");
        Ok(card)
    }

    pub fn digital_id(&self) -> Option<DigitalId> {
        self.lock().digital_id.clone()
    }
}
