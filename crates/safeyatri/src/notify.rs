use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Destructive,
}

/// Transient message shown to the traveler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub level: NotificationLevel,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NotificationLevel::Info)
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NotificationLevel::Destructive)
    }

    fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        level: NotificationLevel,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level,
            raised_at: Utc::now(),
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.level == NotificationLevel::Destructive
    }
}

impl Notification {
    /// Destructive notification describing a rejected input.
    pub fn rejected(title: impl Into<String>, error: &impl std::fmt::Display) -> Self {
        Self::destructive(title, sentence_case(&error.to_string()))
    }
}

fn sentence_case(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
