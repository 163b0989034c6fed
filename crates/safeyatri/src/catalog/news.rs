//! Local risk news feed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsCategory {
    Crime,
    Weather,
    Traffic,
    Safety,
}

impl NewsCategory {
    pub fn label(self) -> &'static str {
        match self {
            NewsCategory::Crime => "crime",
            NewsCategory::Weather => "weather",
            NewsCategory::Traffic => "traffic",
            NewsCategory::Safety => "safety",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            NewsCategory::Crime => "🚨",
            NewsCategory::Weather => "🌧️",
            NewsCategory::Traffic => "🚧",
            NewsCategory::Safety => "⚠️",
        }
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NewsCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "crime" => Ok(NewsCategory::Crime),
            "weather" => Ok(NewsCategory::Weather),
            "traffic" => Ok(NewsCategory::Traffic),
            "safety" => Ok(NewsCategory::Safety),
            other => Err(format!("unknown news category '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskNewsItem {
    pub id: u32,
    pub category: NewsCategory,
    pub severity: Severity,
    pub title: &'static str,
    pub description: &'static str,
    pub location: &'static str,
    pub posted_ago: &'static str,
    pub source: &'static str,
    pub verified: bool,
}

const FEED: [RiskNewsItem; 5] = [
    RiskNewsItem {
        id: 1,
        category: NewsCategory::Crime,
        severity: Severity::High,
        title: "Pickpocketing Alert - MG Road Area",
        description: "Multiple incidents of pickpocketing reported near MG Road area. Tourists advised to be extra cautious.",
        location: "MG Road, Guwahati",
        posted_ago: "15 minutes ago",
        source: "Assam Police",
        verified: true,
    },
    RiskNewsItem {
        id: 2,
        category: NewsCategory::Weather,
        severity: Severity::Medium,
        title: "Heavy Rain Alert",
        description: "Meteorological department warns of heavy rainfall in the next 2 hours. Flooding possible in low-lying areas.",
        location: "Shillong, Meghalaya",
        posted_ago: "30 minutes ago",
        source: "IMD Weather",
        verified: true,
    },
    RiskNewsItem {
        id: 3,
        category: NewsCategory::Traffic,
        severity: Severity::Low,
        title: "Road Closure - Ward Lake Area",
        description: "Ward Lake area temporarily closed for maintenance work. Use alternate routes via Police Bazaar.",
        location: "Ward Lake, Shillong",
        posted_ago: "45 minutes ago",
        source: "Traffic Police",
        verified: true,
    },
    RiskNewsItem {
        id: 4,
        category: NewsCategory::Crime,
        severity: Severity::High,
        title: "Tourist Scam Alert - Kamakhya Temple",
        description: "Fake tour guides targeting tourists near Kamakhya Temple. Always verify credentials before hiring guides.",
        location: "Kamakhya Temple, Guwahati",
        posted_ago: "1 hour ago",
        source: "Tourism Authority",
        verified: true,
    },
    RiskNewsItem {
        id: 5,
        category: NewsCategory::Safety,
        severity: Severity::Medium,
        title: "Cultural Festival - Police Bazaar",
        description: "Traditional cultural festival at Police Bazaar from 3-5 PM. Expect crowd and traffic delays.",
        location: "Police Bazaar, Shillong",
        posted_ago: "2 hours ago",
        source: "Meghalaya Police",
        verified: true,
    },
];

/// Feed narrowing; `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewsFilter {
    #[serde(default)]
    pub category: Option<NewsCategory>,
    #[serde(default)]
    pub area: Option<String>,
}

impl NewsFilter {
    fn accepts(&self, item: &RiskNewsItem) -> bool {
        let category_ok = self
            .category
            .map_or(true, |category| item.category == category);
        let area_ok = match self.area.as_deref().map(str::trim) {
            Some(area) if !area.is_empty() => item
                .location
                .to_lowercase()
                .contains(&area.to_lowercase()),
            _ => true,
        };
        category_ok && area_ok
    }
}

/// Items in feed order (newest first).
pub fn feed(filter: &NewsFilter) -> Vec<RiskNewsItem> {
    FEED.iter()
        .filter(|item| filter.accepts(item))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_feed_returns_everything() {
        assert_eq!(feed(&NewsFilter::default()).len(), 5);
    }

    #[test]
    fn category_filter() {
        let crime = feed(&NewsFilter {
            category: Some(NewsCategory::Crime),
            area: None,
        });
        assert_eq!(crime.iter().map(|item| item.id).collect::<Vec<_>>(), vec![1, 4]);
        assert!(crime.iter().all(|item| item.severity == Severity::High));
    }

    #[test]
    fn area_filter_is_case_insensitive() {
        let shillong = feed(&NewsFilter {
            category: None,
            area: Some("SHILLONG".to_string()),
        });
        assert_eq!(shillong.len(), 3);

        let none = feed(&NewsFilter {
            category: Some(NewsCategory::Weather),
            area: Some("Guwahati".to_string()),
        });
        assert!(none.is_empty());
    }

    #[test]
    fn category_parsing() {
        assert_eq!("Traffic".parse::<NewsCategory>(), Ok(NewsCategory::Traffic));
        assert!("sports".parse::<NewsCategory>().is_err());
    }
}
