//! Fixed safe-route options.
//!
//! The destination is collected by the route screen but does not influence
//! which options come back.

use std::sync::OnceLock;

use serde::Serialize;

use super::lookup::{KeywordTable, Matcher};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOption {
    pub label: String,
    pub distance_km: f32,
    pub eta_minutes: u32,
    pub safety_score: u8,
    pub highlights: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug)]
struct RouteEntry {
    label: &'static str,
    distance_km: f32,
    eta_minutes: u32,
    safety_score: u8,
    highlights: &'static [&'static str],
    warnings: &'static [&'static str],
}

impl RouteEntry {
    fn option(&self) -> RouteOption {
        RouteOption {
            label: self.label.to_string(),
            distance_km: self.distance_km,
            eta_minutes: self.eta_minutes,
            safety_score: self.safety_score,
            highlights: self.highlights.iter().map(|s| s.to_string()).collect(),
            warnings: self.warnings.iter().map(|s| s.to_string()).collect(),
        }
    }
}

const SAFEST: RouteEntry = RouteEntry {
    label: "Safest Route",
    distance_km: 2.8,
    eta_minutes: 12,
    safety_score: 92,
    highlights: &["Well-lit streets", "Police stations nearby", "CCTV coverage"],
    warnings: &[],
};

const FASTEST: RouteEntry = RouteEntry {
    label: "Fastest Route",
    distance_km: 2.1,
    eta_minutes: 8,
    safety_score: 67,
    highlights: &["Direct path", "Good traffic flow"],
    warnings: &["Dark alleys", "Limited CCTV"],
};

const ALTERNATE: RouteEntry = RouteEntry {
    label: "Alternate Route",
    distance_km: 3.2,
    eta_minutes: 15,
    safety_score: 45,
    highlights: &["Scenic route"],
    warnings: &["High crime area", "Poor lighting", "Isolated sections"],
};

fn table() -> &'static KeywordTable<RouteEntry> {
    static TABLE: OnceLock<KeywordTable<RouteEntry>> = OnceLock::new();
    TABLE.get_or_init(|| {
        KeywordTable::new(SAFEST)
            .rule("safest", [Matcher::QueryContains(&["safe"])], SAFEST)
            .rule("fastest", [Matcher::QueryContains(&["fast", "quick"])], FASTEST)
            .rule(
                "alternate",
                [Matcher::QueryContains(&["alternate", "scenic"])],
                ALTERNATE,
            )
    })
}

/// All route options, safest first. `destination` is accepted and ignored.
pub fn options_for(_destination: &str) -> Vec<RouteOption> {
    let table = table();
    table
        .keys()
        .filter_map(|key| table.get(key))
        .map(RouteEntry::option)
        .collect()
}

/// Resolve a route choice by label keyword; anything else picks the safest.
pub fn select(choice: &str) -> RouteOption {
    table().lookup(choice).payload().option()
}
