//! Fair-price suggestions for common tourist purchases.

use std::sync::OnceLock;

use serde::Serialize;

use super::lookup::{KeywordTable, Lookup, Matcher};

/// Inclusive fair price range in rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FairRange {
    pub min: u32,
    pub max: u32,
}

/// How far the quoted price sits above the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupLevel {
    Fair,
    Moderate,
    High,
}

impl MarkupLevel {
    pub fn from_percent(markup_percent: u32) -> Self {
        if markup_percent > 200 {
            MarkupLevel::High
        } else if markup_percent > 100 {
            MarkupLevel::Moderate
        } else {
            MarkupLevel::Fair
        }
    }
}

/// Result of a price scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    pub item_label: String,
    pub category: String,
    pub quoted_price: u32,
    pub fair_range: FairRange,
    pub average_price: u32,
    pub markup_percent: u32,
    pub markup_level: MarkupLevel,
    pub tips: Vec<String>,
}

#[derive(Debug)]
struct PriceEntry {
    item: &'static str,
    category: &'static str,
    quoted_price: u32,
    fair_range: FairRange,
    average_price: u32,
    markup_percent: u32,
    tips: &'static [&'static str],
}

impl PriceEntry {
    fn quote(&self, item_label: &str) -> PriceQuote {
        PriceQuote {
            item_label: item_label.to_string(),
            category: self.category.to_string(),
            quoted_price: self.quoted_price,
            fair_range: self.fair_range,
            average_price: self.average_price,
            markup_percent: self.markup_percent,
            markup_level: MarkupLevel::from_percent(self.markup_percent),
            tips: self.tips.iter().map(|tip| tip.to_string()).collect(),
        }
    }
}

/// Category reported when no table entry matches.
pub const GENERAL_CATEGORY: &str = "General Items";

const HANDICRAFTS_ITEM: &str = "Handmade Wooden Elephant";
const TEXTILES_ITEM: &str = "Silk Scarf Set";
const JEWELRY_ITEM: &str = "Silver Bracelet";

fn table() -> &'static KeywordTable<PriceEntry> {
    static TABLE: OnceLock<KeywordTable<PriceEntry>> = OnceLock::new();
    TABLE.get_or_init(|| {
        KeywordTable::new(PriceEntry {
            item: "",
            category: GENERAL_CATEGORY,
            quoted_price: 600,
            fair_range: FairRange { min: 200, max: 300 },
            average_price: 250,
            markup_percent: 140,
            tips: &[
                "Start with 40-50% of quoted price",
                "Be polite but firm in negotiations",
                "Compare prices at multiple shops",
                "Walk away if they won't negotiate",
            ],
        })
        .rule(
            "handicrafts",
            [
                Matcher::QueryContains(&["handicrafts"]),
                Matcher::LabelContainsQuery(HANDICRAFTS_ITEM),
            ],
            PriceEntry {
                item: HANDICRAFTS_ITEM,
                category: "Handicrafts",
                quoted_price: 850,
                fair_range: FairRange { min: 250, max: 350 },
                average_price: 300,
                markup_percent: 183,
                tips: &[
                    "Start negotiating at ₹200",
                    "Mention you saw similar items elsewhere for less",
                    "Be prepared to walk away",
                    "Ask for bundle discount if buying multiple items",
                ],
            },
        )
        .rule(
            "textiles",
            [
                Matcher::QueryContains(&["textiles"]),
                Matcher::LabelContainsQuery(TEXTILES_ITEM),
            ],
            PriceEntry {
                item: TEXTILES_ITEM,
                category: "Textiles",
                quoted_price: 1200,
                fair_range: FairRange { min: 400, max: 600 },
                average_price: 500,
                markup_percent: 140,
                tips: &[
                    "Check fabric quality before negotiating",
                    "Compare with nearby shops",
                    "Negotiate for ₹450-500 range",
                    "Ask about authenticity certificate",
                ],
            },
        )
        .rule(
            "jewelry",
            [
                Matcher::QueryContains(&["jewelry"]),
                Matcher::LabelContainsQuery(JEWELRY_ITEM),
            ],
            PriceEntry {
                item: JEWELRY_ITEM,
                category: "Jewelry",
                quoted_price: 2500,
                fair_range: FairRange {
                    min: 800,
                    max: 1200,
                },
                average_price: 1000,
                markup_percent: 150,
                tips: &[
                    "Ask for silver purity certificate",
                    "Check for hallmark stamps",
                    "Fair price range: ₹800-1200",
                    "Negotiate based on weight and design",
                ],
            },
        )
    })
}

/// Look up the fair-price table. Unknown items get the general guidance
/// under the name the traveler typed.
pub fn quote(item: &str) -> PriceQuote {
    match table().lookup(item) {
        Lookup::Matched { payload, .. } => payload.quote(payload.item),
        Lookup::Fallback(payload) => payload.quote(item.trim()),
    }
}

/// Category keys in evaluation order.
pub fn categories() -> Vec<&'static str> {
    table().keys().collect()
}
