//! Local enquiry assistant replies.

use std::sync::OnceLock;

use serde::Serialize;

use super::lookup::{KeywordTable, Matcher};

/// Canned assistant answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub text: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug)]
struct ReplyEntry {
    text: &'static str,
    suggestions: &'static [&'static str],
}

impl ReplyEntry {
    fn reply(&self) -> ChatReply {
        ChatReply {
            text: self.text.to_string(),
            suggestions: self.suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub const QUICK_REPLIES: [&str; 5] = [
    "Nearest bus stop",
    "Good restaurants",
    "Find ATM",
    "Police station",
    "Hospital nearby",
];

const GREETING: &str = "🙏 Namaste! I'm your local enquiry assistant. I can help you find nearby places, transport options, emergency services, and answer questions in your preferred language.\n\nHow can I help you today?";

fn table() -> &'static KeywordTable<ReplyEntry> {
    static TABLE: OnceLock<KeywordTable<ReplyEntry>> = OnceLock::new();
    TABLE.get_or_init(|| {
        KeywordTable::new(ReplyEntry {
            text: "I understand you're looking for local information. Could you please be more specific? I can help you find:\n\n• Transportation (buses, metro, taxis)\n• Food & restaurants\n• Medical facilities\n• Banks & ATMs\n• Police & emergency services\n• Tourist attractions",
            suggestions: &["Nearest bus stop", "Good restaurants", "Find ATM", "Emergency help"],
        })
        .rule(
            "bus stop",
            [Matcher::QueryContains(&["bus stop", "bus", "transport"])],
            ReplyEntry {
                text: "🚌 Here are the nearest bus stops to Connaught Place:\n\n• **Connaught Place Metro Station** - 2 min walk\n• **Jantar Mantar Bus Stop** - 5 min walk\n• **Parliament Street Bus Stop** - 8 min walk\n\nBuses: 101, 102, 103, DTC Blue Line",
                suggestions: &["Bus timings", "Metro connectivity", "Taxi booking"],
            },
        )
        .rule(
            "restaurant",
            [Matcher::QueryContains(&["restaurant", "food", "eat"])],
            ReplyEntry {
                text: "🍽️ **Popular restaurants near you:**\n\n• **Karim's** (Mughlai) - 4.5⭐ | 15 min\n• **Saravana Bhavan** (South Indian) - 4.3⭐ | 10 min\n• **United Coffee House** (Continental) - 4.2⭐ | 8 min\n\n*All are tourist-friendly with English menus*",
                suggestions: &["Food delivery", "Vegetarian options", "Street food safety"],
            },
        )
        .rule(
            "hospital",
            [Matcher::QueryContains(&["hospital", "medical", "doctor"])],
            ReplyEntry {
                text: "🏥 **Nearest medical facilities:**\n\n• **All India Institute of Medical Sciences (AIIMS)** - 20 min\n• **Ram Manohar Lohia Hospital** - 15 min\n• **Apollo Pharmacy** (24/7) - 5 min walk\n\n**Emergency:** Call 102 for ambulance",
                suggestions: &["Emergency numbers", "Pharmacy locations", "Insurance help"],
            },
        )
        .rule(
            "atm",
            [Matcher::QueryContains(&["atm"])],
            ReplyEntry {
                text: "🏧 **ATMs near Connaught Place:**\n\n• **SBI ATM** - Inner Circle, CP (2 min)\n• **HDFC Bank ATM** - Palika Bazaar (3 min)\n• **ICICI Bank ATM** - Janpath (5 min)\n\n*All accept international cards*",
                suggestions: &["Currency exchange", "Bank branches", "Money transfer"],
            },
        )
        .rule(
            "police",
            [Matcher::QueryContains(&["police", "help", "emergency"])],
            ReplyEntry {
                text: "👮 **Police assistance:**\n\n• **Connaught Place Police Station** - 3 min walk\n• **Tourist Helpline:** 1363\n• **Women's Helpline:** 1091\n• **Emergency:** 100\n\n*Tourist police available 24/7*",
                suggestions: &["Report incident", "Lost passport help", "Safety tips"],
            },
        )
    })
}

/// Reply for a free-text question.
pub fn reply(query: &str) -> ChatReply {
    table().lookup(query).payload().reply()
}

/// Which topic a question resolved to, if any.
pub fn topic(query: &str) -> Option<&'static str> {
    table().lookup(query).key()
}

/// Opening message of every conversation.
pub fn greeting() -> ChatReply {
    ChatReply {
        text: GREETING.to_string(),
        suggestions: QUICK_REPLIES.iter().map(|s| s.to_string()).collect(),
    }
}

/// Questions that should also surface the emergency-numbers notice.
pub fn is_urgent(query: &str) -> bool {
    let query = query.to_lowercase();
    query.contains("emergency") || query.contains("help")
}
