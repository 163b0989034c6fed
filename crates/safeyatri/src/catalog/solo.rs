//! Services listed by the solo female traveler screen.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Guide {
    pub name: &'static str,
    pub rating: f32,
    pub languages: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SoloService {
    SafetyZones {
        name: &'static str,
        description: &'static str,
        locations: Vec<&'static str>,
    },
    Guides {
        name: &'static str,
        description: &'static str,
        guides: Vec<Guide>,
    },
    Escort {
        name: &'static str,
        description: &'static str,
        services: Vec<&'static str>,
    },
}

pub fn services() -> Vec<SoloService> {
    vec![
        SoloService::SafetyZones {
            name: "Women's Safety Zones",
            description: "Well-lit areas with increased security",
            locations: vec!["Police Bazaar, Shillong", "Iewduh Market", "Laitumkhrah"],
        },
        SoloService::Guides {
            name: "Female Tour Guides",
            description: "Verified female guides for solo travelers",
            guides: vec![
                Guide {
                    name: "Sneha Agarwal",
                    rating: 4.8,
                    languages: "Hindi, English",
                },
                Guide {
                    name: "Priya Mehta",
                    rating: 4.9,
                    languages: "Hindi, English, French",
                },
            ],
        },
        SoloService::Escort {
            name: "Women's Escort Services",
            description: "Safe accompaniment for late hours",
            services: vec!["Market visits", "Evening tours", "Transport assistance"],
        },
    ]
}
