//! Police dashboard data: tourist density, open SOS calls and auto-filed FIRs.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TouristCluster {
    pub area: &'static str,
    pub count: u32,
    pub risk_level: Level,
    pub last_update: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SosStatus {
    Active,
    Responding,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SosAlert {
    pub id: &'static str,
    pub tourist: &'static str,
    pub location: &'static str,
    pub time: &'static str,
    pub priority: Level,
    pub status: SosStatus,
    pub digital_id: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoFir {
    pub id: &'static str,
    pub incident: &'static str,
    pub tourist: &'static str,
    pub location: &'static str,
    pub time: &'static str,
    pub status: &'static str,
    pub officer: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoliceOverview {
    pub tourist_clusters: Vec<TouristCluster>,
    pub active_sos: Vec<SosAlert>,
    pub auto_firs: Vec<AutoFir>,
    pub total_tourists: u32,
    pub high_risk_areas: usize,
}

const CLUSTERS: [TouristCluster; 5] = [
    TouristCluster {
        area: "Connaught Place",
        count: 847,
        risk_level: Level::Medium,
        last_update: "5 min ago",
    },
    TouristCluster {
        area: "India Gate",
        count: 1205,
        risk_level: Level::Low,
        last_update: "2 min ago",
    },
    TouristCluster {
        area: "Red Fort",
        count: 623,
        risk_level: Level::High,
        last_update: "1 min ago",
    },
    TouristCluster {
        area: "Chandni Chowk",
        count: 892,
        risk_level: Level::High,
        last_update: "3 min ago",
    },
    TouristCluster {
        area: "Lotus Temple",
        count: 456,
        risk_level: Level::Low,
        last_update: "8 min ago",
    },
];

const SOS: [SosAlert; 3] = [
    SosAlert {
        id: "SOS-2024-001",
        tourist: "Priya Sharma",
        location: "MG Road, Near Metro Station",
        time: "2 minutes ago",
        priority: Level::High,
        status: SosStatus::Active,
        digital_id: "SY-BC-2024-001234",
    },
    SosAlert {
        id: "SOS-2024-002",
        tourist: "John Williams",
        location: "Karol Bagh Market",
        time: "5 minutes ago",
        priority: Level::Medium,
        status: SosStatus::Responding,
        digital_id: "SY-BC-2024-005678",
    },
    SosAlert {
        id: "SOS-2024-003",
        tourist: "Sarah Chen",
        location: "Chandni Chowk",
        time: "8 minutes ago",
        priority: Level::Low,
        status: SosStatus::Resolved,
        digital_id: "SY-BC-2024-009876",
    },
];

const FIRS: [AutoFir; 2] = [
    AutoFir {
        id: "FIR-AUTO-2024-445",
        incident: "Pickpocketing Report",
        tourist: "Mike Johnson",
        location: "Palika Bazaar",
        time: "45 minutes ago",
        status: "Filed",
        officer: "SI Rajesh Kumar",
    },
    AutoFir {
        id: "FIR-AUTO-2024-446",
        incident: "Overcharging Complaint",
        tourist: "Lisa Park",
        location: "Janpath Market",
        time: "1 hour ago",
        status: "Under Review",
        officer: "ASI Meera Singh",
    },
];

pub fn overview() -> PoliceOverview {
    PoliceOverview {
        tourist_clusters: CLUSTERS.to_vec(),
        active_sos: SOS.to_vec(),
        auto_firs: FIRS.to_vec(),
        total_tourists: CLUSTERS.iter().map(|cluster| cluster.count).sum(),
        high_risk_areas: CLUSTERS
            .iter()
            .filter(|cluster| cluster.risk_level == Level::High)
            .count(),
    }
}

/// Result of an officer's digital-ID lookup. Every non-blank ID verifies;
/// `open_sos` links it to a known SOS call when one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigitalIdVerification {
    pub digital_id: String,
    pub verified: bool,
    pub open_sos: Option<SosAlert>,
}

pub fn verify_digital_id(digital_id: &str) -> DigitalIdVerification {
    let digital_id = digital_id.trim();
    DigitalIdVerification {
        digital_id: digital_id.to_string(),
        verified: true,
        open_sos: SOS
            .iter()
            .find(|alert| alert.digital_id.eq_ignore_ascii_case(digital_id))
            .cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_totals() {
        let overview = overview();
        assert_eq!(overview.total_tourists, 4023);
        assert_eq!(overview.high_risk_areas, 2);
        assert_eq!(overview.active_sos.len(), 3);
        assert_eq!(overview.auto_firs[1].status, "Under Review");
    }

    #[test]
    fn known_id_links_sos_call() {
        let verification = verify_digital_id(" sy-bc-2024-005678 ");
        assert!(verification.verified);
        let sos = verification.open_sos.expect("linked SOS");
        assert_eq!(sos.tourist, "John Williams");
    }

    #[test]
    fn unknown_id_still_verifies() {
        let verification = verify_digital_id("SY-BC-2024-777777");
        assert!(verification.verified);
        assert!(verification.open_sos.is_none());
    }
}
