use chrono::NaiveDate;
use serde::Serialize;

pub const ISSUED_ID: &str = "SY-BC-2024-001234";
const BLOCKCHAIN_HASH: &str = "0x1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b";

/// Blockchain-backed tourist ID card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigitalId {
    pub id: String,
    pub name: String,
    pub nationality: String,
    pub verified: bool,
    pub issue_date: NaiveDate,
    pub blockchain_hash: String,
}

/// The canned card, stamped with `holder` and `issued_on`.
pub fn issue(holder: &str, issued_on: NaiveDate) -> DigitalId {
    DigitalId {
        id: ISSUED_ID.to_string(),
        name: holder.to_string(),
        nationality: "Indian".to_string(),
        verified: true,
        issue_date: issued_on,
        blockchain_hash: BLOCKCHAIN_HASH.to_string(),
    }
}
