//! Static tables standing in for backend services.

pub mod chat;
pub mod digital_id;
pub mod lookup;
pub mod news;
pub mod police;
pub mod pricing;
pub mod routes;
pub mod solo;

pub use chat::ChatReply;
pub use digital_id::DigitalId;
pub use lookup::{KeywordTable, Lookup, Matcher};
pub use news::{NewsCategory, NewsFilter, RiskNewsItem, Severity};
pub use police::{DigitalIdVerification, PoliceOverview};
pub use pricing::{FairRange, MarkupLevel, PriceQuote};
pub use routes::RouteOption;
pub use solo::SoloService;
