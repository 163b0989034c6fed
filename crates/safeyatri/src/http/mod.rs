//! HTTP surface: one companion instance per session id.

mod repository;
mod router;
mod service;

#[cfg(test)]
mod tests;

pub use repository::{CompanionRepository, RepositoryError};
pub use router::{companion_router, ActionView, SessionView};
pub use service::CompanionService;
