use std::sync::Arc;

use crate::flow::Companion;
use crate::session::SessionId;

/// Storage for live companion instances, keyed by session id.
pub trait CompanionRepository: Send + Sync {
    fn insert(&self, id: SessionId, companion: Arc<Companion>) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<Arc<Companion>>, RepositoryError>;
    /// Returns whether an instance was removed.
    fn remove(&self, id: &SessionId) -> Result<bool, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
