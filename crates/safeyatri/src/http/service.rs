use std::sync::Arc;

use tracing::info;

use super::repository::CompanionRepository;
use crate::error::AppError;
use crate::flow::Companion;
use crate::session::{SessionError, SessionId};
use crate::simulate::Latency;

/// Creates, resolves and discards companion instances.
pub struct CompanionService<R> {
    repository: Arc<R>,
    latency: Latency,
}

impl<R> CompanionService<R>
where
    R: CompanionRepository,
{
    pub fn new(repository: Arc<R>, latency: Latency) -> Self {
        Self {
            repository,
            latency,
        }
    }

    pub fn create(&self) -> Result<(SessionId, Arc<Companion>), AppError> {
        let id = SessionId::next();
        let companion = Arc::new(Companion::new(self.latency));
        self.repository.insert(id.clone(), Arc::clone(&companion))?;
        info!(session = %id, "session started");
        Ok((id, companion))
    }

    pub fn get(&self, id: &SessionId) -> Result<Arc<Companion>, AppError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| SessionError::NotActive(id.clone()).into())
    }

    pub fn discard(&self, id: &SessionId) -> Result<(), AppError> {
        if self.repository.remove(id)? {
            info!(session = %id, "session discarded");
            Ok(())
        } else {
            Err(SessionError::NotActive(id.clone()).into())
        }
    }
}
