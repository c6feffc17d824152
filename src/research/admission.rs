use crate::types::{AppError, Result};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::warn;

/// Coarse, process-wide ceiling on in-flight research requests.
///
/// Admission never waits: when every slot is taken the request is rejected
/// with [`AppError::Capacity`] so the caller can retry later. A slot is held by
/// an [`AdmissionPermit`] and returned when the permit is dropped, which also
/// happens when the request fails or unwinds.
#[derive(Debug)]
pub struct AdmissionController {
    semaphore: Arc<Semaphore>,
    ceiling: usize,
}

/// Proof of admission. Dropping it frees the slot.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionController {
    pub fn new(ceiling: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(ceiling)),
            ceiling,
        }
    }

    /// Take a slot or fail immediately with a capacity error.
    pub fn try_acquire(&self) -> Result<AdmissionPermit> {
        match self.semaphore.clone().try_acquire_owned() {
            Ok(permit) => Ok(AdmissionPermit { _permit: permit }),
            Err(_) => {
                warn!(ceiling = self.ceiling, "Admission ceiling reached, rejecting request");
                Err(AppError::Capacity(
                    "Too many requests. Please try again in a moment.".to_string(),
                ))
            }
        }
    }

    /// Requests currently holding a permit
    pub fn in_flight(&self) -> usize {
        self.ceiling
            .saturating_sub(self.semaphore.available_permits())
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }
}
