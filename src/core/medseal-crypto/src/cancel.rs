//! Cooperative cancellation.
//!
//! A token is checked between pipeline stages and between hash chunks. Work that
//! has already started on a stage always runs to the end of that stage.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::CryptoError;

/// Shared cancellation flag. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token in the "not cancelled" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Fails with [`CryptoError::Cancelled`] once cancellation has been requested.
    pub fn check(&self) -> Result<(), CryptoError> {
        if self.is_cancelled() {
            return Err(CryptoError::Cancelled);
        }
        Ok(())
    }
}
