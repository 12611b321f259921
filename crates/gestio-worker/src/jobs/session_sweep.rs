//! Idle session sweep job handler.

use std::sync::Arc;

use tracing;

use gestio_auth::SessionRegistry;
use gestio_core::result::AppResult;

/// Expires sessions that sat idle past the configured timeout.
#[derive(Debug, Clone)]
pub struct SessionSweepJob {
    /// Session registry driving the sweep.
    registry: Arc<SessionRegistry>,
}

impl SessionSweepJob {
    /// Create a new session sweep job
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Run one sweep cycle. Returns the number of sessions expired.
    pub async fn run(&self) -> AppResult<u64> {
        tracing::debug!("Running idle session sweep");

        let expired = self.registry.sweep_expired().await?;

        if expired > 0 {
            tracing::info!("Expired {} idle sessions", expired);
        }

        Ok(expired)
    }
}
