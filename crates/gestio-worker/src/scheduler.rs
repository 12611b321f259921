//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use gestio_core::config::SessionConfig;
use gestio_core::error::AppError;

use crate::jobs::SessionSweepJob;

/// Cron-based scheduler for periodic background tasks
pub struct MaintenanceScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Session sweep job
    sweep: Arc<SessionSweepJob>,
    /// Session configuration
    config: SessionConfig,
}

impl std::fmt::Debug for MaintenanceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaintenanceScheduler").finish()
    }
}

impl MaintenanceScheduler {
    /// Create a new maintenance scheduler
    pub async fn new(sweep: Arc<SessionSweepJob>, config: SessionConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            sweep,
            config,
        })
    }

    /// Register all default scheduled tasks
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_session_sweep().await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Maintenance scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Maintenance scheduler shut down");
        Ok(())
    }

    /// Idle session sweep, every `sweep_interval_minutes`
    async fn register_session_sweep(&self) -> Result<(), AppError> {
        // Cron minute fields only go to 59.
        let minutes = self.config.sweep_interval_minutes.clamp(1, 59);
        let schedule = format!("0 */{} * * * *", minutes);

        let sweep = Arc::clone(&self.sweep);
        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let sweep = Arc::clone(&sweep);
            Box::pin(async move {
                if let Err(e) = sweep.run().await {
                    tracing::error!("Session sweep failed: {}", e);
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create session_sweep schedule: {}", e))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add session_sweep schedule: {}", e))
        })?;

        tracing::info!("Registered: session_sweep (every {}min)", minutes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestio_auth::SessionRegistry;
    use gestio_store::memory::MemorySessionStore;

    #[tokio::test]
    async fn scheduler_starts_and_shuts_down() {
        let store = Arc::new(MemorySessionStore::new());
        let registry = Arc::new(SessionRegistry::new(store, SessionConfig::default()));
        let sweep = Arc::new(SessionSweepJob::new(registry));

        let mut scheduler = MaintenanceScheduler::new(sweep, SessionConfig::default())
            .await
            .unwrap();
        scheduler.register_default_tasks().await.unwrap();
        scheduler.start().await.unwrap();
        scheduler.shutdown().await.unwrap();
    }
}
