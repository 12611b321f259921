//! Scheduled background maintenance for Gestio sessions.

pub mod jobs;
pub mod scheduler;

pub use jobs::SessionSweepJob;
pub use scheduler::MaintenanceScheduler;
