//! Session lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle timeout in minutes before a session is considered expired.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_minutes: u64,
    /// Interval for the expired-session sweep in minutes.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_minutes: u64,
    /// Active-session count above which a concurrency-burst anomaly is raised.
    #[serde(default = "default_burst_threshold")]
    pub anomaly_burst_threshold: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_minutes: default_idle_timeout(),
            sweep_interval_minutes: default_sweep_interval(),
            anomaly_burst_threshold: default_burst_threshold(),
        }
    }
}

fn default_idle_timeout() -> u64 {
    30
}

fn default_sweep_interval() -> u64 {
    15
}

fn default_burst_threshold() -> u32 {
    3
}
