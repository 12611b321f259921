//! Best-effort login anomaly detection.

pub mod detector;
pub mod fingerprint;

pub use detector::AnomalyDetector;
pub use fingerprint::DeviceFingerprint;
