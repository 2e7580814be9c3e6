//! Anomalies detected by the service in a capture session.

pub mod model;

pub use model::{Anomaly, AnomalyPage, PacketSummary, Severity, SeverityEmphasis};
