//! Aggregate statistics computed by the service for a session.

pub mod model;

pub use model::{
    AnomalySummary, CountByPort, CountByProtocol, CountBySeverity, CountByType,
    Communication, IcmpTypeCount, SessionAnalytics,
};
