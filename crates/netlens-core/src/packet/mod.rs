//! Captured packets as served by the analysis service.

pub mod model;

pub use model::{Packet, PacketAnomalyRef, PacketPage};
