//! Packet domain models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A packet stored in a capture session.
///
/// Packets are owned by the service; the client only ever holds a
/// read-only copy of one page of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    pub id: i64,
    pub packet_number: i64,
    /// Capture time in epoch seconds.
    pub timestamp: f64,
    #[serde(default)]
    pub src_ip: Option<String>,
    #[serde(default)]
    pub dst_ip: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub length: i64,
    /// Protocol-specific fields (ports, flags, ICMP type...).
    #[serde(default)]
    pub details: Option<Map<String, Value>>,
    #[serde(default)]
    pub anomalies: Vec<PacketAnomalyRef>,
}

/// Anomaly attached to a packet, as embedded in a packet listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketAnomalyRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, rename = "type")]
    pub anomaly_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

/// Body of `GET /database/sessions/{id}/packets`.
///
/// Both fields are optional on the wire and default to empty / zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PacketPage {
    #[serde(default)]
    pub packets: Vec<Packet>,
    #[serde(default)]
    pub total: u64,
}

impl Packet {
    /// Capture time as a UTC timestamp, if representable.
    pub fn captured_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let secs = self.timestamp.trunc() as i64;
        let nanos = (self.timestamp.fract() * 1e9).round() as u32;
        chrono::DateTime::from_timestamp(secs, nanos.min(999_999_999))
    }

    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }

    fn detail(&self, key: &str) -> String {
        match self.details.as_ref().and_then(|d| d.get(key)) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "undefined".to_string(),
            Some(other) => other.to_string(),
        }
    }

    /// One-line summary of the protocol-specific details.
    pub fn details_summary(&self) -> String {
        match self.protocol.as_deref() {
            Some("TCP") => format!(
                "Src:{} Dst:{} Flags:{}",
                self.detail("src_port"),
                self.detail("dst_port"),
                self.detail("flags")
            ),
            Some("UDP") => format!(
                "Src:{} Dst:{}",
                self.detail("src_port"),
                self.detail("dst_port")
            ),
            Some("ICMP") | Some("ICMPv6") => format!(
                "Tipo:{} ({}) Code:{}",
                self.detail("type_name"),
                self.detail("type"),
                self.detail("code")
            ),
            _ => String::new(),
        }
    }
}
