//! Session analytics models.

use serde::{Deserialize, Serialize};

/// Body of `GET /database/analytics/{id}`. Every list defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalytics {
    /// Capture duration in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub packet_count: u64,
    #[serde(default)]
    pub protocols: Vec<CountByProtocol>,
    #[serde(default)]
    pub top_communications: Vec<Communication>,
    #[serde(default)]
    pub tcp_ports: Vec<CountByPort>,
    #[serde(default)]
    pub udp_ports: Vec<CountByPort>,
    #[serde(default)]
    pub icmp_types: Vec<IcmpTypeCount>,
    #[serde(default)]
    pub anomalies: AnomalySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountByProtocol {
    #[serde(default)]
    pub protocol: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Communication {
    #[serde(default)]
    pub src_ip: Option<String>,
    #[serde(default)]
    pub dst_ip: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountByPort {
    pub port: u32,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcmpTypeCount {
    #[serde(rename = "type")]
    pub icmp_type: serde_json::Value,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalySummary {
    #[serde(default)]
    pub by_type: Vec<CountByType>,
    #[serde(default)]
    pub by_severity: Vec<CountBySeverity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountByType {
    #[serde(rename = "type")]
    pub anomaly_type: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountBySeverity {
    pub severity: String,
    pub count: u64,
}

impl SessionAnalytics {
    pub fn total_anomalies(&self) -> u64 {
        self.anomalies.by_type.iter().map(|a| a.count).sum()
    }

    /// Duration rendered the way the analysis view shows it.
    pub fn duration_label(&self) -> String {
        match self.duration {
            Some(seconds) => format!("{seconds:.2} segundos"),
            None => "N/A".to_string(),
        }
    }
}
