//! Anomaly domain models.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Severity label attached to an anomaly.
///
/// The service has emitted both English labels and older Spanish ones
/// (`alta`, `media`, `baja`, `crítica`), so parsing accepts either. Labels
/// outside the known set are kept as `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Other(String),
}

/// How loudly a severity should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SeverityEmphasis {
    Neutral,
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "crítica" | "critica" | "critical" => Self::Critical,
            "alta" | "high" => Self::High,
            "media" | "medium" => Self::Medium,
            "baja" | "low" => Self::Low,
            _ => Self::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Other(raw) => raw,
        }
    }

    pub fn emphasis(&self) -> SeverityEmphasis {
        match self {
            Self::Critical | Self::High => SeverityEmphasis::High,
            Self::Medium => SeverityEmphasis::Medium,
            Self::Low => SeverityEmphasis::Low,
            Self::Other(_) => SeverityEmphasis::Neutral,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| Severity::parse(&s)).unwrap_or(Severity::Other(String::new())))
    }
}

/// Back-reference from an anomaly to the packet it was raised on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketSummary {
    pub id: i64,
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub src_ip: Option<String>,
    #[serde(default)]
    pub dst_ip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub id: i64,
    #[serde(rename = "type")]
    pub anomaly_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "unknown_severity")]
    pub severity: Severity,
    #[serde(default)]
    pub packet: Option<PacketSummary>,
}

fn unknown_severity() -> Severity {
    Severity::Other(String::new())
}

/// Body of `GET /database/sessions/{id}/anomalies`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnomalyPage {
    #[serde(default)]
    pub anomalies: Vec<Anomaly>,
    #[serde(default)]
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_legacy_spanish_labels() {
        assert_eq!(Severity::parse("Alta"), Severity::High);
        assert_eq!(Severity::parse("media"), Severity::Medium);
        assert_eq!(Severity::parse("BAJA"), Severity::Low);
        assert_eq!(Severity::parse("crítica"), Severity::Critical);
    }

    #[test]
    fn test_emphasis() {
        assert_eq!(Severity::Critical.emphasis(), SeverityEmphasis::High);
        assert_eq!(Severity::parse("high").emphasis(), SeverityEmphasis::High);
        assert_eq!(
            Severity::parse("whatever").emphasis(),
            SeverityEmphasis::Neutral
        );
    }

    #[test]
    fn test_deserialize_anomaly() {
        let anomaly: Anomaly = serde_json::from_str(
            r#"{"id": 3, "type": "port_scan", "description": "SYN sweep",
                "severity": "alta",
                "packet": {"id": 12, "timestamp": 1.5, "src_ip": "1.1.1.1", "dst_ip": "2.2.2.2"}}"#,
        )
        .unwrap();
        assert_eq!(anomaly.severity, Severity::High);
        assert_eq!(anomaly.packet.unwrap().id, 12);
    }

    #[test]
    fn test_deserialize_null_severity() {
        let anomaly: Anomaly =
            serde_json::from_str(r#"{"id": 1, "type": "x", "severity": null}"#).unwrap();
        assert_eq!(anomaly.severity.emphasis(), SeverityEmphasis::Neutral);
    }
}
