//! Plain-text rendering shared by the one-shot commands.

use colored::{ColoredString, Colorize};
use netlens_core::anomaly::{Anomaly, Severity, SeverityEmphasis};
use netlens_core::packet::Packet;
use netlens_core::query::PageState;

pub fn timestamp_label(packet: &Packet) -> String {
    packet
        .captured_at()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn packet_row(packet: &Packet) -> String {
    let marker = if packet.has_anomalies() { "!" } else { " " };
    format!(
        "{marker}{:>6}  {}  {:<15} -> {:<15} {:<6} {:>6}  {}",
        packet.packet_number,
        timestamp_label(packet),
        packet.src_ip.as_deref().unwrap_or("-"),
        packet.dst_ip.as_deref().unwrap_or("-"),
        packet.protocol.as_deref().unwrap_or("-"),
        packet.length,
        packet.details_summary(),
    )
}

pub fn anomaly_row(anomaly: &Anomaly) -> String {
    let packet = anomaly
        .packet
        .as_ref()
        .map(|p| format!("paquete {}", p.id))
        .unwrap_or_default();
    format!(
        "{:>6}  {:<10} {:<20} {}  {}",
        anomaly.id,
        severity_label(&anomaly.severity),
        anomaly.anomaly_type,
        anomaly.description,
        packet.bright_black(),
    )
}

pub fn severity_label(severity: &Severity) -> ColoredString {
    let text = severity.as_str();
    match severity.emphasis() {
        SeverityEmphasis::High => text.red().bold(),
        SeverityEmphasis::Medium => text.yellow(),
        SeverityEmphasis::Low => text.green(),
        SeverityEmphasis::Neutral => text.normal(),
    }
}

/// `Página 2/5 (93 en total)`
pub fn pagination_line(page: &PageState, total: u64) -> String {
    let pages = page.total_pages(total).max(1);
    format!(
        "Página {}/{} ({} en total)",
        page.current_page() + 1,
        pages,
        total
    )
}

pub fn size_label(size_kb: f64) -> String {
    if size_kb >= 1024.0 {
        format!("{:.2} MB", size_kb / 1024.0)
    } else {
        format!("{size_kb:.2} KB")
    }
}

pub fn print_failure(message: &str) {
    eprintln!("{}", message.red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_packet_row_contains_summary() {
        let packet: Packet = serde_json::from_value(json!({
            "id": 3,
            "packet_number": 42,
            "timestamp": 0.0,
            "src_ip": "10.0.0.1",
            "dst_ip": "10.0.0.2",
            "protocol": "UDP",
            "length": 128,
            "details": {"src_port": 5353, "dst_port": 53}
        }))
        .unwrap();

        let row = packet_row(&packet);
        assert!(row.starts_with("     42  1970-01-01 00:00:00.000"));
        assert!(row.ends_with("Src:5353 Dst:53"));
    }

    #[test]
    fn test_pagination_line() {
        let mut page = PageState::new(20);
        page.go_to(1, 93);
        assert_eq!(pagination_line(&page, 93), "Página 2/5 (93 en total)");
        assert_eq!(
            pagination_line(&PageState::new(20), 0),
            "Página 1/1 (0 en total)"
        );
    }

    #[test]
    fn test_size_label() {
        assert_eq!(size_label(512.0), "512.00 KB");
        assert_eq!(size_label(2048.0), "2.00 MB");
    }
}
