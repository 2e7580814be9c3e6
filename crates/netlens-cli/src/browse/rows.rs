use netlens_core::anomaly::{Anomaly, SeverityEmphasis};
use netlens_core::packet::Packet;
use ratatui::layout::Constraint;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Cell, Row};

use crate::output::timestamp_label;

/// How one item is laid out as a table row.
pub trait TableRow: Clone + Send + Sync + 'static {
    fn headers() -> &'static [&'static str];
    fn widths() -> Vec<Constraint>;
    fn row(&self) -> Row<'static>;
}

impl TableRow for Packet {
    fn headers() -> &'static [&'static str] {
        &["#", "Hora", "Origen", "Destino", "Protocolo", "Long.", "Detalles"]
    }

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Length(7),
            Constraint::Length(24),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Length(7),
            Constraint::Min(20),
        ]
    }

    fn row(&self) -> Row<'static> {
        let style = if self.has_anomalies() {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(self.packet_number.to_string()),
            Cell::from(timestamp_label(self)),
            Cell::from(self.src_ip.clone().unwrap_or_else(|| "-".to_string())),
            Cell::from(self.dst_ip.clone().unwrap_or_else(|| "-".to_string())),
            Cell::from(self.protocol.clone().unwrap_or_else(|| "-".to_string())),
            Cell::from(self.length.to_string()),
            Cell::from(self.details_summary()),
        ])
        .style(style)
    }
}

impl TableRow for Anomaly {
    fn headers() -> &'static [&'static str] {
        &["ID", "Severidad", "Tipo", "Descripción", "Paquete"]
    }

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Length(22),
            Constraint::Min(30),
            Constraint::Length(9),
        ]
    }

    fn row(&self) -> Row<'static> {
        let severity_style = match self.severity.emphasis() {
            SeverityEmphasis::High => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            SeverityEmphasis::Medium => Style::default().fg(Color::Yellow),
            SeverityEmphasis::Low => Style::default().fg(Color::Green),
            SeverityEmphasis::Neutral => Style::default(),
        };
        Row::new(vec![
            Cell::from(self.id.to_string()),
            Cell::from(self.severity.to_string()).style(severity_style),
            Cell::from(self.anomaly_type.clone()),
            Cell::from(self.description.clone()),
            Cell::from(self.packet.as_ref().map(|p| p.id.to_string()).unwrap_or_default()),
        ])
    }
}
