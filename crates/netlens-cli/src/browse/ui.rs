use netlens_application::PagedResource;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
};

use super::app::App;
use super::rows::TableRow;
use crate::output::pagination_line;

pub fn draw<R>(frame: &mut Frame, app: &App<R>)
where
    R: PagedResource,
    R::Item: TableRow,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filters
            Constraint::Min(5),    // Table
            Constraint::Length(2), // Status + keys
        ])
        .split(frame.size());

    draw_filters(frame, chunks[0], app);
    draw_table(frame, chunks[1], app);
    draw_status(frame, chunks[2], app);
}

fn draw_filters<R: PagedResource>(frame: &mut Frame, area: Rect, app: &App<R>) {
    let mut spans = Vec::new();
    for (i, field) in app.fields().iter().enumerate() {
        let label_style = if i == app.focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("{field}: "), label_style));
        let value = app.field_value(field);
        let shown = if i == app.focused {
            format!("{value}_")
        } else {
            value.to_string()
        };
        spans.push(Span::raw(shown));
        spans.push(Span::raw("   "));
    }
    let filters = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Filtros"));
    frame.render_widget(filters, area);
}

fn draw_table<R>(frame: &mut Frame, area: Rect, app: &App<R>)
where
    R: PagedResource,
    R::Item: TableRow,
{
    let header = Row::new(R::Item::headers().to_vec())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);
    let rows: Vec<Row> = app.result.items.iter().map(|item| item.row()).collect();
    let table = Table::new(rows, R::Item::widths())
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(app.title.clone()));
    frame.render_widget(table, area);
}

fn draw_status<R: PagedResource>(frame: &mut Frame, area: Rect, app: &App<R>) {
    let status = if let Some(error) = &app.result.error {
        Span::styled(error.clone(), Style::default().fg(Color::Red))
    } else if app.result.loading {
        Span::styled("Cargando...", Style::default().fg(Color::Yellow))
    } else {
        Span::raw(pagination_line(&app.page, app.result.total))
    };
    let keys = Span::styled(
        "Tab campo  ←/→ página  Enter aplicar  F5 recargar  Esc salir",
        Style::default().fg(Color::DarkGray),
    );
    let text = vec![Line::from(status), Line::from(keys)];
    frame.render_widget(Paragraph::new(text), area);
}
