//! `netlens browse`: interactive packet/anomaly table.

mod app;
mod rows;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use netlens_application::{AnomalyResource, PacketResource, PagedResource, ResourceBrowser};
use netlens_core::query::{ResourceKey, ResourceKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::SessionArgs;
use crate::commands::Context;
use app::{App, KeyAction};
use rows::TableRow;

pub async fn run(ctx: &Context, target: &SessionArgs, kind: ResourceKind) -> Result<()> {
    let key = ResourceKey::new(target.db_file.clone(), target.session.clone());
    match kind {
        ResourceKind::Packets => {
            let limit = ctx.config.browse.packet_page_size;
            let browser = ResourceBrowser::with_limit(ctx.api.clone(), PacketResource, limit);
            browse(ctx, browser, key).await
        }
        ResourceKind::Anomalies => {
            let limit = ctx.config.browse.anomaly_page_size;
            let browser = ResourceBrowser::with_limit(ctx.api.clone(), AnomalyResource, limit);
            browse(ctx, browser, key).await
        }
    }
}

async fn browse<R>(ctx: &Context, browser: ResourceBrowser<R>, key: ResourceKey) -> Result<()>
where
    R: PagedResource,
    R::Item: TableRow,
{
    let browser = Arc::new(browser);
    let mut app = App::new(browser.clone(), ctx.config.browse.debounce(), key.to_string());
    tracing::info!(%key, kind = %browser.kind(), "Browsing");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let initial = tokio::spawn({
        let browser = browser.clone();
        async move { browser.set_resource(Some(key)).await }
    });

    let result = run_app(&mut terminal, &mut app).await;

    // Cleanup
    initial.abort();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B, R>(terminal: &mut Terminal<B>, app: &mut App<R>) -> Result<()>
where
    B: ratatui::backend::Backend,
    R: PagedResource,
    R::Item: TableRow,
{
    let tick_rate = Duration::from_millis(100);

    loop {
        app.update().await;

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Polling blocks this thread; the fetches run on the runtime's
        // worker threads meanwhile.
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }
                if app.handle_key(key) == KeyAction::Quit {
                    return Ok(());
                }
            }
        }
    }
}
