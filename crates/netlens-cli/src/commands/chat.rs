use anyhow::{Result, bail};
use colored::Colorize;
use netlens_application::{ChatSessionController, SendOutcome};
use netlens_core::chat::UserPreference;
use netlens_core::session::SessionSelection;

use super::Context;

/// Asks a single question. Slash commands are rejected here; they only make
/// sense inside a conversation (`netlens-chat`).
pub async fn ask(
    ctx: &Context,
    message: &str,
    session: Option<String>,
    db_file: Option<String>,
    preference: UserPreference,
) -> Result<()> {
    if message.trim_start().starts_with('/') {
        bail!("Los comandos solo están disponibles en netlens-chat");
    }

    let chat = ChatSessionController::new(ctx.api.clone(), SessionSelection::new(db_file, session));
    if preference != UserPreference::default() {
        chat.send_message(&format!("/{preference}")).await;
    }

    match chat.send_message(message).await {
        SendOutcome::Replied { response } => {
            println!("{}", response.bright_blue());
            Ok(())
        }
        SendOutcome::Failed { error } => bail!(error),
        SendOutcome::Ignored => bail!("La pregunta está vacía"),
        SendOutcome::Command { notice } => {
            println!("{}", notice.yellow());
            Ok(())
        }
    }
}
