mod helper;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use helper::ChatHelper;
use netlens_application::{ChatSessionController, SendOutcome};
use netlens_core::session::SessionSelection;
use netlens_core::slash_command::builtin_commands;
use netlens_infrastructure::{ConfigService, LogTarget, init_logging};
use netlens_interaction::HttpCaptureApi;

/// Chat with the capture analysis assistant.
#[derive(Parser, Debug)]
#[command(name = "netlens-chat", version, about)]
struct Args {
    /// Base URL of the analysis service
    #[arg(long, env = "NETLENS_API_URL")]
    api_url: Option<String>,

    /// Database file the questions refer to
    #[arg(long)]
    db_file: Option<String>,

    /// Capture session the questions refer to
    #[arg(long)]
    session: Option<String>,
}

/// Line-oriented chat front-end.
///
/// Each line is handed to the [`ChatSessionController`]; the REPL waits for
/// the outcome before prompting again, so at most one question is ever in
/// flight. Logs go to file only so they do not interleave with the prompt.
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = ConfigService::new()?.load()?;
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }
    let _guard = init_logging(&config.logging, LogTarget::File, "netlens-chat")?;

    let api = Arc::new(HttpCaptureApi::with_timeout(
        &config.api.base_url,
        config.api.timeout(),
    )?);
    let chat = ChatSessionController::new(api, SessionSelection::new(args.db_file, args.session));
    tracing::info!(base_url = %config.api.base_url, "Chat REPL started");

    let mut rl: Editor<ChatHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ChatHelper::new()));

    print_banner(&chat.selection().await);

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "¡Hasta luego!".bright_green());
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if !trimmed.starts_with('/') {
                    println!("{}", format!("> {trimmed}").cyan());
                }
                let outcome = chat.send_message(&line).await;
                print_outcome(&outcome);
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detectado. Escribe 'quit' para salir.".yellow());
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}

fn print_banner(selection: &SessionSelection) {
    println!("{}", "=== Netlens chat ===".bright_magenta().bold());
    let scope = match (&selection.db_file, &selection.session_id) {
        (_, None) => "sin sesión seleccionada".to_string(),
        (Some(db), Some(id)) => format!("sesión {id} de {db}"),
        (None, Some(id)) => format!("sesión {id}"),
    };
    println!("{}", format!("Contexto: {scope}").bright_black());
    for command in builtin_commands() {
        println!(
            "  {:<20} {}",
            command.usage.yellow(),
            command.description.bright_black()
        );
    }
    println!("{}", "Escribe 'quit' para salir.".bright_black());
    println!();
}

fn print_outcome(outcome: &SendOutcome) {
    match outcome {
        SendOutcome::Ignored => {}
        SendOutcome::Command { notice } => {
            for line in notice.lines() {
                println!("{}", line.yellow());
            }
        }
        SendOutcome::Replied { response } => {
            for line in response.lines() {
                println!("{}", line.bright_blue());
            }
            println!();
        }
        SendOutcome::Failed { error } => {
            eprintln!("{}", error.red());
        }
    }
}
