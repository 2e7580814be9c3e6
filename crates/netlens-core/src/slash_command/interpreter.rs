//! Mapping from chat input to commands, and from commands to state changes.

use std::str::FromStr;

use super::builtin::usage_list;
use crate::chat::{ChatState, UserPreference};

/// What a line typed into the chat is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    /// Nothing but whitespace; ignored.
    Empty,
    /// Leading `/`; handled locally.
    Command(ChatCommand),
    /// Anything else; sent to the assistant as typed.
    Query(String),
}

/// A parsed slash command. Every input maps to one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    SetPreference(UserPreference),
    Reset,
    ShowHistory,
    ClearHistory,
    Unknown(String),
}

/// Classifies a raw line from the input box.
pub fn classify(text: &str) -> ChatInput {
    if text.trim().is_empty() {
        return ChatInput::Empty;
    }
    match text.strip_prefix('/') {
        Some(rest) => ChatInput::Command(interpret(rest)),
        None => ChatInput::Query(text.to_string()),
    }
}

/// Maps the text after `/` to a command, ignoring case and surrounding
/// whitespace.
pub fn interpret(token: &str) -> ChatCommand {
    let normalized = token.trim().to_lowercase();
    if let Ok(preference) = UserPreference::from_str(&normalized) {
        return ChatCommand::SetPreference(preference);
    }
    match normalized.as_str() {
        "reiniciar" => ChatCommand::Reset,
        "historial" => ChatCommand::ShowHistory,
        "borrar_historial" => ChatCommand::ClearHistory,
        _ => ChatCommand::Unknown(token.trim().to_string()),
    }
}

impl ChatCommand {
    /// Whether the service must acknowledge the command before local state
    /// may change.
    pub fn needs_remote_clear(&self) -> bool {
        matches!(self, Self::Reset)
    }

    /// Applies the command to local chat state and appends its notice to the
    /// transcript. Returns the notice.
    ///
    /// For [`ChatCommand::Reset`] this is only the local half; the caller
    /// clears the server-side conversation first.
    pub fn apply(&self, state: &mut ChatState) -> String {
        let notice = match self {
            Self::SetPreference(preference) => {
                state.preference = *preference;
                format!("Preferencia cambiada a: {preference}")
            }
            Self::Reset => {
                state.transcript.clear();
                state.history.clear();
                state.error = None;
                "Chat reiniciado".to_string()
            }
            Self::ShowHistory => state.history.listing(),
            Self::ClearHistory => {
                state.history.clear();
                "Historial de preguntas borrado".to_string()
            }
            Self::Unknown(token) => format!(
                "Comando no reconocido: /{token}. Comandos disponibles: {}",
                usage_list()
            ),
        };
        state.push_notice(notice.clone());
        notice
    }
}
