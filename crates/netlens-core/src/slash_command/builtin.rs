//! Catalogue of the chat's slash commands.

use serde::Serialize;
use std::sync::OnceLock;

/// A builtin slash command provided by the client.
#[derive(Debug, Clone, Serialize)]
pub struct BuiltinSlashCommand {
    /// Command name (without the leading /)
    pub name: &'static str,
    /// Usage format (e.g., "/historial")
    pub usage: &'static str,
    /// Human-readable description
    pub description: &'static str,
}

impl BuiltinSlashCommand {
    pub const fn new(name: &'static str, usage: &'static str, description: &'static str) -> Self {
        Self {
            name,
            usage,
            description,
        }
    }
}

static BUILTIN_COMMANDS: OnceLock<Vec<BuiltinSlashCommand>> = OnceLock::new();

/// Returns every slash command, in the order they are listed to the user.
pub fn builtin_commands() -> &'static [BuiltinSlashCommand] {
    BUILTIN_COMMANDS.get_or_init(|| {
        vec![
            BuiltinSlashCommand::new("corto", "/corto", "Respuestas breves"),
            BuiltinSlashCommand::new("normal", "/normal", "Respuestas de longitud normal"),
            BuiltinSlashCommand::new("detallado", "/detallado", "Respuestas detalladas"),
            BuiltinSlashCommand::new(
                "reiniciar",
                "/reiniciar",
                "Borra la conversación aquí y en el servidor",
            ),
            BuiltinSlashCommand::new(
                "historial",
                "/historial",
                "Muestra las preguntas realizadas",
            ),
            BuiltinSlashCommand::new(
                "borrar_historial",
                "/borrar_historial",
                "Vacía el historial de preguntas",
            ),
        ]
    })
}

/// Find a builtin command by name.
pub fn find_builtin_command(name: &str) -> Option<&'static BuiltinSlashCommand> {
    builtin_commands().iter().find(|cmd| cmd.name == name)
}

/// `/corto, /normal, ...` as shown in the "not recognized" notice.
pub(crate) fn usage_list() -> String {
    builtin_commands()
        .iter()
        .map(|c| c.usage)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_commands_initialized() {
        let commands = builtin_commands();
        assert_eq!(commands.len(), 6);
        assert!(commands.iter().any(|c| c.name == "reiniciar"));
    }

    #[test]
    fn test_find_builtin_command() {
        assert!(find_builtin_command("historial").is_some());
        assert!(find_builtin_command("help").is_none());
    }
}
