use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use netlens_core::slash_command::{builtin_commands, find_builtin_command};
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// Rustyline helper for the chat prompt: slash-command completion,
/// highlighting and inline hints.
#[derive(Clone)]
pub struct ChatHelper {
    commands: Vec<String>,
}

impl ChatHelper {
    pub fn new() -> Self {
        Self {
            commands: builtin_commands().iter().map(|c| c.usage.to_string()).collect(),
        }
    }

    /// Commands starting with what has been typed so far.
    fn completions(&self, line: &str) -> Vec<&str> {
        if !line.starts_with('/') || line.contains(' ') {
            return Vec::new();
        }
        let typed = line.to_lowercase();
        self.commands
            .iter()
            .filter(|cmd| cmd.starts_with(&typed))
            .map(String::as_str)
            .collect()
    }

    /// The rest of the first matching command, or the description once a
    /// command is typed in full.
    fn hint_for(&self, line: &str) -> Option<String> {
        let typed = line.to_lowercase();
        if let Some(command) = typed.strip_prefix('/').and_then(find_builtin_command) {
            return Some(format!("  {}", command.description));
        }
        self.completions(line)
            .into_iter()
            .find(|cmd| cmd.len() > typed.len())
            .map(|cmd| cmd[typed.len()..].to_string())
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .completions(&line[..pos])
            .into_iter()
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_yellow().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.hint_for(line)
    }
}

impl Validator for ChatHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completes_prefix() {
        let helper = ChatHelper::new();
        assert_eq!(helper.completions("/h"), vec!["/historial"]);
        assert_eq!(helper.completions("/"), helper.commands.iter().map(String::as_str).collect::<Vec<_>>());
        assert!(helper.completions("hola").is_empty());
        assert!(helper.completions("/corto ya").is_empty());
    }

    #[test]
    fn test_hint_is_remaining_suffix() {
        let helper = ChatHelper::new();
        assert_eq!(helper.hint_for("/reini").as_deref(), Some("ciar"));
        assert_eq!(helper.hint_for("/BORR").as_deref(), Some("ar_historial"));
        assert_eq!(helper.hint_for("hola"), None);
    }

    #[test]
    fn test_full_command_hints_description() {
        let helper = ChatHelper::new();
        assert_eq!(
            helper.hint_for("/Historial").as_deref(),
            Some("  Muestra las preguntas realizadas")
        );
        assert_eq!(helper.hint_for("/historial ").as_deref(), None);
    }
}
