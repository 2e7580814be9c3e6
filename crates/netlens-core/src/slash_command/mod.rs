//! Slash commands understood by the chat.
//!
//! Input starting with `/` never reaches the assistant. The remainder is
//! mapped by [`interpret`] onto a [`ChatCommand`], which is applied to the
//! local [`ChatState`](crate::chat::ChatState).

pub mod builtin;
pub mod interpreter;

pub use builtin::{builtin_commands, find_builtin_command, BuiltinSlashCommand};
pub use interpreter::{classify, interpret, ChatCommand, ChatInput};
