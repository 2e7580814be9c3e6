//! Conversation state for the assistant chat.

pub mod history;
pub mod message;
pub mod preference;
pub mod state;

pub use history::QuestionHistory;
pub use message::{ChatMessage, MessageRole};
pub use preference::UserPreference;
pub use state::{ChatPhase, ChatState};
