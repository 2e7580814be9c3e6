//! Local state owned by one chat session controller.

use serde::{Deserialize, Serialize};

use super::{ChatMessage, QuestionHistory, UserPreference};

/// Whether an assistant call is outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChatPhase {
    #[default]
    Idle,
    Sending,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatState {
    pub transcript: Vec<ChatMessage>,
    pub preference: UserPreference,
    pub history: QuestionHistory,
    /// Side-channel error banner; never written into the transcript.
    pub error: Option<String>,
    pub phase: ChatPhase,
}

impl ChatState {
    pub fn is_sending(&self) -> bool {
        self.phase == ChatPhase::Sending
    }

    pub fn push_notice(&mut self, notice: impl Into<String>) {
        self.transcript.push(ChatMessage::system(notice));
    }
}
