//! Questions the operator asked during this chat session.

use serde::{Deserialize, Serialize};

/// Raw query strings in the order they were sent. Commands never land here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionHistory(Vec<String>);

impl QuestionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, question: impl Into<String>) {
        self.0.push(question.into());
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn questions(&self) -> &[String] {
        &self.0
    }

    /// The `/historial` notice: a 1-based numbered list, or a fixed message
    /// when nothing has been asked yet.
    pub fn listing(&self) -> String {
        if self.0.is_empty() {
            return "No hay preguntas en el historial".to_string();
        }
        let lines = self
            .0
            .iter()
            .enumerate()
            .map(|(i, q)| format!("{}. {}", i + 1, q))
            .collect::<Vec<_>>()
            .join("\n");
        format!("Historial de preguntas:\n{lines}")
    }
}
