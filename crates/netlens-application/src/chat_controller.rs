//! ChatSessionController - one conversation with the analysis assistant.
//!
//! Owns the transcript, response-length preference, question history and
//! error banner of a chat, plus the session it is scoped to. Slash commands
//! are handled locally; everything else goes to the assistant. At most one
//! remote call is outstanding at a time: input arriving while one is in
//! flight is ignored, not queued.

use netlens_core::api::{CaptureApi, ChatRequest};
use netlens_core::chat::{ChatMessage, ChatPhase, ChatState};
use netlens_core::session::SessionSelection;
use netlens_core::slash_command::{ChatCommand, ChatInput, classify};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

pub const SEND_FAILED: &str = "Error al enviar el mensaje o recibir la respuesta de la IA.";
pub const CLEAR_FAILED: &str = "Error al limpiar el historial del chat.";

/// What happened to one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or a call was already outstanding.
    Ignored,
    /// A slash command ran; `notice` was appended as a system message.
    Command { notice: String },
    /// The assistant answered.
    Replied { response: String },
    /// The remote call failed; `error` is now the chat's error banner.
    Failed { error: String },
}

struct ChatSession {
    state: ChatState,
    selection: SessionSelection,
}

pub struct ChatSessionController {
    api: Arc<dyn CaptureApi>,
    session: Mutex<ChatSession>,
    updates: watch::Sender<ChatState>,
}

impl ChatSessionController {
    pub fn new(api: Arc<dyn CaptureApi>, selection: SessionSelection) -> Self {
        let (updates, _) = watch::channel(ChatState::default());
        Self {
            api,
            session: Mutex::new(ChatSession {
                state: ChatState::default(),
                selection,
            }),
            updates,
        }
    }

    /// Copy of the current chat state.
    pub async fn snapshot(&self) -> ChatState {
        self.session.lock().await.state.clone()
    }

    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.session.lock().await.state.transcript.clone()
    }

    /// Receiver notified after every state change, including the switch to
    /// `Sending`.
    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.updates.subscribe()
    }

    pub async fn selection(&self) -> SessionSelection {
        self.session.lock().await.selection.clone()
    }

    /// Rescopes later questions to another session. The transcript is kept.
    pub async fn set_selection(&self, selection: SessionSelection) {
        self.session.lock().await.selection = selection;
    }

    pub async fn dismiss_error(&self) {
        let mut session = self.session.lock().await;
        if session.state.error.take().is_some() {
            self.publish(&session.state);
        }
    }

    /// Handles one line typed by the operator.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let mut session = self.session.lock().await;
        if session.state.is_sending() {
            tracing::debug!("Assistant call outstanding, input ignored");
            return SendOutcome::Ignored;
        }

        match classify(text) {
            ChatInput::Empty => SendOutcome::Ignored,
            ChatInput::Command(command) if command.needs_remote_clear() => {
                session.state.phase = ChatPhase::Sending;
                self.publish(&session.state);
                drop(session);
                self.finish_clear(Some(command)).await
            }
            ChatInput::Command(command) => {
                tracing::debug!(?command, "Slash command");
                let notice = command.apply(&mut session.state);
                self.publish(&session.state);
                SendOutcome::Command { notice }
            }
            ChatInput::Query(question) => {
                let state = &mut session.state;
                state.transcript.push(ChatMessage::user(question.clone()));
                state.history.push(question.clone());
                state.error = None;
                state.phase = ChatPhase::Sending;
                let request = ChatRequest {
                    message: question,
                    session_id: session.selection.session_id.clone(),
                    db_file: session.selection.db_file.clone(),
                    user_preference: session.state.preference,
                };
                self.publish(&session.state);
                drop(session);

                tracing::info!(
                    session_id = ?request.session_id,
                    preference = %request.user_preference,
                    "Asking assistant"
                );
                let outcome = self.api.chat(&request).await;

                let mut session = self.session.lock().await;
                session.state.phase = ChatPhase::Idle;
                let result = match outcome {
                    Ok(reply) => {
                        session
                            .state
                            .transcript
                            .push(ChatMessage::assistant(reply.response.clone()));
                        SendOutcome::Replied {
                            response: reply.response,
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Assistant call failed");
                        session.state.error = Some(SEND_FAILED.to_string());
                        SendOutcome::Failed {
                            error: SEND_FAILED.to_string(),
                        }
                    }
                };
                self.publish(&session.state);
                result
            }
        }
    }

    /// Clears the server-side conversation, then the local transcript. On
    /// failure local state is left as it was and the error banner is set.
    /// Returns whether the chat was cleared.
    pub async fn clear_chat(&self) -> bool {
        {
            let mut session = self.session.lock().await;
            if session.state.is_sending() {
                return false;
            }
            session.state.phase = ChatPhase::Sending;
            self.publish(&session.state);
        }
        matches!(self.finish_clear(None).await, SendOutcome::Command { .. })
    }

    /// Remote half of `/reiniciar` and [`Self::clear_chat`]. The caller has
    /// already entered `Sending`.
    async fn finish_clear(&self, command: Option<ChatCommand>) -> SendOutcome {
        let outcome = self.api.clear_chat().await;

        let mut session = self.session.lock().await;
        session.state.phase = ChatPhase::Idle;
        let result = match outcome {
            Ok(()) => {
                tracing::info!("Chat history cleared");
                match command {
                    Some(command) => SendOutcome::Command {
                        notice: command.apply(&mut session.state),
                    },
                    None => {
                        session.state.transcript.clear();
                        session.state.error = None;
                        SendOutcome::Command {
                            notice: String::new(),
                        }
                    }
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Clearing chat history failed");
                session.state.error = Some(CLEAR_FAILED.to_string());
                SendOutcome::Failed {
                    error: CLEAR_FAILED.to_string(),
                }
            }
        };
        self.publish(&session.state);
        result
    }

    fn publish(&self, state: &ChatState) {
        self.updates.send_replace(state.clone());
    }
}
