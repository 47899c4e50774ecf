//! Conversation controller: drives one question through the answer stream.
//!
//! State machine: `Idle -> AwaitingResponse -> Idle`. Only one request may
//! be outstanding; a second send while awaiting is rejected. Frames are
//! processed strictly in arrival order and nothing is consumed after the
//! terminal frame, even if the transport keeps delivering data.

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use docuchat_types::chat::{ChatMessage, MessageMetadata};
use docuchat_types::error::ChatError;
use docuchat_types::stream::{DebugInfo, StreamFrame};

use crate::api::ChatApi;

use super::store::SessionStore;

/// User-facing explanation paired with any answer failure.
///
/// Structured backend detail is appended after it, never shown alone.
const ANSWER_ERROR_FALLBACK: &str =
    "Sorry, something went wrong while answering your question. Please try again.";

/// Phase of the conversation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    AwaitingResponse,
}

/// Two-step confirmation state for clearing the conversation.
///
/// Clearing is destructive, so it is a first-class request/confirm cycle:
/// [`ConversationController::request_reset`] arms it, and only
/// [`ConversationController::confirm_reset`] executes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetState {
    None,
    Pending,
}

/// How a send finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// A terminal answer frame arrived and an assistant message was appended.
    Answered,
    /// The request failed; an assistant-authored error message was appended.
    Failed,
    /// The request was aborted before a terminal frame; nothing beyond the
    /// user's own message was appended.
    Cancelled,
}

/// Orchestrates sending a message: optimistic append, stream consumption,
/// and committing the terminal frame into the [`SessionStore`].
pub struct ConversationController<A: ChatApi> {
    store: SessionStore<A>,
    state: ConversationState,
    reset: ResetState,
    last_debug: Option<DebugInfo>,
    request_seq: u64,
}

impl<A: ChatApi> ConversationController<A> {
    pub fn new(store: SessionStore<A>) -> Self {
        Self {
            store,
            state: ConversationState::Idle,
            reset: ResetState::None,
            last_debug: None,
            request_seq: 0,
        }
    }

    /// Load sessions and select the most recent one (see [`SessionStore::init`]).
    pub async fn init(&mut self) -> Result<(), ChatError> {
        self.store.init().await
    }

    pub fn store(&self) -> &SessionStore<A> {
        &self.store
    }

    /// Mutable store access for session operations (create/rename/delete/
    /// select). The controller and store share one writer.
    pub fn store_mut(&mut self) -> &mut SessionStore<A> {
        &mut self.store
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// Most recent `debug` frame of the current or last request.
    pub fn last_debug(&self) -> Option<&DebugInfo> {
        self.last_debug.as_ref()
    }

    pub fn is_reset_pending(&self) -> bool {
        self.reset == ResetState::Pending
    }

    /// Send a question on the active session and consume the answer stream
    /// to its terminal frame.
    pub async fn send_message(&mut self, text: &str) -> Result<SendOutcome, ChatError> {
        self.send_message_with_cancel(text, CancellationToken::new())
            .await
    }

    /// [`Self::send_message`] with an externally held abort handle.
    ///
    /// Cancelling the token drops the in-flight stream (releasing the
    /// underlying connection); frames of an aborted request never mutate
    /// conversation state. A front end that supersedes a request cancels
    /// the old token before issuing the new send.
    pub async fn send_message_with_cancel(
        &mut self,
        text: &str,
        cancel: CancellationToken,
    ) -> Result<SendOutcome, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.state == ConversationState::AwaitingResponse {
            return Err(ChatError::Busy);
        }
        let active = self.store.active_session().ok_or(ChatError::NoActiveSession)?;

        // The offline sentinel id must never reach the server.
        let chat_id = (!active.is_local()).then(|| active.id.clone());

        // New activity invalidates a pending reset request.
        self.reset = ResetState::None;

        self.request_seq += 1;
        let request_id = self.request_seq;
        self.last_debug = None;

        self.store.push_message(ChatMessage::user(text));
        self.state = ConversationState::AwaitingResponse;
        debug!(request_id, chat_id = chat_id.as_deref(), "starting answer stream");

        let mut stream = self.store.api().ask_stream(text, chat_id.as_deref());

        let outcome = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(request_id, "answer stream aborted by caller");
                    break SendOutcome::Cancelled;
                }
                next = stream.next() => match next {
                    Some(Ok(frame)) => match frame {
                        StreamFrame::FinalAnswer {
                            answer,
                            selected_document,
                            selection_score,
                            documents_considered,
                        } => {
                            let metadata = MessageMetadata {
                                selected_document,
                                selection_score,
                                documents_considered,
                            };
                            self.store
                                .push_message(ChatMessage::assistant(answer, Some(metadata)));
                            break SendOutcome::Answered;
                        }
                        StreamFrame::DirectAnswer { answer } => {
                            self.store.push_message(ChatMessage::assistant(answer, None));
                            break SendOutcome::Answered;
                        }
                        StreamFrame::Error { error } => {
                            warn!(request_id, error = %error, "backend reported answer failure");
                            self.store
                                .push_message(ChatMessage::assistant_error(error_content(&error)));
                            break SendOutcome::Failed;
                        }
                        StreamFrame::Debug { message, intent } => {
                            debug!(request_id, %message, %intent, "debug frame");
                            self.last_debug = Some(DebugInfo { message, intent });
                        }
                        StreamFrame::Unknown => {
                            debug!(request_id, "ignoring unknown frame type");
                        }
                    },
                    Some(Err(err)) => {
                        warn!(request_id, error = %err, "answer stream failed");
                        self.store
                            .push_message(ChatMessage::assistant_error(error_content(&err.to_string())));
                        break SendOutcome::Failed;
                    }
                    None => {
                        warn!(request_id, "answer stream ended without a terminal frame");
                        self.store
                            .push_message(ChatMessage::assistant_error(error_content("")));
                        break SendOutcome::Failed;
                    }
                }
            }
        };

        self.state = ConversationState::Idle;
        Ok(outcome)
    }

    /// Arm the two-step conversation reset.
    pub fn request_reset(&mut self) -> Result<(), ChatError> {
        if self.store.active_session().is_none() {
            return Err(ChatError::NoActiveSession);
        }
        self.reset = ResetState::Pending;
        Ok(())
    }

    /// Execute a previously requested reset, replacing the conversation
    /// with a single fresh welcome message.
    pub fn confirm_reset(&mut self) -> Result<(), ChatError> {
        if self.reset != ResetState::Pending {
            return Err(ChatError::NoPendingReset);
        }
        self.store.reset_messages();
        self.reset = ResetState::None;
        Ok(())
    }

    /// Disarm a pending reset without clearing anything.
    pub fn cancel_reset(&mut self) {
        self.reset = ResetState::None;
    }
}

/// Compose the content of an assistant-authored error message.
///
/// Raw backend detail is shown only alongside the fixed fallback sentence.
fn error_content(detail: &str) -> String {
    let detail = detail.trim();
    if detail.is_empty() {
        ANSWER_ERROR_FALLBACK.to_string()
    } else {
        format!("{ANSWER_ERROR_FALLBACK}\n\n({detail})")
    }
}
