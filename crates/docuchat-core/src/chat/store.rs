//! Session store: the client-side view of the backend's session list.
//!
//! Holds the session list (most recently updated first, backend order
//! trusted as-is), the active session id, and the active session's message
//! list. Session operations apply optimistically and roll back on backend
//! failure; the store never ends up without an active session.

use chrono::Utc;
use tracing::warn;

use docuchat_types::chat::{ChatMessage, ChatSession, LOCAL_SESSION_ID};
use docuchat_types::error::ChatError;

use crate::api::ChatApi;

use super::WELCOME_MESSAGE;

/// Length the session-list `last_message` preview is clipped to.
const PREVIEW_CHARS: usize = 100;

/// Title given to sessions created without an explicit one.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// Client-side session and message state over a [`ChatApi`] backend.
///
/// All mutation flows through this store (single writer); the rendering
/// layer only reads.
pub struct SessionStore<A: ChatApi> {
    api: A,
    sessions: Vec<ChatSession>,
    active_id: Option<String>,
    messages: Vec<ChatMessage>,
}

impl<A: ChatApi> SessionStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            sessions: Vec::new(),
            active_id: None,
            messages: Vec::new(),
        }
    }

    /// Access the backend port (for the controller and front ends).
    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active_session(&self) -> Option<&ChatSession> {
        let id = self.active_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether the store is running against the offline sentinel session.
    pub fn is_offline(&self) -> bool {
        self.active_id.as_deref() == Some(LOCAL_SESSION_ID)
    }

    /// Load the session list and select the most recent session.
    ///
    /// Creates a session when the backend has none. When the backend is
    /// unreachable the store degrades to the in-memory `local-chat`
    /// session rather than failing; the error is logged and surfaced via
    /// [`Self::is_offline`].
    pub async fn init(&mut self) -> Result<(), ChatError> {
        match self.api.list_chats().await {
            Ok(chats) if chats.is_empty() => {
                self.sessions = Vec::new();
                self.create(DEFAULT_SESSION_TITLE).await?;
                Ok(())
            }
            Ok(chats) => {
                self.sessions = chats;
                let first_id = self.sessions[0].id.clone();
                self.activate(&first_id).await;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "backend unreachable, falling back to local session");
                self.go_offline();
                Ok(())
            }
        }
    }

    /// Create a session on the backend, put it at the front, select it.
    pub async fn create(&mut self, title: &str) -> Result<&ChatSession, ChatError> {
        let title = title.trim();
        let title = if title.is_empty() { DEFAULT_SESSION_TITLE } else { title };
        let session = self.api.create_chat(title).await?;

        // A successful create means the backend is reachable again; drop
        // the offline sentinel if it was in place.
        self.sessions.retain(|s| !s.is_local());

        let id = session.id.clone();
        self.sessions.insert(0, session);
        self.active_id = Some(id);
        self.messages = vec![ChatMessage::system(WELCOME_MESSAGE)];
        Ok(&self.sessions[0])
    }

    /// Rename a session, rejecting empty titles before any round trip.
    ///
    /// Applied optimistically; restored to the previous title when the
    /// backend rejects the rename.
    pub async fn rename(&mut self, id: &str, title: &str) -> Result<(), ChatError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ChatError::EmptyTitle);
        }

        let index = self.index_of(id)?;
        let previous = std::mem::replace(&mut self.sessions[index].title, title.to_string());

        if id == LOCAL_SESSION_ID {
            return Ok(());
        }

        if let Err(err) = self.api.rename_chat(id, title).await {
            self.sessions[index].title = previous;
            return Err(err.into());
        }
        Ok(())
    }

    /// Delete a session, restoring it on backend failure.
    ///
    /// When the active session is deleted, selection falls back to the new
    /// first session, or a fresh session is created when none remain.
    pub async fn delete(&mut self, id: &str) -> Result<(), ChatError> {
        let index = self.index_of(id)?;
        let removed = self.sessions.remove(index);
        let was_active = self.active_id.as_deref() == Some(id);

        if !removed.is_local() {
            if let Err(err) = self.api.delete_chat(id).await {
                self.sessions.insert(index, removed);
                return Err(err.into());
            }
        }

        if was_active {
            self.active_id = None;
            self.fall_back_selection().await;
        }
        Ok(())
    }

    /// Make a session active, replacing the local message list with the
    /// backend's authoritative one.
    ///
    /// A fetch failure leaves the previously active session and its
    /// messages untouched.
    pub async fn select(&mut self, id: &str) -> Result<(), ChatError> {
        self.index_of(id)?;

        if id == LOCAL_SESSION_ID {
            self.active_id = Some(id.to_string());
            self.messages = vec![ChatMessage::system(WELCOME_MESSAGE)];
            return Ok(());
        }

        let fetched = self.api.chat_messages(id).await?;
        self.active_id = Some(id.to_string());
        self.messages = if fetched.is_empty() {
            vec![ChatMessage::system(WELCOME_MESSAGE)]
        } else {
            fetched
        };
        Ok(())
    }

    /// Re-fetch the session list, keeping the active session when it still
    /// exists and falling back otherwise.
    pub async fn refresh(&mut self) -> Result<(), ChatError> {
        let chats = self.api.list_chats().await?;
        self.sessions = chats;

        let still_active = self
            .active_id
            .as_deref()
            .is_some_and(|id| self.sessions.iter().any(|s| s.id == id));
        if !still_active {
            self.active_id = None;
            self.fall_back_selection().await;
        }
        Ok(())
    }

    /// Append a message to the active conversation and mirror it into the
    /// session summary.
    pub(crate) fn push_message(&mut self, message: ChatMessage) {
        if let Some(id) = self.active_id.as_deref() {
            if let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) {
                session.message_count += 1;
                session.last_message = preview(&message.content);
                session.updated_at = Utc::now();
            }
        }
        self.messages.push(message);
    }

    /// Replace the conversation with a single fresh welcome message.
    pub(crate) fn reset_messages(&mut self) {
        self.messages = vec![ChatMessage::system(WELCOME_MESSAGE)];
    }

    fn index_of(&self, id: &str) -> Result<usize, ChatError> {
        self.sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| ChatError::SessionNotFound(id.to_string()))
    }

    fn go_offline(&mut self) {
        self.sessions = vec![ChatSession::local()];
        self.active_id = Some(LOCAL_SESSION_ID.to_string());
        self.messages = vec![ChatMessage::system(WELCOME_MESSAGE)];
    }

    /// Set a session active, degrading to a welcome screen when its
    /// message list cannot be fetched.
    async fn activate(&mut self, id: &str) {
        if let Err(err) = self.select(id).await {
            warn!(session_id = id, error = %err, "could not fetch messages, starting empty");
            self.active_id = Some(id.to_string());
            self.messages = vec![ChatMessage::system(WELCOME_MESSAGE)];
        }
    }

    /// Select the first remaining session, create a fresh one when the
    /// list is empty, or go offline when even that fails. The store is
    /// never left without an active session.
    async fn fall_back_selection(&mut self) {
        if let Some(first_id) = self.sessions.first().map(|s| s.id.clone()) {
            self.activate(&first_id).await;
            return;
        }
        if let Err(err) = self.create(DEFAULT_SESSION_TITLE).await {
            warn!(error = %err, "could not create replacement session, going offline");
            self.go_offline();
        }
    }
}

fn preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_CHARS {
        content.to_string()
    } else {
        let clipped: String = content.chars().take(PREVIEW_CHARS).collect();
        format!("{clipped}...")
    }
}
