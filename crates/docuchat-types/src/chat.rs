//! Chat session and message types for docuchat.
//!
//! These types model conversations held on the backend: sessions (one per
//! server-side conversation thread) and the messages within them. Sessions
//! are identified by backend-assigned string ids; messages carry
//! client-generated ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Sentinel session id used when the backend is unreachable.
///
/// A session with this id lives purely in memory and must never be sent
/// to the server: streaming requests omit the `chat_id` field, and session
/// operations short-circuit locally.
pub const LOCAL_SESSION_ID: &str = "local-chat";

/// Role of a message within a conversation.
///
/// The backend's wire format uses `"bot"` for assistant messages; that
/// alias is accepted on deserialization and by [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    #[serde(alias = "bot")]
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" | "bot" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// Retrieval metadata attached to an assistant answer.
///
/// Present when the backend auto-selected a document for the query. The
/// fields are stored verbatim for display; the client does not validate
/// that `selected_document` names a real document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_considered: Option<u32>,
}

impl MessageMetadata {
    /// Whether any field is populated.
    pub fn is_empty(&self) -> bool {
        self.selected_document.is_none()
            && self.selection_score.is_none()
            && self.documents_considered.is_none()
    }
}

/// A single message within a chat session.
///
/// Messages are append-only; the content is the raw, pre-sanitization text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Client-generated unique id (UUID v7, time-sortable).
    pub id: String,
    pub role: MessageRole,
    /// Raw text as received; rendering/sanitization happens at display time.
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub is_success: bool,
}

impl ChatMessage {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: None,
            is_error: false,
            is_success: false,
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Build a system message (welcome banner, reset notice).
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Build a successful assistant answer with optional retrieval metadata.
    pub fn assistant(content: impl Into<String>, metadata: Option<MessageMetadata>) -> Self {
        let mut msg = Self::new(MessageRole::Assistant, content);
        msg.metadata = metadata.filter(|m| !m.is_empty());
        msg.is_success = true;
        msg
    }

    /// Build an assistant-authored error message.
    pub fn assistant_error(content: impl Into<String>) -> Self {
        let mut msg = Self::new(MessageRole::Assistant, content);
        msg.is_error = true;
        msg
    }
}

/// A chat session as known to the client.
///
/// `id` is assigned by the backend on creation and is immutable; the other
/// fields mirror the backend's session summary and are refreshed from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: u32,
    pub last_message: String,
}

impl ChatSession {
    /// Build the in-memory fallback session for offline operation.
    pub fn local() -> Self {
        let now = Utc::now();
        Self {
            id: LOCAL_SESSION_ID.to_string(),
            title: "Local chat".to_string(),
            created_at: now,
            updated_at: now,
            message_count: 0,
            last_message: String::new(),
        }
    }

    /// Whether this is the offline sentinel session.
    pub fn is_local(&self) -> bool {
        self.id == LOCAL_SESSION_ID
    }
}
