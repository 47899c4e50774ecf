//! Wire DTOs and their normalization into domain types.
//!
//! The backend has grown a few shape variants over time (`chat_id` vs
//! `id`, answer text under `answer`/`response`/`message`, documents under
//! `documents`/`pdfs`). Each variant is resolved here, once, at the API
//! boundary -- nothing deeper in the client branches on response shape.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use docuchat_types::chat::{ChatMessage, ChatSession, MessageMetadata, MessageRole};
use docuchat_types::document::Document;

/// Request body for both the streaming and non-streaming ask endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

/// Response of the non-streaming ask endpoint.
///
/// Older backend revisions fill `message`/`response`, newer ones `answer`;
/// all three carry the same text.
#[derive(Debug, Deserialize)]
pub struct AskResponseWire {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AskResponseWire {
    /// Resolve the answer text from whichever field is populated.
    pub fn into_answer(self) -> String {
        self.answer
            .or(self.response)
            .or(self.message)
            .unwrap_or_default()
    }
}

/// One session summary as returned by the list endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatSummaryWire {
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub last_message: Option<String>,
}

impl ChatSummaryWire {
    /// Normalize into a [`ChatSession`].
    ///
    /// Returns `None` (with a warning) when the entry carries no id under
    /// either key.
    pub fn normalize(self) -> Option<ChatSession> {
        let id = match self.chat_id.or(self.id) {
            Some(id) if !id.is_empty() => id,
            _ => {
                warn!("session entry without an id in list response, skipping");
                return None;
            }
        };
        Some(ChatSession {
            id,
            title: self.title.unwrap_or_else(|| "Untitled".to_string()),
            created_at: parse_timestamp(self.created_at.as_deref()),
            updated_at: parse_timestamp(self.updated_at.as_deref()),
            message_count: self.message_count.unwrap_or(0),
            last_message: self.last_message.unwrap_or_default(),
        })
    }
}

/// Envelope of the session list endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatListWire {
    #[serde(default)]
    pub chats: Vec<ChatSummaryWire>,
}

impl ChatListWire {
    pub fn normalize(self) -> Vec<ChatSession> {
        self.chats
            .into_iter()
            .filter_map(ChatSummaryWire::normalize)
            .collect()
    }
}

/// Response of the create-session endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatCreatedWire {
    pub chat_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ChatCreatedWire {
    pub fn normalize(self) -> ChatSession {
        ChatSession {
            id: self.chat_id,
            title: self.title.unwrap_or_else(|| "New Chat".to_string()),
            created_at: parse_timestamp(self.created_at.as_deref()),
            updated_at: parse_timestamp(self.updated_at.as_deref()),
            message_count: 0,
            last_message: String::new(),
        }
    }
}

/// One stored message as returned by the session detail endpoint.
#[derive(Debug, Deserialize)]
pub struct MessageWire {
    #[serde(default)]
    pub id: Option<String>,
    /// Role on the wire: `user`, `bot`, or `system`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl MessageWire {
    pub fn normalize(self) -> ChatMessage {
        let role = match self.kind.as_deref() {
            Some(raw) => raw.parse::<MessageRole>().unwrap_or_else(|_| {
                warn!(role = raw, "unknown message role in history, treating as system");
                MessageRole::System
            }),
            None => MessageRole::System,
        };
        let metadata = self.metadata.as_ref().and_then(extract_metadata);
        ChatMessage {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| Uuid::now_v7().to_string()),
            role,
            content: self.content,
            timestamp: parse_timestamp(self.timestamp.as_deref()),
            metadata,
            is_error: false,
            is_success: role == MessageRole::Assistant,
        }
    }
}

/// Envelope of the session detail endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatDetailWire {
    #[serde(default)]
    pub messages: Vec<MessageWire>,
}

impl ChatDetailWire {
    pub fn normalize(self) -> Vec<ChatMessage> {
        self.messages
            .into_iter()
            .map(MessageWire::normalize)
            .collect()
    }
}

/// One document entry in the structured list shape.
#[derive(Debug, Deserialize)]
pub struct DocumentWire {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Envelope of the document list endpoint.
///
/// Newer backends return `documents`; older ones only `pdfs` (bare
/// filenames). `documents` wins when both are present.
#[derive(Debug, Deserialize)]
pub struct DocumentListWire {
    #[serde(default)]
    pub documents: Option<Vec<DocumentWire>>,
    #[serde(default)]
    pub pdfs: Option<Vec<String>>,
}

impl DocumentListWire {
    pub fn normalize(self) -> Vec<Document> {
        if let Some(documents) = self.documents {
            return documents
                .into_iter()
                .map(|d| Document {
                    name: d.name.unwrap_or_else(|| d.id.clone()),
                    kind: d.kind.unwrap_or_else(|| "pdf".to_string()),
                    status: d.status.unwrap_or_else(|| "Ready".to_string()),
                    id: d.id,
                })
                .collect();
        }
        self.pdfs
            .unwrap_or_default()
            .into_iter()
            .map(Document::from_filename)
            .collect()
    }
}

/// Parse a backend timestamp.
///
/// The backend emits ISO-8601, sometimes without an offset (naive local
/// serialization); naive values are read as UTC. Unparseable values are
/// logged and replaced with the current time rather than failing the
/// whole response.
pub(crate) fn parse_timestamp(raw: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = raw else {
        return Utc::now();
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Utc.from_utc_datetime(&naive);
    }
    warn!(raw, "unparseable timestamp from backend, substituting now");
    Utc::now()
}

fn extract_metadata(value: &serde_json::Value) -> Option<MessageMetadata> {
    let metadata = MessageMetadata {
        selected_document: value
            .get("selected_document")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        selection_score: value.get("selection_score").and_then(|v| v.as_f64()),
        documents_considered: value
            .get("documents_considered")
            .and_then(|v| v.as_u64())
            .map(|n| n as u32),
    };
    (!metadata.is_empty()).then_some(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_response_prefers_answer_field() {
        let wire: AskResponseWire = serde_json::from_str(
            r#"{"message":"m","response":"r","answer":"a"}"#,
        )
        .unwrap();
        assert_eq!(wire.into_answer(), "a");
    }

    #[test]
    fn test_ask_response_falls_back_through_shapes() {
        let wire: AskResponseWire = serde_json::from_str(r#"{"message":"m"}"#).unwrap();
        assert_eq!(wire.into_answer(), "m");
        let wire: AskResponseWire = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(wire.into_answer(), "");
    }

    #[test]
    fn test_chat_summary_accepts_either_id_key() {
        let with_chat_id: ChatSummaryWire =
            serde_json::from_str(r#"{"chat_id":"abc","title":"T"}"#).unwrap();
        assert_eq!(with_chat_id.normalize().unwrap().id, "abc");

        let with_id: ChatSummaryWire = serde_json::from_str(r#"{"id":"xyz"}"#).unwrap();
        assert_eq!(with_id.normalize().unwrap().id, "xyz");
    }

    #[test]
    fn test_chat_summary_without_id_skipped() {
        let wire: ChatSummaryWire = serde_json::from_str(r#"{"title":"orphan"}"#).unwrap();
        assert!(wire.normalize().is_none());
    }

    #[test]
    fn test_chat_list_preserves_backend_order() {
        let wire: ChatListWire = serde_json::from_str(
            r#"{"chats":[{"chat_id":"newest"},{"chat_id":"older"},{"title":"no id"}]}"#,
        )
        .unwrap();
        let sessions = wire.normalize();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, "newest");
        assert_eq!(sessions[1].id, "older");
    }

    #[test]
    fn test_message_bot_role_maps_to_assistant() {
        let wire: MessageWire = serde_json::from_str(
            r#"{"id":"m1","type":"bot","content":"hi","timestamp":"2025-06-01T10:00:00"}"#,
        )
        .unwrap();
        let msg = wire.normalize();
        assert_eq!(msg.role, MessageRole::Assistant);
        assert!(msg.is_success);
    }

    #[test]
    fn test_message_unknown_role_becomes_system() {
        let wire: MessageWire =
            serde_json::from_str(r#"{"type":"oracle","content":"?"}"#).unwrap();
        assert_eq!(wire.normalize().role, MessageRole::System);
    }

    #[test]
    fn test_message_metadata_extracted() {
        let wire: MessageWire = serde_json::from_str(
            r#"{"type":"bot","content":"a","metadata":{"selected_document":"doc1.pdf","selection_score":0.9,"documents_considered":4}}"#,
        )
        .unwrap();
        let meta = wire.normalize().metadata.unwrap();
        assert_eq!(meta.selected_document.as_deref(), Some("doc1.pdf"));
        assert_eq!(meta.selection_score, Some(0.9));
        assert_eq!(meta.documents_considered, Some(4));
    }

    #[test]
    fn test_message_empty_metadata_dropped() {
        let wire: MessageWire =
            serde_json::from_str(r#"{"type":"user","content":"q","metadata":{}}"#).unwrap();
        assert!(wire.normalize().metadata.is_none());
    }

    #[test]
    fn test_documents_shape_preferred_over_pdfs() {
        let wire: DocumentListWire = serde_json::from_str(
            r#"{"pdfs":["a.pdf"],"documents":[{"id":"a.pdf","name":"a.pdf","type":"pdf","status":"Ready"}]}"#,
        )
        .unwrap();
        let docs = wire.normalize();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].status, "Ready");
    }

    #[test]
    fn test_pdfs_shape_synthesized() {
        let wire: DocumentListWire = serde_json::from_str(r#"{"pdfs":["a.pdf","b.pdf"]}"#).unwrap();
        let docs = wire.normalize();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0], Document::from_filename("a.pdf"));
    }

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let dt = parse_timestamp(Some("2025-06-01T10:00:00+02:00"));
        assert_eq!(dt.to_rfc3339(), "2025-06-01T08:00:00+00:00");
    }

    #[test]
    fn test_parse_timestamp_naive_read_as_utc() {
        let dt = parse_timestamp(Some("2025-06-01T10:00:00.123456"));
        assert_eq!(dt.timestamp(), 1748772000);
    }

    #[test]
    fn test_parse_timestamp_garbage_substitutes_now() {
        let before = Utc::now();
        let dt = parse_timestamp(Some("yesterday-ish"));
        assert!(dt >= before);
    }
}
