//! Session state and conversation orchestration.
//!
//! [`store::SessionStore`] owns the session list and the active session's
//! messages; [`controller::ConversationController`] drives one question
//! through the answer stream and into the store. Entry point for a front
//! end: build a store over a [`crate::api::ChatApi`], wrap it in a
//! controller, call `init`.

pub mod controller;
pub mod store;

/// Content of the fresh system message shown in an empty conversation.
pub const WELCOME_MESSAGE: &str =
    "Hello! Upload a document and ask me anything about its contents.";

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory [`ChatApi`] fake for store and controller tests.

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    use chrono::Utc;

    use docuchat_types::chat::{ChatMessage, ChatSession};
    use docuchat_types::document::Document;
    use docuchat_types::error::ApiError;
    use docuchat_types::stream::StreamFrame;

    use crate::api::{ChatApi, FrameStream};

    /// Scriptable fake backend.
    ///
    /// Sessions/messages live in mutexed maps; `fail_*` flags make the next
    /// call of that operation return a transport error. `frames` is drained
    /// by the next `ask_stream` call.
    #[derive(Default)]
    pub(crate) struct FakeApi {
        pub chats: Mutex<Vec<ChatSession>>,
        pub messages: Mutex<HashMap<String, Vec<ChatMessage>>>,
        pub frames: Mutex<Vec<Result<StreamFrame, ApiError>>>,
        pub fail_list: AtomicBool,
        pub fail_create: AtomicBool,
        pub fail_rename: AtomicBool,
        pub fail_delete: AtomicBool,
        pub fail_messages: AtomicBool,
        pub rename_calls: AtomicU32,
        pub delete_calls: AtomicU32,
        /// `(message, chat_id)` pairs seen by `ask_stream`.
        pub stream_requests: Mutex<Vec<(String, Option<String>)>>,
        next_id: AtomicU32,
    }

    impl FakeApi {
        pub fn with_chats(chats: Vec<ChatSession>) -> Self {
            Self {
                chats: Mutex::new(chats),
                ..Self::default()
            }
        }

        pub fn session(id: &str, title: &str) -> ChatSession {
            let now = Utc::now();
            ChatSession {
                id: id.to_string(),
                title: title.to_string(),
                created_at: now,
                updated_at: now,
                message_count: 0,
                last_message: String::new(),
            }
        }

        pub fn script_frames(&self, frames: Vec<Result<StreamFrame, ApiError>>) {
            *self.frames.lock().unwrap() = frames;
        }

        fn transport_err() -> ApiError {
            ApiError::Transport("connection refused".to_string())
        }

        fn take_flag(flag: &AtomicBool) -> bool {
            flag.swap(false, Ordering::SeqCst)
        }
    }

    impl ChatApi for FakeApi {
        async fn ask(&self, _message: &str, _chat_id: Option<&str>) -> Result<String, ApiError> {
            Ok("stub answer".to_string())
        }

        fn ask_stream(&self, message: &str, chat_id: Option<&str>) -> FrameStream {
            self.stream_requests
                .lock()
                .unwrap()
                .push((message.to_string(), chat_id.map(str::to_string)));
            let frames = std::mem::take(&mut *self.frames.lock().unwrap());
            Box::pin(futures_util::stream::iter(frames))
        }

        async fn create_chat(&self, title: &str) -> Result<ChatSession, ApiError> {
            if Self::take_flag(&self.fail_create) {
                return Err(Self::transport_err());
            }
            let n = self.next_id.fetch_add(1, Ordering::SeqCst);
            let session = Self::session(&format!("chat_{n}"), title);
            self.chats.lock().unwrap().insert(0, session.clone());
            Ok(session)
        }

        async fn list_chats(&self) -> Result<Vec<ChatSession>, ApiError> {
            if Self::take_flag(&self.fail_list) {
                return Err(Self::transport_err());
            }
            Ok(self.chats.lock().unwrap().clone())
        }

        async fn chat_messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>, ApiError> {
            if Self::take_flag(&self.fail_messages) {
                return Err(Self::transport_err());
            }
            Ok(self
                .messages
                .lock()
                .unwrap()
                .get(chat_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn rename_chat(&self, chat_id: &str, title: &str) -> Result<(), ApiError> {
            self.rename_calls.fetch_add(1, Ordering::SeqCst);
            if Self::take_flag(&self.fail_rename) {
                return Err(Self::transport_err());
            }
            let mut chats = self.chats.lock().unwrap();
            if let Some(chat) = chats.iter_mut().find(|c| c.id == chat_id) {
                chat.title = title.to_string();
            }
            Ok(())
        }

        async fn delete_chat(&self, chat_id: &str) -> Result<(), ApiError> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            if Self::take_flag(&self.fail_delete) {
                return Err(Self::transport_err());
            }
            self.chats.lock().unwrap().retain(|c| c.id != chat_id);
            Ok(())
        }

        async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
            Ok(vec![Document::from_filename("doc1.pdf")])
        }

        async fn health(&self) -> Result<(), ApiError> {
            Ok(())
        }
    }
}
