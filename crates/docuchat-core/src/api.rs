//! ChatApi trait definition.
//!
//! The port through which the conversation layer reaches the backend.
//! The concrete implementation lives in `docuchat-client`
//! (`ApiClient`); tests substitute in-memory fakes.
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use std::pin::Pin;

use futures_util::Stream;

use docuchat_types::chat::{ChatMessage, ChatSession};
use docuchat_types::document::Document;
use docuchat_types::error::ApiError;
use docuchat_types::stream::StreamFrame;

/// A stream of decoded answer frames for one question.
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<StreamFrame, ApiError>> + Send + 'static>>;

/// Backend operations consumed by the session store and controller.
pub trait ChatApi: Send + Sync {
    /// Ask a question and receive the full answer in one response.
    fn ask(
        &self,
        message: &str,
        chat_id: Option<&str>,
    ) -> impl std::future::Future<Output = Result<String, ApiError>> + Send;

    /// Ask a question and receive the answer as a frame stream.
    ///
    /// `chat_id` is omitted from the request when `None` (offline mode).
    /// The stream yields at most one terminal frame and ends after it.
    fn ask_stream(&self, message: &str, chat_id: Option<&str>) -> FrameStream;

    /// Create a session; the backend assigns the id.
    fn create_chat(
        &self,
        title: &str,
    ) -> impl std::future::Future<Output = Result<ChatSession, ApiError>> + Send;

    /// List sessions, most recently updated first (backend order trusted).
    fn list_chats(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSession>, ApiError>> + Send;

    /// Fetch the full message list of a session, oldest first.
    fn chat_messages(
        &self,
        chat_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, ApiError>> + Send;

    /// Rename a session.
    fn rename_chat(
        &self,
        chat_id: &str,
        title: &str,
    ) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;

    /// Delete a session and its messages.
    fn delete_chat(
        &self,
        chat_id: &str,
    ) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;

    /// List documents available for question answering.
    fn list_documents(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Document>, ApiError>> + Send;

    /// Probe backend reachability.
    fn health(&self) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;
}
