//! ApiClient -- concrete [`ChatApi`] implementation over HTTP.
//!
//! Talks to the document-QA backend with a shared `reqwest` client. CRUD
//! requests carry the configured timeout; the streaming ask request does
//! not (answers can take minutes). Response shapes are normalized in
//! [`crate::wire`] immediately after deserialization.

use std::time::Duration;

use docuchat_core::api::{ChatApi, FrameStream};
use docuchat_types::chat::{ChatMessage, ChatSession};
use docuchat_types::config::ClientConfig;
use docuchat_types::document::Document;
use docuchat_types::error::ApiError;

use crate::streaming::question_stream;
use crate::wire::{
    AskRequest, AskResponseWire, ChatCreatedWire, ChatDetailWire, ChatListWire, DocumentListWire,
};

/// HTTP client for the document-QA backend.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl ApiClient {
    /// Create a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }

    /// The configured backend base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a response to an error when the status is not 2xx.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl ChatApi for ApiClient {
    async fn ask(&self, message: &str, chat_id: Option<&str>) -> Result<String, ApiError> {
        let body = AskRequest {
            message: message.to_string(),
            chat_id: chat_id.map(str::to_string),
        };
        let response = self
            .client
            .post(self.url("/ask/"))
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let response = Self::check_status(response).await?;
        let wire: AskResponseWire = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(wire.into_answer())
    }

    fn ask_stream(&self, message: &str, chat_id: Option<&str>) -> FrameStream {
        let body = AskRequest {
            message: message.to_string(),
            chat_id: chat_id.map(str::to_string),
        };
        question_stream(self.client.clone(), self.url("/ask_stream/"), body)
    }

    async fn create_chat(&self, title: &str) -> Result<ChatSession, ApiError> {
        let response = self
            .client
            .post(self.url("/chats/"))
            .timeout(self.request_timeout)
            .json(&serde_json::json!({ "title": title }))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let response = Self::check_status(response).await?;
        let wire: ChatCreatedWire = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(wire.normalize())
    }

    async fn list_chats(&self) -> Result<Vec<ChatSession>, ApiError> {
        let wire: ChatListWire = self.get_json("/chats/").await?;
        Ok(wire.normalize())
    }

    async fn chat_messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>, ApiError> {
        let wire: ChatDetailWire = self.get_json(&format!("/chats/{chat_id}")).await?;
        Ok(wire.normalize())
    }

    async fn rename_chat(&self, chat_id: &str, title: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/chats/{chat_id}")))
            .timeout(self.request_timeout)
            .json(&serde_json::json!({ "title": title }))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/chats/{chat_id}")))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        let wire: DocumentListWire = self.get_json("/list_pdfs/").await?;
        Ok(wire.normalize())
    }

    async fn health(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .get(self.url("/health/"))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::check_status(response).await?;
        Ok(())
    }
}
