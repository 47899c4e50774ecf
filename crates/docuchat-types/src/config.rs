//! Client configuration.
//!
//! The protocol needs exactly one value: the backend base URL. A request
//! timeout accompanies it for the non-streaming endpoints (the answer
//! stream itself is long-lived and never subject to this timeout).

use serde::{Deserialize, Serialize};

/// Default backend base URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default timeout for non-streaming requests, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration for the backend API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the document-QA backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout applied to non-streaming requests.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
