//! Typed frames of the backend's streaming answer protocol.
//!
//! The backend answers a question with a newline-delimited event stream;
//! each `data: <JSON>` line decodes to one [`StreamFrame`]. Exactly one
//! terminal frame (`final_answer`, `direct_answer`, or `error`) ends a
//! request; `debug` frames may appear any number of times before it.

use serde::{Deserialize, Serialize};

/// One decoded unit of the answer stream, tagged by its `type` field.
///
/// Unrecognized types collapse into [`StreamFrame::Unknown`] so a newer
/// backend never breaks the decode loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamFrame {
    /// Answer produced through document retrieval, with selection metadata.
    FinalAnswer {
        #[serde(default)]
        answer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        selected_document: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        selection_score: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        documents_considered: Option<u32>,
    },

    /// Answer produced without retrieval (greetings, meta questions).
    DirectAnswer {
        #[serde(default)]
        answer: String,
    },

    /// Terminal failure reported by the backend.
    Error {
        #[serde(default)]
        error: String,
    },

    /// Development-only inspection data; never conversation-visible.
    Debug {
        #[serde(default)]
        message: String,
        #[serde(default)]
        intent: String,
    },

    /// Catch-all for frame types this client does not know.
    #[serde(other)]
    Unknown,
}

impl StreamFrame {
    /// Whether this frame ends the request it belongs to.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamFrame::FinalAnswer { .. }
                | StreamFrame::DirectAnswer { .. }
                | StreamFrame::Error { .. }
        )
    }
}

/// Side-channel inspection value carried by `debug` frames.
///
/// Held by the conversation controller outside the message list; the most
/// recent debug frame wins.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugInfo {
    pub message: String,
    pub intent: String,
}
