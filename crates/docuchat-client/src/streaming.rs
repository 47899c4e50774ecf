//! Incremental decoder for the backend's streaming answer protocol.
//!
//! The ask-stream endpoint responds with newline-delimited frames of the
//! form `data: <JSON>\n`. Network reads chunk that text arbitrarily, so
//! [`FrameDecoder`] reassembles lines across reads: everything up to the
//! last newline is complete, the trailing fragment waits for more data.
//! One terminal frame ends a request; whatever a misbehaving server sends
//! after it is ignored.

use async_stream::try_stream;
use futures_util::StreamExt;
use tracing::warn;

use docuchat_types::error::ApiError;
use docuchat_types::stream::StreamFrame;

use docuchat_core::api::FrameStream;

use crate::wire::AskRequest;

/// Prefix every payload-carrying line must start with.
const DATA_PREFIX: &str = "data: ";

/// Reassembles and decodes frames from arbitrarily-chunked stream bytes.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    finished: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a terminal frame has been decoded.
    ///
    /// A finished decoder swallows all further input.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed one chunk of stream bytes, returning the frames completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamFrame> {
        let mut frames = Vec::new();
        if self.finished {
            return frames;
        }
        self.buffer.extend_from_slice(chunk);

        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            // Strip the newline and an optional preceding carriage return.
            let mut end = line.len() - 1;
            if end > 0 && line[end - 1] == b'\r' {
                end -= 1;
            }
            if let Some(frame) = decode_line(&line[..end]) {
                let terminal = frame.is_terminal();
                frames.push(frame);
                if terminal {
                    self.finished = true;
                    self.buffer.clear();
                    break;
                }
            }
        }
        frames
    }
}

/// Decode one complete line into a frame.
///
/// Lines without the `data: ` prefix are not payload and are never handed
/// to the JSON parser. A malformed payload is logged and skipped; it must
/// not abort the stream.
fn decode_line(line: &[u8]) -> Option<StreamFrame> {
    let text = String::from_utf8_lossy(line);
    let payload = text.strip_prefix(DATA_PREFIX)?;
    if payload.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<StreamFrame>(payload) {
        Ok(frame) => Some(frame),
        Err(err) => {
            warn!(error = %err, payload, "skipping malformed stream frame");
            None
        }
    }
}

/// Open the streaming ask request and decode its body into frames.
///
/// A non-success status fails with [`ApiError::Status`] before any frame
/// is decoded; a body read failure mid-stream surfaces as
/// [`ApiError::Stream`]. The stream ends right after the terminal frame
/// even if the transport keeps delivering data.
pub(crate) fn question_stream(
    client: reqwest::Client,
    url: String,
    body: AskRequest,
) -> FrameStream {
    Box::pin(try_stream! {
        let response = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let response = if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status = %status, "ask stream rejected before streaming began");
            Err(ApiError::Status {
                status: status.as_u16(),
                body: error_body,
            })?;
            unreachable!()
        } else {
            response
        };

        let mut byte_stream = response.bytes_stream();
        let mut decoder = FrameDecoder::new();

        while let Some(chunk) = byte_stream.next().await {
            let chunk = chunk.map_err(|e| ApiError::Stream(format!("response body read: {e}")))?;
            for frame in decoder.push(&chunk) {
                yield frame;
            }
            if decoder.is_finished() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM: &[u8] = b"data: {\"type\":\"debug\",\"message\":\"classified\",\"intent\":\"retrieval\"}\n\ndata: {\"type\":\"final_answer\",\"answer\":\"**250mg** twice daily\",\"selected_document\":\"doc1.pdf\"}\n\n";

    fn decode_with_chunk_size(bytes: &[u8], size: usize) -> Vec<StreamFrame> {
        let mut decoder = FrameDecoder::new();
        let mut frames = Vec::new();
        for chunk in bytes.chunks(size) {
            frames.extend(decoder.push(chunk));
        }
        frames
    }

    #[test]
    fn test_whole_stream_decodes() {
        let frames = decode_with_chunk_size(STREAM, STREAM.len());
        assert_eq!(frames.len(), 2);
        assert!(matches!(frames[0], StreamFrame::Debug { .. }));
        assert!(matches!(frames[1], StreamFrame::FinalAnswer { .. }));
    }

    #[test]
    fn test_chunking_is_invisible() {
        // Every split of the same bytes yields the identical frame sequence.
        let reference = decode_with_chunk_size(STREAM, STREAM.len());
        for size in 1..=STREAM.len() {
            assert_eq!(decode_with_chunk_size(STREAM, size), reference, "chunk size {size}");
        }
    }

    #[test]
    fn test_non_data_lines_are_ignored() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(b": keepalive\nevent: ping\n{\"type\":\"error\"}\n");
        assert!(frames.is_empty());
        assert!(!decoder.is_finished());
    }

    #[test]
    fn test_malformed_line_skipped_stream_continues() {
        let mut decoder = FrameDecoder::new();
        let mut frames = decoder.push(b"data: {not json}\n");
        assert!(frames.is_empty());
        frames = decoder.push(b"data: {\"type\":\"final_answer\",\"answer\":\"ok\"}\n");
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_lines_after_terminal_ignored() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(
            b"data: {\"type\":\"final_answer\",\"answer\":\"done\"}\ndata: {\"type\":\"error\",\"error\":\"late\"}\n",
        );
        assert_eq!(frames.len(), 1);
        assert!(decoder.is_finished());

        let more = decoder.push(b"data: {\"type\":\"error\",\"error\":\"later still\"}\n");
        assert!(more.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(b"data: {\"type\":\"direct_answer\",\"answer\":\"hi\"}\r\n");
        assert_eq!(
            frames,
            vec![StreamFrame::DirectAnswer { answer: "hi".to_string() }]
        );
    }

    #[test]
    fn test_partial_line_waits_for_more_data() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.push(b"data: {\"type\":\"dir").is_empty());
        let frames = decoder.push(b"ect_answer\",\"answer\":\"hello\"}\n");
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_multibyte_content_split_mid_character() {
        let payload = "data: {\"type\":\"direct_answer\",\"answer\":\"caf\u{00e9} \u{2014} ok\"}\n";
        let bytes = payload.as_bytes();
        let reference = decode_with_chunk_size(bytes, bytes.len());
        for size in 1..bytes.len() {
            assert_eq!(decode_with_chunk_size(bytes, size), reference);
        }
        match &reference[0] {
            StreamFrame::DirectAnswer { answer } => assert_eq!(answer, "caf\u{00e9} \u{2014} ok"),
            other => panic!("expected DirectAnswer, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_frame_type_delivered_not_fatal() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(b"data: {\"type\":\"telemetry\",\"x\":1}\n");
        assert_eq!(frames, vec![StreamFrame::Unknown]);
        assert!(!decoder.is_finished());
    }

    #[test]
    fn test_empty_data_line_ignored() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.push(b"data: \n").is_empty());
    }
}
