//! Server-sent-event framing and the database's event vocabulary.

use serde::Deserialize;
use serde_json::Value;

use crate::error::FirebaseError;

/// One `event:` / `data:` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SseFrame {
    pub(crate) event: String,
    pub(crate) data: String,
}

/// Incremental decoder: feed body chunks, get complete frames back.
///
/// Chunks may split a frame (or a UTF-8 sequence) anywhere; bytes are held
/// until the blank line that ends the frame arrives.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buffer: Vec<u8>,
    /// Bytes of `buffer` already known not to end a frame.
    scanned: usize,
}

impl SseDecoder {
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend(chunk.iter().filter(|b| **b != b'\r'));

        let mut frames = Vec::new();
        while let Some(end) = self.find_frame_end() {
            let block: Vec<u8> = self.buffer.drain(..end + 2).collect();
            self.scanned = 0;
            if let Some(frame) = parse_block(&String::from_utf8_lossy(&block)) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Index of the next `\n\n`, resuming where the previous scan stopped.
    fn find_frame_end(&mut self) -> Option<usize> {
        let found = self.buffer[self.scanned..]
            .windows(2)
            .position(|w| w == b"\n\n")
            .map(|offset| self.scanned + offset);
        if found.is_none() {
            // The last byte may be the first half of a separator.
            self.scanned = self.buffer.len().saturating_sub(1);
        }
        found
    }
}

fn parse_block(block: &str) -> Option<SseFrame> {
    let mut frame = SseFrame::default();
    let mut data_lines: Vec<&str> = Vec::new();
    let mut seen = false;

    for line in block.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);
        match field {
            "event" => {
                frame.event = value.to_string();
                seen = true;
            }
            "data" => {
                data_lines.push(value);
                seen = true;
            }
            _ => {}
        }
    }

    frame.data = data_lines.join("\n");
    seen.then_some(frame)
}

/// Payload of `put` and `patch` events.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct Change {
    /// Location relative to the subscribed path, `/` for the node itself.
    pub(crate) path: String,
    pub(crate) data: Value,
}

/// Events the database sends on a streaming request.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StreamEvent {
    /// Replace the node at `path`.
    Put(Change),
    /// Merge the children of `data` into the node at `path`.
    Patch(Change),
    KeepAlive,
    /// Read permission was lost.
    Cancel(String),
    /// The auth token is no longer valid.
    AuthRevoked,
    /// Anything else, ignored.
    Other(String),
}

impl StreamEvent {
    pub(crate) fn parse(frame: &SseFrame) -> Result<Self, FirebaseError> {
        Ok(match frame.event.as_str() {
            "put" => Self::Put(serde_json::from_str(&frame.data)?),
            "patch" => Self::Patch(serde_json::from_str(&frame.data)?),
            "keep-alive" => Self::KeepAlive,
            "cancel" => Self::Cancel(frame.data.clone()),
            "auth_revoked" => Self::AuthRevoked,
            other => Self::Other(other.to_string()),
        })
    }
}
