//! Server-Sent Events framing for streaming replies

use async_stream::try_stream;
use futures::{Stream, StreamExt};

use crate::application::errors::{AgentError, AgentResult};

/// Incremental decoder yielding the `data` payload of each event
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes; returns the payloads of every event completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend(bytes.iter().copied().filter(|b| *b != b'\r'));

        let mut events = Vec::new();
        while let Some(end) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let block: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(data) = event_data(&String::from_utf8_lossy(&block)) {
                events.push(data);
            }
        }
        events
    }

    /// Payload of a trailing event not terminated by a blank line
    pub fn finish(self) -> Option<String> {
        event_data(&String::from_utf8_lossy(&self.buffer))
    }
}

fn event_data(block: &str) -> Option<String> {
    let lines: Vec<&str> = block
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| data.strip_prefix(' ').unwrap_or(data))
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Turn an event-stream response into a stream of event payloads
pub fn data_events(response: reqwest::Response) -> impl Stream<Item = AgentResult<String>> + Send {
    try_stream! {
        let mut body = response.bytes_stream();
        let mut decoder = SseDecoder::new();

        while let Some(bytes) = body.next().await {
            let bytes = bytes.map_err(AgentError::from)?;
            for data in decoder.push(&bytes) {
                yield data;
            }
        }

        if let Some(data) = decoder.finish() {
            yield data;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_split_across_pushes() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"a\":").is_empty());
        let events = decoder.push(b"1}\n\ndata: {\"b\":2}\r\n\r\n");
        assert_eq!(events, vec!["{\"a\":1}".to_string(), "{\"b\":2}".to_string()]);
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_comments_and_multiline_data() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b": keep-alive\n\nevent: message\ndata: line1\ndata: line2\n\n");
        assert_eq!(events, vec!["line1\nline2".to_string()]);
    }

    #[test]
    fn test_unterminated_trailing_event() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: tail").is_empty());
        assert_eq!(decoder.finish(), Some("tail".to_string()));
    }
}
