//! Server-sent change events
//!
//! The backend pushes an event on `GET /tickets/stream` whenever the ticket
//! set changes. The payload is opaque to this crate: the presence of an event
//! is the only signal, and subscribers are expected to re-fetch the base
//! record set.

use async_stream::try_stream;
use futures::Stream;
use futures::StreamExt;
use log::debug;
use reqwest::Method;
use reqwest::header::ACCEPT;

use crate::TicketClient;
use crate::error::StreamError;

/// One change notification from the server.
///
/// Carries the raw `data:` payload for logging and diagnostics; nothing in it
/// is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSignal {
    /// The raw event payload.
    pub data: String,
}

/// Lifecycle of the change-event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No subscription attempt has been made.
    Disconnected,
    /// Subscription request is in flight.
    Connecting,
    /// The channel is open and delivering events.
    Connected,
    /// The channel was closed, by the server or by a transport error.
    Closed,
}

impl std::fmt::Display for ChannelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChannelState::Disconnected => "disconnected",
            ChannelState::Connecting => "connecting",
            ChannelState::Connected => "connected",
            ChannelState::Closed => "closed",
        };
        f.write_str(name)
    }
}

impl TicketClient {
    /// Subscribes to the ticket change channel.
    ///
    /// The returned stream yields one [`ChangeSignal`] per server-sent event.
    /// On a transport error it yields the error and ends; it never reconnects
    /// by itself. Dropping the stream closes the connection.
    pub fn subscribe_changes(
        &self,
    ) -> impl Stream<Item = Result<ChangeSignal, StreamError>> + Send + 'static {
        let client = self.clone();
        try_stream! {
            let url = client.endpoint("/tickets/stream");
            debug!("change channel {}: {url}", ChannelState::Connecting);

            // The ordinary request timeout would cut the subscription short.
            let response = client
                .request_untimed(Method::GET, &url)
                .header(ACCEPT, "text/event-stream")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                debug!("change channel {}: HTTP {status}", ChannelState::Closed);
                Err(StreamError::Http { status: status.as_u16() })?;
            }
            debug!("change channel {}", ChannelState::Connected);

            let mut body = response.bytes_stream();
            let mut parser = SseParser::new();
            while let Some(chunk) = body.next().await {
                let chunk = chunk?;
                for signal in parser.push(&chunk) {
                    yield signal;
                }
            }
            debug!("change channel {}: server ended stream", ChannelState::Closed);
        }
    }
}

/// Incremental parser for the `text/event-stream` wire format.
///
/// Accumulates `data:` lines until a blank line terminates the event; comment
/// lines (leading `:`) and field names other than `data` are ignored, since
/// the payload is opaque anyway.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
    data_lines: Vec<String>,
}

impl SseParser {
    /// Creates an empty parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk of bytes, returning every event completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<ChangeSignal> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut signals = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=newline).collect();
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(signal) = self.line(line) {
                signals.push(signal);
            }
        }
        signals
    }

    fn line(&mut self, line: &str) -> Option<ChangeSignal> {
        if line.is_empty() {
            if self.data_lines.is_empty() {
                return None;
            }
            let data = self.data_lines.join("\n");
            self.data_lines.clear();
            return Some(ChangeSignal { data });
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data_lines.push(value.to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_event() {
        let mut parser = SseParser::new();
        let signals = parser.push(b"data: {\"event\":\"create\",\"id\":3}\n\n");
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].data, "{\"event\":\"create\",\"id\":3}");
    }

    #[test]
    fn test_event_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"data: par").is_empty());
        assert!(parser.push(b"tial\n").is_empty());
        let signals = parser.push(b"\n");
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].data, "partial");
    }

    #[test]
    fn test_multi_line_data() {
        let mut parser = SseParser::new();
        let signals = parser.push(b"data: one\ndata: two\n\n");
        assert_eq!(signals[0].data, "one\ntwo");
    }

    #[test]
    fn test_comments_and_other_fields_ignored() {
        let mut parser = SseParser::new();
        let signals = parser.push(b": keepalive\nevent: change\nid: 7\ndata: x\n\n");
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].data, "x");
    }

    #[test]
    fn test_crlf_lines() {
        let mut parser = SseParser::new();
        let signals = parser.push(b"data: y\r\n\r\n");
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].data, "y");
    }

    #[test]
    fn test_blank_line_without_data_is_silent() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"\n\n\n").is_empty());
    }

    #[test]
    fn test_two_events_one_chunk() {
        let mut parser = SseParser::new();
        let signals = parser.push(b"data: a\n\ndata: b\n\n");
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[1].data, "b");
    }
}
