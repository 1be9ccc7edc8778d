//! Server-Sent Events (SSE) framing.
//!
//! Turns a response byte stream into the payloads of its `data: ` lines:
//! ```text
//! data: {"key": "value"}
//!
//! data: {"another": "event"}
//!
//! data: [DONE]
//! ```
//!
//! Lines without the `data: ` prefix (blank keep-alives, `event:`, `id:`,
//! comments) are skipped. The stream ends at `[DONE]` or when the body ends.

use bytes::{Bytes, BytesMut};
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;

use crate::client::ClientError;

/// Extension trait for `reqwest::Response` to enable SSE streaming.
///
/// # Example
/// ```ignore
/// use waygpt::sse::SSEResponseExt;
///
/// let mut lines = response.sse();
/// while let Some(line) = lines.next().await {
///     println!("SSE data: {}", line?);
/// }
/// ```
pub trait SSEResponseExt {
    /// Convert the response into a stream of raw SSE data payloads.
    fn sse(self) -> impl Stream<Item = Result<String, ClientError>> + Send;
}

impl SSEResponseExt for reqwest::Response {
    fn sse(self) -> impl Stream<Item = Result<String, ClientError>> + Send {
        sse_data_lines(self.bytes_stream())
    }
}

/// Frame an arbitrary byte stream into SSE data payloads.
///
/// Chunk boundaries may fall anywhere, including inside a multi-byte
/// character. A transport error is yielded once and ends the stream.
pub fn sse_data_lines<S, E>(bytes: S) -> impl Stream<Item = Result<String, ClientError>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<ClientError> + Send + 'static,
{
    let reader = LineReader {
        bytes: Box::pin(bytes),
        buffer: BytesMut::new(),
        exhausted: false,
    };

    stream::unfold(Some(reader), |state| async move {
        let mut reader = state?;
        loop {
            match reader.next_line().await {
                Ok(Some(line)) => {
                    if let Some(data) = parse_sse_line(&line) {
                        if is_done_marker(data) {
                            return None;
                        }
                        return Some((Ok(data.to_string()), Some(reader)));
                    }
                }
                Ok(None) => return None,
                Err(e) => return Some((Err(e), None)),
            }
        }
    })
}

struct LineReader<S> {
    bytes: Pin<Box<S>>,
    buffer: BytesMut,
    exhausted: bool,
}

impl<S, E> LineReader<S>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<ClientError>,
{
    /// Next complete line without its terminator, or the unterminated tail
    /// once the body has ended.
    async fn next_line(&mut self) -> Result<Option<String>, ClientError> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
                let line = self.buffer.split_to(pos + 1);
                return Ok(Some(decode_line(&line)));
            }

            if self.exhausted {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let rest = self.buffer.split();
                return Ok(Some(decode_line(&rest)));
            }

            match self.bytes.next().await {
                Some(Ok(chunk)) => self.buffer.extend_from_slice(&chunk),
                Some(Err(e)) => return Err(e.into()),
                None => self.exhausted = true,
            }
        }
    }
}

fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(|c| c == '\n' || c == '\r')
        .to_string()
}

/// Parse an SSE line to extract the data portion.
///
/// # Example
/// ```
/// use waygpt::sse::parse_sse_line;
///
/// assert_eq!(parse_sse_line("data: {\"key\": \"value\"}"), Some("{\"key\": \"value\"}"));
/// assert_eq!(parse_sse_line("event: ping"), None);
/// ```
pub fn parse_sse_line(line: &str) -> Option<&str> {
    line.strip_prefix("data: ").map(|s| s.trim())
}

/// Check if an SSE data payload marks the end of the stream.
///
/// # Example
/// ```
/// use waygpt::sse::is_done_marker;
///
/// assert!(is_done_marker("[DONE]"));
/// assert!(!is_done_marker("{\"data\": \"value\"}"));
/// ```
pub fn is_done_marker(data: &str) -> bool {
    data == "[DONE]"
}
