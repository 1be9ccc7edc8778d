//! Streaming chat completion decoding.

use futures::stream::{BoxStream, Stream, StreamExt};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::ClientError;

pub use crate::model::ChatCompletionChunk;

/// Single-pass stream of chat completion chunks.
///
/// Ends after `[DONE]` or when the server closes the connection. Dropping it
/// closes the underlying connection.
pub type ChatCompletionStream = BoxStream<'static, Result<ChatCompletionChunk, ClientError>>;

/// Decode SSE data payloads as JSON.
///
/// A payload that fails to parse is skipped and the stream continues;
/// transport errors are passed through.
pub fn decode_json_events<S, T>(lines: S) -> impl Stream<Item = Result<T, ClientError>> + Send
where
    S: Stream<Item = Result<String, ClientError>> + Send,
    T: DeserializeOwned + Send,
{
    lines.filter_map(|item| async move {
        match item {
            Ok(data) => match serde_json::from_str::<T>(&data) {
                Ok(event) => Some(Ok(event)),
                Err(e) => {
                    debug!(error = %e, payload = %data, "skipping malformed stream chunk");
                    None
                }
            },
            Err(e) => Some(Err(e)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::sse_data_lines;
    use bytes::Bytes;
    use futures::stream;
    use serde_json::{json, Value};

    async fn decode(body: &'static str) -> Vec<Value> {
        let bytes = stream::iter(vec![Ok::<_, ClientError>(Bytes::from_static(body.as_bytes()))]);
        decode_json_events::<_, Value>(sse_data_lines(bytes))
            .map(|r| r.unwrap())
            .collect()
            .await
    }

    #[tokio::test]
    async fn test_single_chunk_then_done() {
        let chunks = decode("data: {\"a\":1}\n\ndata: [DONE]\n").await;
        assert_eq!(chunks, vec![json!({"a": 1})]);
    }

    #[tokio::test]
    async fn test_malformed_line_is_skipped() {
        let chunks = decode("data: {\"a\":1}\ndata: {bad}\ndata: {\"a\":2}\ndata: [DONE]\n").await;
        assert_eq!(chunks, vec![json!({"a": 1}), json!({"a": 2})]);
    }

    #[tokio::test]
    async fn test_ends_without_done_marker() {
        let chunks = decode("data: {\"a\":1}\n\n").await;
        assert_eq!(chunks.len(), 1);
    }

    #[tokio::test]
    async fn test_typed_chunks() {
        let body = concat!(
            "data: {\"id\":\"c1\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"Hel\"}}]}\n\n",
            "data: {\"id\":\"c1\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"lo\"},\"finish_reason\":\"stop\"}]}\n\n",
            "data: [DONE]\n\n",
        );
        let bytes = stream::iter(vec![Ok::<_, ClientError>(Bytes::from_static(body.as_bytes()))]);
        let chunks: Vec<ChatCompletionChunk> = decode_json_events(sse_data_lines(bytes))
            .map(|r| r.unwrap())
            .collect()
            .await;

        let text: String = chunks.iter().filter_map(|c| c.delta_content()).collect();
        assert_eq!(text, "Hello");
        assert_eq!(chunks[1].choices[0].finish_reason.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn test_transport_error_is_surfaced() {
        let lines = stream::iter(vec![
            Ok("{\"a\":1}".to_string()),
            Err(ClientError::Network {
                message: "reset".to_string(),
                source: None,
            }),
        ]);
        let items: Vec<Result<Value, ClientError>> = decode_json_events(lines).collect().await;
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
    }
}
