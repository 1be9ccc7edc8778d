//! Chat completions.

use futures::StreamExt;
use reqwest::Method;
use tracing::debug;

use crate::client::{Auth, ClientError, Payload, WayGptClient};
use crate::model::{ChatCompletion, ChatCompletionRequest};
use crate::sse::SSEResponseExt;
use crate::stream::{decode_json_events, ChatCompletionChunk, ChatCompletionStream};

pub const CHAT_COMPLETIONS_PATH: &str = "/api/v1/waygpt/chat/completions";

impl WayGptClient {
    /// Create a chat completion and wait for the full answer.
    pub async fn chat_completions(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletion, ClientError> {
        let body = request.into_body(false);
        self.request_json(
            Method::POST,
            CHAT_COMPLETIONS_PATH,
            Payload::json(&body)?,
            Auth::ProjectKey,
        )
        .await
    }

    /// Create a chat completion and receive it incrementally.
    ///
    /// Retries apply until the response headers arrive; once chunks are
    /// flowing the stream is not restarted.
    ///
    /// # Example
    /// ```no_run
    /// use futures::StreamExt;
    /// use waygpt::model::{ChatCompletionRequest, ChatMessage};
    /// use waygpt::WayGptClient;
    ///
    /// # async fn run(client: WayGptClient) -> Result<(), waygpt::ClientError> {
    /// let request = ChatCompletionRequest::new(vec![ChatMessage::user("Tell me a story")]);
    /// let mut stream = client.chat_completions_stream(request).await?;
    /// while let Some(chunk) = stream.next().await {
    ///     if let Some(text) = chunk?.delta_content() {
    ///         print!("{}", text);
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn chat_completions_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionStream, ClientError> {
        let body = request.into_body(true);
        let response = self
            .send(
                Method::POST,
                CHAT_COMPLETIONS_PATH,
                Payload::json(&body)?,
                Auth::ProjectKey,
                true,
            )
            .await?;

        debug!(status = response.status().as_u16(), "chat completion stream opened");
        Ok(decode_json_events::<_, ChatCompletionChunk>(response.sse()).boxed())
    }
}
