//! Request and response models of the WayGPT API.
//!
//! Response types keep any field the server adds in a flattened `extra`
//! map, so nothing returned by the API is lost.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_MODEL: &str = "auto";
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";
pub const DEFAULT_IMAGE_COUNT: u32 = 1;
pub const DEFAULT_WIDGET_TTL_SECONDS: u32 = 600;

/// Role of the message sender.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Chat completion request.
///
/// `use_case` selects a server-side scenario by key. `use_case_id` is the
/// legacy spelling of the same parameter; when both are set the first
/// non-blank one wins, in field order.
///
/// # Example
/// ```rust
/// use waygpt::model::{ChatCompletionRequest, ChatMessage};
///
/// let request = ChatCompletionRequest::new(vec![ChatMessage::user("Hi")])
///     .with_use_case(" support_chat ")
///     .with_temperature(0.3);
/// assert_eq!(request.resolved_use_case().as_deref(), Some("support_chat"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChatCompletionRequest {
    /// Model identifier or `"auto"` (the default).
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub use_case: Option<String>,
    pub use_case_id: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Additional body fields passed through verbatim.
    pub extra: Map<String, Value>,
}

const CHAT_RESERVED_FIELDS: &[&str] = &[
    "model",
    "messages",
    "use_case",
    "use_case_id",
    "temperature",
    "max_tokens",
    "stream",
];

impl ChatCompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_use_case(mut self, use_case: impl Into<String>) -> Self {
        self.use_case = Some(use_case.into());
        self
    }

    /// Legacy alias of [`with_use_case`](Self::with_use_case).
    pub fn with_use_case_id(mut self, use_case_id: impl Into<String>) -> Self {
        self.use_case_id = Some(use_case_id.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Add a body field that has no dedicated setter.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Use case key sent to the server: `use_case`, then `use_case_id`,
    /// then a string `extra["use_case"]`; first non-blank wins, trimmed.
    pub fn resolved_use_case(&self) -> Option<String> {
        let from_extra = self.extra.get("use_case").and_then(Value::as_str);
        [self.use_case.as_deref(), self.use_case_id.as_deref(), from_extra]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|uc| !uc.is_empty())
            .map(str::to_string)
    }

    pub(crate) fn into_body(self, stream: bool) -> ChatCompletionBody {
        let use_case = self.resolved_use_case();
        let mut extra = self.extra;
        for field in CHAT_RESERVED_FIELDS {
            extra.remove(*field);
        }

        ChatCompletionBody {
            model: non_blank(self.model).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            messages: self.messages,
            use_case,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream,
            extra,
        }
    }
}

/// Wire form of a chat completion request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatCompletionBody {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    use_case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Token usage information.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u32>,
}

/// Assistant message inside a completion choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Non-streaming chat completion response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatCompletion {
    /// Content of the first choice.
    pub fn content(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub delta: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// One decoded event of a streaming chat completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatCompletionChunk {
    /// Delta text of the first choice.
    pub fn delta_content(&self) -> Option<&str> {
        self.choices.first()?.delta.content.as_deref()
    }
}

/// Image generation request.
#[derive(Debug, Clone, Default)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub model: Option<String>,
    /// Defaults to `1024x1024`.
    pub size: Option<String>,
    /// Defaults to 1.
    pub n: Option<u32>,
    pub extra: Map<String, Value>,
}

impl ImageGenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_n(mut self, n: u32) -> Self {
        self.n = Some(n);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub(crate) fn into_body(self) -> ImageGenerationBody {
        let mut extra = self.extra;
        for field in ["prompt", "model", "size", "n"] {
            extra.remove(field);
        }

        ImageGenerationBody {
            prompt: self.prompt,
            model: non_blank(self.model),
            size: non_blank(self.size).unwrap_or_else(|| DEFAULT_IMAGE_SIZE.to_string()),
            n: self.n.unwrap_or(DEFAULT_IMAGE_COUNT),
            extra,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ImageGenerationBody {
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    size: String,
    n: u32,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Video generation request. Video generation is asynchronous; poll the
/// returned [`MediaJob`].
#[derive(Debug, Clone, Default)]
pub struct VideoGenerationRequest {
    pub prompt: String,
    pub model: Option<String>,
    /// Duration in seconds.
    pub duration: Option<u32>,
    pub extra: Map<String, Value>,
}

impl VideoGenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub(crate) fn into_body(self) -> VideoGenerationBody {
        let mut extra = self.extra;
        for field in ["prompt", "model", "duration"] {
            extra.remove(field);
        }

        VideoGenerationBody {
            prompt: self.prompt,
            model: non_blank(self.model),
            duration: self.duration.filter(|d| *d > 0),
            extra,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct VideoGenerationBody {
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u32>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub created: Option<u64>,
    #[serde(default)]
    pub data: Vec<GeneratedImage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Status of an asynchronous media generation job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaJob {
    #[serde(default, alias = "id")]
    pub job_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full model description from `/models/full`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A use case (scenario) as listed by either API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UseCase {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request for a browser widget token.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetTokenRequest {
    pub ttl_seconds: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_domain: Option<String>,
}

impl Default for WidgetTokenRequest {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_WIDGET_TTL_SECONDS,
            site_domain: None,
        }
    }
}

impl WidgetTokenRequest {
    pub fn with_ttl_seconds(mut self, ttl_seconds: u32) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    pub fn with_site_domain(mut self, site_domain: impl Into<String>) -> Self {
        self.site_domain = Some(site_domain.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetToken {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(request: ChatCompletionRequest, stream: bool) -> Value {
        serde_json::to_value(request.into_body(stream)).unwrap()
    }

    #[test]
    fn test_chat_defaults_model_to_auto() {
        let value = body(ChatCompletionRequest::new(vec![ChatMessage::user("Hi")]), false);
        assert_eq!(
            value,
            json!({
                "model": "auto",
                "messages": [{"role": "user", "content": "Hi"}]
            })
        );
    }

    #[test]
    fn test_use_case_aliases_map_to_same_field() {
        let a = body(ChatCompletionRequest::default().with_use_case("  support_chat "), false);
        let b = body(ChatCompletionRequest::default().with_use_case_id("support_chat\n"), false);
        assert_eq!(a["use_case"], "support_chat");
        assert_eq!(a, b);
        assert!(a.get("use_case_id").is_none());
    }

    #[test]
    fn test_use_case_precedence() {
        let request = ChatCompletionRequest::default()
            .with_use_case("primary")
            .with_use_case_id("legacy");
        assert_eq!(request.resolved_use_case().as_deref(), Some("primary"));

        let request = ChatCompletionRequest::default()
            .with_use_case("   ")
            .with_use_case_id("legacy");
        assert_eq!(request.resolved_use_case().as_deref(), Some("legacy"));

        let request = ChatCompletionRequest::default().with_extra("use_case", " from_extra ");
        assert_eq!(request.resolved_use_case().as_deref(), Some("from_extra"));

        assert_eq!(ChatCompletionRequest::default().resolved_use_case(), None);
    }

    #[test]
    fn test_stream_flag_and_extras() {
        let request = ChatCompletionRequest::default()
            .with_model("gpt-4o")
            .with_max_tokens(50)
            .with_extra("top_p", 0.9)
            .with_extra("model", "ignored")
            .with_extra("stream", false);
        let value = body(request, true);

        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["max_tokens"], 50);
        assert_eq!(value["top_p"], 0.9);
        assert_eq!(value["stream"], true);
    }

    #[test]
    fn test_image_defaults() {
        let value = serde_json::to_value(ImageGenerationRequest::new("a sunset").into_body()).unwrap();
        assert_eq!(value, json!({"prompt": "a sunset", "size": "1024x1024", "n": 1}));
    }

    #[test]
    fn test_video_body() {
        let value = serde_json::to_value(
            VideoGenerationRequest::new("a wave")
                .with_model("kling")
                .with_duration(5)
                .into_body(),
        )
        .unwrap();
        assert_eq!(value, json!({"prompt": "a wave", "model": "kling", "duration": 5}));
    }

    #[test]
    fn test_completion_content_and_extras() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
        }))
        .unwrap();

        assert_eq!(completion.content(), Some("Hello"));
        assert_eq!(completion.usage.unwrap().total_tokens, Some(4));
        assert_eq!(completion.extra["object"], "chat.completion");
    }

    #[test]
    fn test_media_job_accepts_id_alias() {
        let job: MediaJob = serde_json::from_value(json!({"id": "job-1", "status": "queued"})).unwrap();
        assert_eq!(job.job_id.as_deref(), Some("job-1"));
        assert_eq!(job.status.as_deref(), Some("queued"));
    }

    #[test]
    fn test_widget_token_defaults() {
        let value = serde_json::to_value(WidgetTokenRequest::default()).unwrap();
        assert_eq!(value, json!({"ttl_seconds": 600}));
    }
}
