//! # waygpt - WayGPT API client
//!
//! An async Rust client for the WayGPT AI server: chat completions (with
//! streaming), image and video generation, media job polling, model and
//! use case listing, widget tokens, and the JWT-authenticated Client API
//! for managing projects and use cases.
//!
//! ## Features
//! - Async-first, tokio compatible
//! - Optional HMAC-SHA256 request signing
//! - Exponential backoff retry on 429, 5xx and network failures
//! - Streaming support via Server-Sent Events
//! - Configuration from code or `WAYGPT_*` environment variables
//!
//! ## Architecture
//!
//! - [`options`]: immutable [`ClientConfig`](options::ClientConfig) and its builder
//! - [`signer`]: canonical request string and HMAC signature
//! - [`retry`]: backoff policy applied to every request
//! - [`sse`] and [`stream`]: event-stream framing and chunk decoding
//! - [`api`]: the operations, as methods on [`WayGptClient`]
//!
//! ## Example
//! ```no_run
//! use waygpt::model::{ChatCompletionRequest, ChatMessage};
//! use waygpt::options::ClientConfig;
//! use waygpt::WayGptClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .project_key("sk_live_...")
//!         .project_id("xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx")
//!         .hmac_secret("your-hmac-secret")
//!         .use_hmac(true)
//!         .build()?;
//!     let client = WayGptClient::new(config)?;
//!
//!     let request = ChatCompletionRequest::new(vec![ChatMessage::user("Hello!")])
//!         .with_use_case("support_chat");
//!
//!     let response = client.chat_completions(request).await?;
//!     println!("{:?}", response.content());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod http;
pub mod model;
pub mod options;
pub mod retry;
pub mod signer;
pub mod sse;
pub mod stream;

// Re-exports for convenience
pub use client::{ClientError, WayGptClient};
pub use model::{ChatCompletion, ChatCompletionRequest, ChatMessage, Role};
pub use options::{ClientConfig, SecretString};
pub use stream::{ChatCompletionChunk, ChatCompletionStream};
