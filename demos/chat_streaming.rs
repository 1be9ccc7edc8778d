//! Streaming chat completion with optional HMAC signing.
//!
//! Run with:
//! ```bash
//! export WAYGPT_PROJECT_KEY="sk_live_..."
//! export WAYGPT_PROJECT_ID="xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
//! export WAYGPT_HMAC_SECRET="your-hmac-secret"
//! export WAYGPT_USE_HMAC=true
//! cargo run --example chat_streaming
//! ```

use futures::StreamExt;
use std::io::Write;
use tracing_subscriber::EnvFilter;
use waygpt::model::{ChatCompletionRequest, ChatMessage};
use waygpt::WayGptClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = WayGptClient::from_env()?;
    println!("HMAC signing: {}", client.config().use_hmac());

    let request = ChatCompletionRequest::new(vec![ChatMessage::user(
        "Tell me a short story about a cat.",
    )]);

    let mut stream = client.chat_completions_stream(request).await?;

    print!("Response: ");
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => {
                if let Some(content) = chunk.delta_content() {
                    print!("{}", content);
                    std::io::stdout().flush()?;
                }
            }
            Err(e) => {
                eprintln!("\nError in stream: {}", e);
                return Err(e.into());
            }
        }
    }
    println!();

    Ok(())
}
