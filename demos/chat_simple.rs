//! Basic chat, model listing and image generation.
//!
//! Run with:
//! ```bash
//! export WAYGPT_PROJECT_KEY="sk_live_..."
//! cargo run --example chat_simple
//! ```

use tracing_subscriber::EnvFilter;
use waygpt::model::{ChatCompletionRequest, ChatMessage, ImageGenerationRequest};
use waygpt::{ClientError, WayGptClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Reads WAYGPT_API_URL, WAYGPT_PROJECT_KEY and the HMAC variables
    let client = WayGptClient::from_env()?;

    let request = ChatCompletionRequest::new(vec![ChatMessage::user(
        "Hi! Briefly tell me about yourself.",
    )]);

    match client.chat_completions(request).await {
        Ok(response) => {
            println!("Response: {}", response.content().unwrap_or_default());
            if let Some(total) = response.usage.and_then(|u| u.total_tokens) {
                println!("Tokens used: {}", total);
            }
        }
        Err(e) => report(&e),
    }

    match client.get_use_cases(false).await {
        Ok(use_cases) => {
            println!("\nUse cases: {}", use_cases.len());
            if let Some(first) = use_cases.first() {
                println!("First key: {}", first.key);
            }
        }
        Err(e) => report(&e),
    }

    match client.get_models().await {
        Ok(models) => {
            println!("\nAvailable models: {}", models.len());
            println!("First five: {:?}", models.iter().take(5).collect::<Vec<_>>());
        }
        Err(e) => report(&e),
    }

    let image = ImageGenerationRequest::new("A beautiful sunset over the sea, digital art")
        .with_model("yandex-art");
    match client.image_generations(image).await {
        Ok(response) => {
            if let Some(url) = response.data.first().and_then(|img| img.url.as_deref()) {
                println!("\nImage URL: {}", url);
            }
        }
        Err(e) => report(&e),
    }

    Ok(())
}

fn report(e: &ClientError) {
    match e.status() {
        Some(status) => eprintln!("Error: {} (status {})", e.message(), status),
        None => eprintln!("Error: {}", e),
    }
}
