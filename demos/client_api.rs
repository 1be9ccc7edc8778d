//! Client API: log in, manage projects and use cases, then chat through a use case.
//!
//! Run with:
//! ```bash
//! export WAYGPT_PROJECT_KEY="sk_live_..."
//! export WAYGPT_EMAIL="user@example.com"
//! export WAYGPT_PASSWORD="your_password"
//! cargo run --example client_api
//! ```

use serde_json::json;
use tracing_subscriber::EnvFilter;
use waygpt::api::{NewUseCase, ProjectUpdate, UseCaseKind, UseCaseUpdate};
use waygpt::model::{ChatCompletionRequest, ChatMessage};
use waygpt::options::ClientConfig;
use waygpt::WayGptClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let email = std::env::var("WAYGPT_EMAIL").expect("WAYGPT_EMAIL environment variable must be set");
    let password =
        std::env::var("WAYGPT_PASSWORD").expect("WAYGPT_PASSWORD environment variable must be set");

    let client = WayGptClient::from_env()?;

    let login = client.client_login(&email, &password).await?;
    println!("Logged in, token valid for {}s ({})", login.expires_in, login.token_type);
    let jwt = login.token();

    let projects = client.client_list_projects(jwt).await?;
    for project in &projects {
        println!(
            "  - {} (ID: {}, active: {:?})",
            project.name.as_deref().unwrap_or("<unnamed>"),
            project.id,
            project.is_active
        );
    }
    let Some(project) = projects.first() else {
        println!("No projects to work with");
        return Ok(());
    };

    let settings = client.client_get_project(&project.id, jwt).await?;
    println!("Allowed models: {:?}", settings.allowed_models.unwrap_or_default());
    println!("HMAC required: {}", settings.hmac_required.unwrap_or(false));

    let renamed = ProjectUpdate {
        name: Some(format!("{} (updated)", project.name.as_deref().unwrap_or("project"))),
        is_active: Some(true),
        ..Default::default()
    };
    client.client_update_project(&project.id, jwt, renamed).await?;

    let created = client
        .client_create_use_case(
            &project.id,
            jwt,
            NewUseCase::new("example_chat", "Example chat")
                .with_kind(UseCaseKind::Chat)
                .with_config(json!({
                    "system_prompt": "You are a friendly assistant. Answer briefly.",
                    "models": [{"model_id": "gpt-4", "priority": 1}],
                    "response_format": "text"
                })),
        )
        .await?;
    println!("Created use case {:?}", created.id);

    if let Some(use_case_id) = created.id.as_deref() {
        let update = UseCaseUpdate {
            name: Some("Updated example chat".to_string()),
            ..Default::default()
        };
        client
            .client_update_use_case(&project.id, use_case_id, jwt, update)
            .await?;

        let details = client.client_get_use_case(&project.id, use_case_id, jwt).await?;
        println!("Use case {} ({:?}): {:?}", details.key, details.kind, details.config);
    }

    // Chatting through a use case needs the project's own key
    if let Some(project_key) = settings.api_key {
        let config = ClientConfig::builder()
            .base_url(client.config().base_url())
            .project_key(project_key)
            .use_hmac(false)
            .build()?;
        let project_client = WayGptClient::new(config)?;

        let request = ChatCompletionRequest::new(vec![ChatMessage::user("Hi! Who are you?")])
            .with_use_case(created.key.clone());
        let response = project_client.chat_completions(request).await?;
        println!("Response: {}", response.content().unwrap_or_default());
    }

    Ok(())
}
