//! Model catalog, project use cases and widget tokens.

use reqwest::Method;

use crate::client::{Auth, ClientError, Payload, WayGptClient};
use crate::model::{ModelInfo, UseCase, WidgetToken, WidgetTokenRequest};

pub const MODELS_PATH: &str = "/api/v1/waygpt/models";
pub const MODELS_FULL_PATH: &str = "/api/v1/waygpt/models/full";
pub const USE_CASES_PATH: &str = "/api/v1/waygpt/use-cases";
pub const WIDGET_TOKEN_PATH: &str = "/api/v1/widget/token";

impl WayGptClient {
    /// IDs of the models available to the project.
    pub async fn get_models(&self) -> Result<Vec<String>, ClientError> {
        self.request_json(Method::GET, MODELS_PATH, Payload::Empty, Auth::ProjectKey)
            .await
    }

    /// Full descriptions of the available models.
    pub async fn get_models_full(&self) -> Result<Vec<ModelInfo>, ClientError> {
        self.request_json(Method::GET, MODELS_FULL_PATH, Payload::Empty, Auth::ProjectKey)
            .await
    }

    /// Use cases of the project. `detailed` asks for full configurations.
    pub async fn get_use_cases(&self, detailed: bool) -> Result<Vec<UseCase>, ClientError> {
        let endpoint = if detailed {
            format!("{}?detailed=true", USE_CASES_PATH)
        } else {
            USE_CASES_PATH.to_string()
        };
        self.request_json(Method::GET, &endpoint, Payload::Empty, Auth::ProjectKey)
            .await
    }

    /// Issue a short-lived token for the browser widget.
    pub async fn create_widget_token(
        &self,
        request: WidgetTokenRequest,
    ) -> Result<WidgetToken, ClientError> {
        let request = WidgetTokenRequest {
            site_domain: crate::model::non_blank(request.site_domain),
            ..request
        };
        self.request_json(
            Method::POST,
            WIDGET_TOKEN_PATH,
            Payload::json(&request)?,
            Auth::ProjectKey,
        )
        .await
    }
}
