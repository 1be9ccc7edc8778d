//! Client API: login and management of projects and their use cases.
//!
//! These endpoints authenticate with a JWT obtained from
//! [`WayGptClient::client_login`] instead of the project key, and are never
//! HMAC signed.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{path_segment, require, Auth, ClientError, Payload, WayGptClient};
use crate::model::UseCase;
use crate::options::SecretString;

pub const LOGIN_PATH: &str = "/api/v1/auth/login/access-token";
pub const PROJECTS_PATH: &str = "/api/v1/client/projects";

const DEFAULT_TOKEN_TYPE: &str = "bearer";
const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;

/// JWT returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: SecretString,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds; the server default of one hour when not reported.
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccessToken {
    /// Token to pass to the `client_*` methods.
    pub fn token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

fn default_token_type() -> String {
    DEFAULT_TOKEN_TYPE.to_string()
}

fn default_expires_in() -> u64 {
    DEFAULT_TOKEN_TTL_SECONDS
}

/// Project as listed by the Client API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Project settings, including its project key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectSettings {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub allowed_models: Option<Vec<String>>,
    #[serde(default)]
    pub allowed_domains: Option<Vec<String>>,
    #[serde(default)]
    pub hmac_required: Option<bool>,
    #[serde(default)]
    pub rate_limit_rpm: Option<u32>,
    #[serde(default)]
    pub rate_limit_rpd: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial project update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_models: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_domains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hmac_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_rpm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_rpd: Option<u32>,
}

/// Kind of scenario a use case runs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UseCaseKind {
    #[default]
    Chat,
    CatalogExtract,
    Multimodal,
    ImageGeneration,
    VideoGeneration,
    Multi,
}

/// A use case to create. `key` must be unique within the project.
#[derive(Debug, Clone, Serialize)]
pub struct NewUseCase {
    pub key: String,
    pub name: String,
    pub kind: UseCaseKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    pub is_active: bool,
}

impl NewUseCase {
    /// An active chat use case without configuration.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            kind: UseCaseKind::default(),
            config: None,
            is_active: true,
        }
    }

    pub fn with_kind(mut self, kind: UseCaseKind) -> Self {
        self.kind = kind;
        self
    }

    /// Scenario configuration: system prompt, model priority list, response format.
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// Partial use case update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UseCaseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<UseCaseKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl WayGptClient {
    /// Exchange account credentials for a JWT (form-encoded login).
    pub async fn client_login(&self, email: &str, password: &str) -> Result<AccessToken, ClientError> {
        let email = require(email, "email")?;
        if password.is_empty() {
            return Err(ClientError::Validation("password is required".to_string()));
        }

        let form = vec![("username", email.to_string()), ("password", password.to_string())];
        self.request_json(Method::POST, LOGIN_PATH, Payload::Form(form), Auth::Anonymous)
            .await
    }

    /// Projects owned by the authenticated user.
    pub async fn client_list_projects(&self, jwt_token: &str) -> Result<Vec<Project>, ClientError> {
        let token = require(jwt_token, "JWT token")?;
        self.request_json(Method::GET, PROJECTS_PATH, Payload::Empty, Auth::Bearer(token))
            .await
    }

    /// Settings of one project.
    pub async fn client_get_project(
        &self,
        project_id: &str,
        jwt_token: &str,
    ) -> Result<ProjectSettings, ClientError> {
        let token = require(jwt_token, "JWT token")?;
        let project_id = path_segment(project_id, "project ID")?;
        self.request_json(
            Method::GET,
            &format!("{}/{}/settings", PROJECTS_PATH, project_id),
            Payload::Empty,
            Auth::Bearer(token),
        )
        .await
    }

    /// Create a project.
    pub async fn client_create_project(&self, name: &str, jwt_token: &str) -> Result<Project, ClientError> {
        let token = require(jwt_token, "JWT token")?;
        let name = require(name, "name")?;
        self.request_json(
            Method::POST,
            PROJECTS_PATH,
            Payload::json(&serde_json::json!({ "name": name }))?,
            Auth::Bearer(token),
        )
        .await
    }

    /// Update the fields of a project that are set in `update`.
    pub async fn client_update_project(
        &self,
        project_id: &str,
        jwt_token: &str,
        update: ProjectUpdate,
    ) -> Result<Project, ClientError> {
        let token = require(jwt_token, "JWT token")?;
        let project_id = path_segment(project_id, "project ID")?;
        self.request_json(
            Method::PUT,
            &format!("{}/{}", PROJECTS_PATH, project_id),
            Payload::json(&update)?,
            Auth::Bearer(token),
        )
        .await
    }

    /// Delete a project. Returns the server's acknowledgement as-is.
    pub async fn client_delete_project(&self, project_id: &str, jwt_token: &str) -> Result<Value, ClientError> {
        let token = require(jwt_token, "JWT token")?;
        let project_id = path_segment(project_id, "project ID")?;
        self.request_json(
            Method::DELETE,
            &format!("{}/{}", PROJECTS_PATH, project_id),
            Payload::Empty,
            Auth::Bearer(token),
        )
        .await
    }

    /// Use cases of a project with their full configuration.
    pub async fn client_list_use_cases(
        &self,
        project_id: &str,
        jwt_token: &str,
    ) -> Result<Vec<UseCase>, ClientError> {
        let token = require(jwt_token, "JWT token")?;
        let project_id = path_segment(project_id, "project ID")?;
        self.request_json(
            Method::GET,
            &use_cases_path(project_id),
            Payload::Empty,
            Auth::Bearer(token),
        )
        .await
    }

    /// One use case of a project.
    ///
    /// There is no fetch-by-id endpoint, so this lists the project's use
    /// cases and picks the matching one. Fails with status 404 when absent.
    pub async fn client_get_use_case(
        &self,
        project_id: &str,
        use_case_id: &str,
        jwt_token: &str,
    ) -> Result<UseCase, ClientError> {
        let use_case_id = require(use_case_id, "use case ID")?;
        self.client_list_use_cases(project_id, jwt_token)
            .await?
            .into_iter()
            .find(|uc| uc.id.as_deref() == Some(use_case_id))
            .ok_or_else(|| ClientError::not_found(format!("use case {} not found", use_case_id)))
    }

    /// Create a use case in a project.
    pub async fn client_create_use_case(
        &self,
        project_id: &str,
        jwt_token: &str,
        use_case: NewUseCase,
    ) -> Result<UseCase, ClientError> {
        let token = require(jwt_token, "JWT token")?;
        let project_id = path_segment(project_id, "project ID")?;
        let use_case = NewUseCase {
            key: require(&use_case.key, "key")?.to_string(),
            name: require(&use_case.name, "name")?.to_string(),
            ..use_case
        };

        self.request_json(
            Method::POST,
            &use_cases_path(project_id),
            Payload::json(&use_case)?,
            Auth::Bearer(token),
        )
        .await
    }

    /// Update the fields of a use case that are set in `update`.
    pub async fn client_update_use_case(
        &self,
        project_id: &str,
        use_case_id: &str,
        jwt_token: &str,
        update: UseCaseUpdate,
    ) -> Result<UseCase, ClientError> {
        let token = require(jwt_token, "JWT token")?;
        let project_id = path_segment(project_id, "project ID")?;
        let use_case_id = path_segment(use_case_id, "use case ID")?;
        self.request_json(
            Method::PUT,
            &format!("{}/{}", use_cases_path(project_id), use_case_id),
            Payload::json(&update)?,
            Auth::Bearer(token),
        )
        .await
    }

    /// Delete a use case. Returns the server's acknowledgement as-is.
    pub async fn client_delete_use_case(
        &self,
        project_id: &str,
        use_case_id: &str,
        jwt_token: &str,
    ) -> Result<Value, ClientError> {
        let token = require(jwt_token, "JWT token")?;
        let project_id = path_segment(project_id, "project ID")?;
        let use_case_id = path_segment(use_case_id, "use case ID")?;
        self.request_json(
            Method::DELETE,
            &format!("{}/{}", use_cases_path(project_id), use_case_id),
            Payload::Empty,
            Auth::Bearer(token),
        )
        .await
    }
}

fn use_cases_path(project_id: &str) -> String {
    format!("{}/{}/use-cases", PROJECTS_PATH, project_id)
}
