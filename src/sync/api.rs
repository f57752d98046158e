use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::{
    CustomEventRecord, FileRecord, Kpi, NewCustomEvent, NewKpi, NewOkr, NewTimeEntry, Notification,
    NotificationSettings, Okr, Permission, Project, RecordId, Role, RolePermission, Task, TaskUpdate,
    TimeEntry, User, ValidationError,
};
use crate::storage::config::ApiConfig;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Authentication failed")]
    AuthenticationFailed,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Server rejected request: {0}")]
    Rejected(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// `{success, data, message}` wrapper used by every endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct RolePermissionChange<'a> {
    permission_id: &'a RecordId,
    allowed: bool,
}

#[derive(Debug, Serialize)]
struct RoleChange {
    role: Role,
}

#[derive(Debug, Serialize)]
struct ReadFlag {
    read: bool,
}

/// The subset of the API the calendar, board, poller and permission views
/// depend on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;

    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;

    async fn update_task(&self, task_id: &RecordId, update: &TaskUpdate) -> Result<(), ApiError>;

    async fn list_custom_events(&self) -> Result<Vec<CustomEventRecord>, ApiError>;

    async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError>;

    async fn list_permissions(&self) -> Result<Vec<Permission>, ApiError>;

    async fn role_permissions(&self, role: Role) -> Result<Vec<RolePermission>, ApiError>;
}

pub struct RestClient {
    base_url: String,
    access_token: Option<String>,
    client: reqwest::Client,
}

impl RestClient {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:5000/api";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: config.base_url.clone(),
            access_token: None,
            client,
        })
    }

    pub fn with_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Option<T>, ApiError> {
        let url = self.url(path);
        let request_id = Uuid::new_v4();

        tracing::info!("{} {} [{}]", method, url, request_id);

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header("X-Request-Id", request_id.to_string());

        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = body {
            tracing::debug!("{} {} with payload: {}", method, url, body);
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        tracing::info!("{} {} response status: {}", method, path, status);

        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::error!("Authentication failed for {} {}", method, path);
                return Err(ApiError::AuthenticationFailed);
            }
            StatusCode::FORBIDDEN => {
                tracing::error!("Forbidden: {} {}", method, path);
                return Err(ApiError::Forbidden(path.to_string()));
            }
            StatusCode::NOT_FOUND => {
                tracing::error!("Not found: {} {}", method, path);
                return Err(ApiError::NotFound(path.to_string()));
            }
            _ => {}
        }

        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("{} {} failed. Status: {}, Body: {}", method, path, status, body);
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or(body);
            return Err(ApiError::RequestError(format!("Status {}: {}", status, message)));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }

        let envelope: Envelope<T> = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::ParseError(format!("{} {}: {}", method, path, e)))?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "request was not successful".to_string());
            tracing::warn!("{} {} rejected: {}", method, path, message);
            return Err(ApiError::Rejected(message));
        }

        Ok(envelope.data)
    }

    /// Records that fail to deserialize are skipped rather than failing the
    /// whole list; a missing `data` field is an empty list.
    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let raw: Vec<serde_json::Value> = self
            .request(Method::GET, path, None)
            .await?
            .unwrap_or_default();

        let records: Vec<T> = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping malformed record from {}: {}", path, e);
                    None
                }
            })
            .collect();

        tracing::info!("Fetched {} records from {}", records.len(), path);
        Ok(records)
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<Option<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let value = serde_json::to_value(body)?;
        self.request(method, path, Some(&value)).await
    }

    async fn create<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, body)
            .await?
            .ok_or_else(|| ApiError::ParseError(format!("POST {}: response carried no data", path)))
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request::<serde_json::Value>(Method::DELETE, path, None)
            .await?;
        Ok(())
    }

    pub async fn list_kpis(&self) -> Result<Vec<Kpi>, ApiError> {
        self.fetch_list("kpis").await
    }

    pub async fn create_kpi(&self, kpi: &NewKpi) -> Result<Kpi, ApiError> {
        kpi.validate()?;
        self.create("kpis", kpi).await
    }

    pub async fn list_okrs(&self) -> Result<Vec<Okr>, ApiError> {
        self.fetch_list("okrs").await
    }

    pub async fn create_okr(&self, okr: &NewOkr) -> Result<Okr, ApiError> {
        okr.validate()?;
        self.create("okrs", okr).await
    }

    pub async fn list_time_entries(&self) -> Result<Vec<TimeEntry>, ApiError> {
        self.fetch_list("time-entries").await
    }

    pub async fn create_time_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry, ApiError> {
        entry.validate()?;
        self.create("time-entries", entry).await
    }

    pub async fn list_files(&self) -> Result<Vec<FileRecord>, ApiError> {
        self.fetch_list("files").await
    }

    pub async fn delete_file(&self, file_id: &RecordId) -> Result<(), ApiError> {
        self.delete(&format!("files/{}", urlencoding::encode(file_id.as_str())))
            .await
    }

    pub async fn create_custom_event(&self, event: &NewCustomEvent) -> Result<CustomEventRecord, ApiError> {
        event.validate()?;
        self.create("custom-events", event).await
    }

    pub async fn delete_custom_event(&self, event_id: &RecordId) -> Result<(), ApiError> {
        self.delete(&format!("custom-events/{}", urlencoding::encode(event_id.as_str())))
            .await
    }

    pub async fn mark_notification_read(&self, notification_id: &RecordId) -> Result<(), ApiError> {
        let path = format!("notifications/{}", urlencoding::encode(notification_id.as_str()));
        self.send::<_, serde_json::Value>(Method::PATCH, &path, &ReadFlag { read: true })
            .await?;
        Ok(())
    }

    pub async fn update_notification_settings(&self, settings: &NotificationSettings) -> Result<(), ApiError> {
        self.send::<_, serde_json::Value>(Method::PUT, "notifications/settings", settings)
            .await?;
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.fetch_list("admin/users").await
    }

    pub async fn update_user_role(&self, user_id: &RecordId, role: Role) -> Result<(), ApiError> {
        let path = format!("admin/users/{}", urlencoding::encode(user_id.as_str()));
        self.send::<_, serde_json::Value>(Method::PATCH, &path, &RoleChange { role })
            .await?;
        Ok(())
    }

    pub async fn set_role_permission(
        &self,
        role: Role,
        permission_id: &RecordId,
        allowed: bool,
    ) -> Result<(), ApiError> {
        let path = format!("admin/role-permissions/{}", urlencoding::encode(role.as_str()));
        let change = RolePermissionChange {
            permission_id,
            allowed,
        };
        self.send::<_, serde_json::Value>(Method::PUT, &path, &change)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DashboardApi for RestClient {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.fetch_list("projects").await
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.fetch_list("tasks").await
    }

    async fn update_task(&self, task_id: &RecordId, update: &TaskUpdate) -> Result<(), ApiError> {
        let path = format!("tasks/{}", urlencoding::encode(task_id.as_str()));
        tracing::info!("Updating task {}: {:?}", task_id, update);
        self.send::<_, serde_json::Value>(Method::PATCH, &path, update)
            .await?;
        Ok(())
    }

    async fn list_custom_events(&self) -> Result<Vec<CustomEventRecord>, ApiError> {
        self.fetch_list("custom-events").await
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.fetch_list("notifications").await
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>, ApiError> {
        self.fetch_list("admin/permissions").await
    }

    async fn role_permissions(&self, role: Role) -> Result<Vec<RolePermission>, ApiError> {
        let path = format!("admin/role-permissions/{}", urlencoding::encode(role.as_str()));
        self.fetch_list(&path).await
    }
}
