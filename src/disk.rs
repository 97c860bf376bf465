use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::YandexConfig;

/// Failures while talking to Yandex.Disk. The two kinds stay separate
/// because they produce different user-facing replies: a transport failure
/// is logged and answered with the generic cancellation text, an API error
/// is shown to the user as-is.
#[derive(Debug, Error)]
pub enum DiskError {
    #[error("Yandex.Disk request failed: {0}")]
    Request(String),
    #[error("Yandex.Disk Error: {name} ({detail})")]
    Api { name: String, detail: String },
}

impl From<reqwest::Error> for DiskError {
    fn from(err: reqwest::Error) -> Self {
        DiskError::Request(err.to_string())
    }
}

/// One Yandex.Disk API response: the HTTP status plus the error payload,
/// if the body carried one. Success bodies leave all three fields empty.
#[derive(Debug, Clone, Default)]
pub struct DiskResponse {
    pub status: u16,
    pub error: Option<String>,
    pub message: Option<String>,
    pub description: Option<String>,
}

impl DiskResponse {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Human-readable detail for an error response.
    pub fn error_detail(&self) -> &str {
        self.message
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or("?")
    }

    pub fn api_error(&self) -> DiskError {
        DiskError::Api {
            name: self.error.clone().unwrap_or_default(),
            detail: self.error_detail().to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct DiskErrorBody {
    error: Option<String>,
    message: Option<String>,
    description: Option<String>,
}

/// Storage gateway seam. Handlers depend on this trait so the folder
/// traversal can be exercised against a scripted fake.
#[async_trait]
pub trait DiskApi: Send + Sync {
    async fn create_folder(&self, access_token: &str, path: &str)
        -> Result<DiskResponse, DiskError>;
}

pub struct DiskClient {
    client: reqwest::Client,
    base_url: String,
}

impl DiskClient {
    pub fn new(config: &YandexConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DiskApi for DiskClient {
    async fn create_folder(
        &self,
        access_token: &str,
        path: &str,
    ) -> Result<DiskResponse, DiskError> {
        let url = format!("{}/resources", self.base_url);

        debug!("PUT {} path={}", url, path);

        let response = self
            .client
            .put(&url)
            .query(&[("path", path)])
            .header("Authorization", format!("OAuth {}", access_token))
            .send()
            .await?;

        let status = response.status().as_u16();
        // 201 comes with a Link body, errors with an error payload; anything
        // that doesn't parse as the error shape counts as a success body.
        let body = response.text().await.unwrap_or_default();
        let body: DiskErrorBody = serde_json::from_str(&body).unwrap_or_default();

        Ok(DiskResponse {
            status,
            error: body.error,
            message: body.message,
            description: body.description,
        })
    }
}
