//! HTTP client for the records backend.

use reqwest::StatusCode;
use tracing::{debug, info};

use super::{Receipt, SubmitError, Submitter};
use crate::form::Record;

/// Talks to `{server}/api/records` with a bearer API key.
#[derive(Debug, Clone)]
pub struct HttpRecordClient {
    server_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpRecordClient {
    pub fn new(server_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let server_url: String = server_url.into();
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Builds a client from optional settings; both are required.
    pub fn from_settings(
        server_url: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<Self, SubmitError> {
        match (server_url, api_key) {
            (Some(url), Some(key)) if !url.is_empty() => Ok(Self::new(url, key)),
            _ => Err(SubmitError::NotConfigured),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn records_url(&self) -> String {
        format!("{}/api/records", self.server_url)
    }

    pub fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.records_url(), id)
    }

    /// Checks that the server answers on `/health`.
    pub async fn check_server(&self) -> Result<(), SubmitError> {
        let response = self
            .client
            .get(format!("{}/health", self.server_url))
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }

    /// Loads a saved record for editing.
    pub async fn fetch(&self, id: &str) -> Result<Record, SubmitError> {
        debug!(id, "fetching record");
        let response = self
            .client
            .get(self.record_url(id))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SubmitError::NotFound(id.to_string()));
        }
        let response = ensure_success(response).await?;
        Ok(response.json::<Record>().await?)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SubmitError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SubmitError::Status {
        status: status.as_u16(),
        body,
    })
}

impl Submitter for HttpRecordClient {
    async fn submit(&self, record: &Record) -> Result<Receipt, SubmitError> {
        let response = self
            .client
            .post(self.records_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(record)
            .send()
            .await?;
        let receipt = ensure_success(response).await?.json::<Receipt>().await?;
        info!(id = %receipt.id, form = %record.form_name, "record submitted");
        Ok(receipt)
    }
}
