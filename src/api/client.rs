use std::future::Future;

use reqwest::Client;
use reqwest::header::CONTENT_DISPOSITION;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::{DownloadError, PollError, SubmissionError};
use super::types::{CreatedJob, Health, JobSnapshot};
use crate::request::TransportPayload;

const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// The two job operations the orchestrator depends on.
///
/// Futures are `Send` so polls can run on spawned tasks.
pub trait JobApi: Send + Sync + 'static {
    fn create_job(
        &self,
        payload: TransportPayload,
    ) -> impl Future<Output = Result<CreatedJob, SubmissionError>> + Send;

    fn get_status(
        &self,
        job_id: &str,
    ) -> impl Future<Output = Result<JobSnapshot, PollError>> + Send;
}

/// A downloaded conversion result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct JobClient {
    client: Client,
    base_url: String,
}

impl JobClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    /// Create a client pointing at a custom base URL. Trailing slashes are
    /// dropped so endpoint paths can be appended verbatim.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/health/ready`.
    pub async fn health(&self) -> Result<bool, PollError> {
        let url = format!("{}/health/ready", self.base_url);
        let health: Health = self.get_json(&url).await?;
        Ok(health.ok)
    }

    /// Downloads an already resolved download reference.
    pub async fn fetch_artifact(&self, url: &str) -> Result<Artifact, DownloadError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DownloadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_file_name)
            .unwrap_or_else(|| file_name_from_url(url));
        let bytes = response.bytes().await?.to_vec();
        Ok(Artifact { file_name, bytes })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, PollError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PollError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|e| PollError::InvalidResponse(e.to_string()))
    }
}

impl Default for JobClient {
    fn default() -> Self {
        Self::new()
    }
}

impl JobApi for JobClient {
    async fn create_job(&self, payload: TransportPayload) -> Result<CreatedJob, SubmissionError> {
        let url = format!("{}/jobs/", self.base_url);
        debug!(%url, "creating job");
        let response = self
            .client
            .post(&url)
            .multipart(payload.into_form())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| SubmissionError::InvalidResponse(e.to_string()))
    }

    async fn get_status(&self, job_id: &str) -> Result<JobSnapshot, PollError> {
        let url = format!("{}/jobs/{job_id}", self.base_url);
        self.get_json(&url).await
    }
}

/// Extracts `filename=` from a `Content-Disposition` header value.
fn disposition_file_name(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

/// Last path segment of `url`, or `download` when there is none.
fn file_name_from_url(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|last| !last.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "download".to_string())
}
