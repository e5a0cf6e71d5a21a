//! HTTP job backend client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{BackendError, JobBackend};
use crate::domain::{BatchDescriptor, BatchJobRequest, JobFilter, JobRecord, JobSpec};

/// Request timeout for job backend calls
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Job backend speaking JSON over HTTP
///
/// `GET {base}/jobs[?type=...]` lists runs, `POST {base}/jobs` launches one.
pub struct HttpJobBackend {
    base_url: String,
    http: Client,
}

impl HttpJobBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(%base_url, "HttpJobBackend::new: called");
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { base_url, http })
    }

    fn jobs_url(&self) -> String {
        format!("{}/jobs", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl JobBackend for HttpJobBackend {
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobRecord>, BackendError> {
        debug!(?filter, "HttpJobBackend::list_jobs: called");
        let mut request = self.http.get(self.jobs_url());
        if let Some(job_type) = filter.job_type {
            request = request.query(&[("type", job_type.to_string())]);
        }
        let jobs: Vec<JobRecord> = Self::decode(request.send().await?).await?;
        debug!(count = jobs.len(), "HttpJobBackend::list_jobs: listed");
        Ok(jobs)
    }

    async fn create_job(&self, spec: &JobSpec, refs: &BatchDescriptor) -> Result<JobRecord, BackendError> {
        debug!(job = %spec.name, refs = %refs, "HttpJobBackend::create_job: called");
        let body = BatchJobRequest::new(spec, refs);
        let response = self.http.post(self.jobs_url()).json(&body).send().await?;
        Self::decode(response).await
    }
}
