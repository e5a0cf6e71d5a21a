//! HTTP merge queue client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{QueueError, QueueSource};
use crate::domain::CandidatePr;

/// Request timeout for the queue endpoint
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Payload served by the submit queue status endpoint
#[derive(Debug, Deserialize)]
struct QueueStatus {
    #[serde(rename = "E2EQueue", default)]
    e2e_queue: Vec<CandidatePr>,
}

/// Reads the queue from a submit-queue status URL
pub struct HttpQueueSource {
    url: String,
    http: Client,
}

impl HttpQueueSource {
    pub fn new(url: impl Into<String>) -> Result<Self, QueueError> {
        let url = url.into();
        debug!(%url, "HttpQueueSource::new: called");
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { url, http })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QueueSource for HttpQueueSource {
    async fn fetch_queue(&self) -> Result<Vec<CandidatePr>, QueueError> {
        debug!(url = %self.url, "HttpQueueSource::fetch_queue: called");
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(QueueError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let queue: QueueStatus = serde_json::from_str(&body)?;
        debug!(entries = queue.e2e_queue.len(), "HttpQueueSource::fetch_queue: parsed");
        Ok(queue.e2e_queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_queue() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/github-e2e-queue"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "E2EQueue": [
                    {"Number": 101, "BaseRef": "master"},
                    {"Number": 7, "BaseRef": "release-1.9"},
                    {"Number": 102, "BaseRef": ""}
                ],
                "BlockedPRs": []
            })))
            .mount(&server)
            .await;

        let source = HttpQueueSource::new(format!("{}/github-e2e-queue", server.uri())).unwrap();
        let queue = source.fetch_queue().await.unwrap();
        assert_eq!(
            queue,
            vec![
                CandidatePr::new(101, "master"),
                CandidatePr::new(7, "release-1.9"),
                CandidatePr::new(102, ""),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_queue_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let source = HttpQueueSource::new(server.uri()).unwrap();
        assert!(source.fetch_queue().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let source = HttpQueueSource::new(server.uri()).unwrap();
        let result = source.fetch_queue().await;
        assert!(matches!(result, Err(QueueError::Status { status: 502, .. })));
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let source = HttpQueueSource::new(server.uri()).unwrap();
        assert!(matches!(source.fetch_queue().await, Err(QueueError::Json(_))));
    }
}
