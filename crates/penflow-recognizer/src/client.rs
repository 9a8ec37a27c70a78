//! HTTP client for the remote ink service.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::classification::RawContentClassification;
use crate::error::{Error, Result};
use crate::request::RecognitionRequest;
use crate::result::RecognitionResult;
use crate::{Recognizer, ShapeClassifier};

/// Response formats the client accepts.
const ACCEPT: &str = "application/vnd.myscript.jiix,application/json";

/// Default batch endpoint.
pub const DEFAULT_URL: &str = "https://cloud.myscript.com/api/v4.0/iink/batch";

/// Connection settings for [`IinkClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IinkConfig {
    /// Batch endpoint URL.
    pub url: String,
    /// Application key sent with every request.
    pub application_key: String,
    /// Request signature sent with every request.
    pub hmac: String,
    /// User id header value.
    pub user_id: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for IinkConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            application_key: String::new(),
            hmac: String::new(),
            user_id: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Ink service client, usable as both [`Recognizer`] and [`ShapeClassifier`].
#[derive(Debug, Clone)]
pub struct IinkClient {
    http: reqwest::Client,
    config: IinkConfig,
}

impl IinkClient {
    /// Builds a client with its own connection pool.
    pub fn new(config: IinkConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Uses an existing HTTP client. The configured timeout is ignored.
    pub fn with_http_client(http: reqwest::Client, config: IinkConfig) -> Self {
        Self { http, config }
    }

    /// The connection settings.
    pub fn config(&self) -> &IinkConfig {
        &self.config
    }

    async fn post<T>(
        &self,
        request: &RecognitionRequest,
        unavailable: fn(String, Option<u16>) -> Error,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(
            url = %self.config.url,
            content_type = %request.content_type,
            points = request.point_count(),
            "Posting to ink service"
        );

        let response = self
            .http
            .post(&self.config.url)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header("applicationKey", &self.config.application_key)
            .header("hmac", &self.config.hmac)
            .header("userId", &self.config.user_id)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                unavailable(
                    format!("request to {} failed: {e}", self.config.url),
                    e.status().map(|s| s.as_u16()),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Ink service returned an error");
            return Err(unavailable(
                format!("ink service returned HTTP {status}: {body}"),
                Some(status.as_u16()),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::invalid_response(format!("unreadable ink service response: {e}")))
    }
}

#[async_trait]
impl Recognizer for IinkClient {
    async fn recognize(&self, request: RecognitionRequest) -> Result<RecognitionResult> {
        self.post(&request, |message, status| Error::recognizer(message, status))
            .await
    }
}

#[async_trait]
impl ShapeClassifier for IinkClient {
    async fn classify(&self, request: RecognitionRequest) -> Result<RawContentClassification> {
        let request = request.into_raw_content();
        self.post(&request, |message, status| Error::classifier(message, status))
            .await
    }
}
