use std::time::Duration;

use super::{parse_record, ConsultationSource, FetchError};
use crate::config::{PipelineConfig, LATEST_CONSULTATION_PATH};
use crate::models::ConsultationRecord;

/// HTTP client for the consultation service.
pub struct HttpConsultationSource {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpConsultationSource {
    /// Create a source for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, FetchError> {
        Self::new(&config.base_url, config.request_timeout)
    }

    pub fn latest_url(&self) -> String {
        format!("{}{}", self.base_url, LATEST_CONSULTATION_PATH)
    }

    fn map_send_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout.as_secs())
        } else if e.is_connect() {
            FetchError::Connection(self.base_url.clone())
        } else {
            FetchError::Client(e.to_string())
        }
    }
}

impl ConsultationSource for HttpConsultationSource {
    async fn fetch_latest(&self) -> Result<ConsultationRecord, FetchError> {
        let url = self.latest_url();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_send_error(e))?;

        parse_record(&body)
    }
}
