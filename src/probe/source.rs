use super::ProbeError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

/// Where probe pages come from
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, ProbeError>;
}

/// Fetches pages over HTTP with a shared, pooled client
#[derive(Debug, Clone)]
pub struct ReqwestSource {
    client: Client,
}

impl ReqwestSource {
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProbeError::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for ReqwestSource {
    async fn fetch(&self, url: &Url) -> Result<String, ProbeError> {
        let request_error = |source| ProbeError::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(request_error)
    }
}
