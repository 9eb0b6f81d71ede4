use crate::models::ServiceEndpoint;
use std::time::Duration;

/// A single read-only reachability check against one service.
///
/// Implementations report *why* a check failed; the monitor folds every
/// failure into `offline` and only logs the reason.
#[async_trait::async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self, endpoint: &ServiceEndpoint) -> Result<(), String>;
}

pub struct ReqwestProbe {
    client: reqwest::Client,
}

impl ReqwestProbe {
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HealthProbe for ReqwestProbe {
    async fn check(&self, endpoint: &ServiceEndpoint) -> Result<(), String> {
        let response = self
            .client
            .get(endpoint.health_url())
            .send()
            .await
            .map_err(|err| format!("request failed: {err}"))?;

        if !response.status().is_success() {
            return Err(format!("request failed: status {}", response.status()));
        }
        Ok(())
    }
}
