use std::future::Future;

use reqwest::Client;

use crate::{BackendError, FetchResponse, JobId, SubmitRequest, SubmitResponse};

/// A remote backend that computes search jobs asynchronously.
pub trait JobBackend {
    fn submit(
        &self,
        request: &SubmitRequest,
    ) -> impl Future<Output = Result<SubmitResponse, BackendError>> + Send;

    fn fetch_result(
        &self,
        job_id: &JobId,
    ) -> impl Future<Output = Result<FetchResponse, BackendError>> + Send;
}

#[derive(Debug, Clone)]
pub struct BrightDataConfig {
    pub base_url: String,
    pub api_key: String,
    pub customer: String,
    pub zone: String,
}

impl BrightDataConfig {
    pub const DEFAULT_BASE_URL: &str = "https://api.brightdata.com/serp";

    pub fn new(
        api_key: impl Into<String>,
        customer: impl Into<String>,
        zone: impl Into<String>,
    ) -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            customer: customer.into(),
            zone: zone.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub(crate) fn req_url(&self) -> String {
        format!("{}/req", self.base_url.trim_end_matches('/'))
    }

    pub(crate) fn result_url(&self) -> String {
        format!("{}/get_result", self.base_url.trim_end_matches('/'))
    }

    pub(crate) fn zone_query(&self) -> [(&'static str, &str); 2] {
        [("customer", self.customer.as_str()), ("zone", self.zone.as_str())]
    }
}

/// BrightData SERP backend over an async `reqwest` client.
#[derive(Debug, Clone)]
pub struct BrightData {
    client: Client,
    config: BrightDataConfig,
}

impl BrightData {
    pub fn new(config: BrightDataConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

impl JobBackend for BrightData {
    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitResponse, BackendError> {
        let resp = self
            .client
            .post(self.config.req_url())
            .query(&self.config.zone_query())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(BackendError::Api { status, message });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_result(&self, job_id: &JobId) -> Result<FetchResponse, BackendError> {
        let resp = self
            .client
            .get(self.config.result_url())
            .query(&self.config.zone_query())
            .query(&[("response_id", job_id.as_str())])
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(FetchResponse { status, body })
    }
}
