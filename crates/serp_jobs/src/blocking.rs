//! Thread-blocking flavour of the job poller.
//!
//! Same attempt count and inter-attempt delay as [`crate::JobPoller`]; the
//! calling thread sleeps instead of yielding.

use reqwest::blocking::Client;
use serde_json::Value;

use crate::{
    build_target_url, BackendError, BrightDataConfig, FetchResponse, FlightQuery, HotelQuery,
    JobId, NewsQuery, PollPolicy, SearchJob, SearchTarget, SubmissionError,
    SubmitRequest, SubmitResponse,
};

pub trait BlockingJobBackend {
    fn submit(&self, request: &SubmitRequest) -> Result<SubmitResponse, BackendError>;

    fn fetch_result(&self, job_id: &JobId) -> Result<FetchResponse, BackendError>;
}

/// BrightData SERP backend over a blocking `reqwest` client.
///
/// Must not be constructed or dropped from within an async runtime.
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

impl BlockingJobBackend for BrightData {
    fn submit(&self, request: &SubmitRequest) -> Result<SubmitResponse, BackendError> {
        let resp = self
            .client
            .post(self.config.req_url())
            .query(&self.config.zone_query())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().unwrap_or_default();
            return Err(BackendError::Api { status, message });
        }

        Ok(serde_json::from_str(&resp.text()?)?)
    }

    fn fetch_result(&self, job_id: &JobId) -> Result<FetchResponse, BackendError> {
        let resp = self
            .client
            .get(self.config.result_url())
            .query(&self.config.zone_query())
            .query(&[("response_id", job_id.as_str())])
            .bearer_auth(&self.config.api_key)
            .send()?;

        let status = resp.status().as_u16();
        Ok(FetchResponse {
            status,
            body: resp.text()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct JobPoller<B: BlockingJobBackend> {
    backend: B,
    policy: PollPolicy,
}

impl<B: BlockingJobBackend> JobPoller<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            policy: PollPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[tracing::instrument(skip(self, params))]
    pub fn try_submit<K, V>(
        &self,
        url: &str,
        params: &[(K, V)],
    ) -> Result<(SubmitRequest, JobId), SubmissionError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let request = SubmitRequest::new(build_target_url(url, params));
        let job_id = self.backend.submit(&request)?.into_job_id()?;

        tracing::debug!(%job_id, "Search job submitted");
        Ok((request, job_id))
    }

    pub fn submit<K, V>(&self, url: &str, params: &[(K, V)]) -> Option<JobId>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.try_submit(url, params)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to submit search job"))
            .ok()
            .map(|(_, job_id)| job_id)
    }

    #[tracing::instrument(skip(self))]
    pub fn poll(&self, job_id: &JobId, policy: PollPolicy) -> Option<Value> {
        for attempt in policy.attempts() {
            if let Some(wait) = attempt.wait_before {
                std::thread::sleep(wait);
            }

            match self.backend.fetch_result(job_id) {
                Ok(resp) => {
                    if let Some(result) = resp.ready_json() {
                        tracing::debug!(attempt = attempt.number, "Search job ready");
                        return Some(result);
                    }
                    tracing::debug!(
                        attempt = attempt.number,
                        status = resp.status,
                        "Search job not ready"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, attempt = attempt.number, "Error polling results");
                }
            }
        }

        tracing::warn!(
            %job_id,
            max_retries = policy.max_retries,
            "Retry budget exhausted"
        );
        None
    }

    pub fn search<K, V>(&self, url: &str, params: &[(K, V)], policy: PollPolicy) -> SearchJob
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let (request, job_id) = match self.try_submit(url, params) {
            Ok(submitted) => submitted,
            Err(e) => {
                tracing::error!(error = %e, "Failed to submit search job");
                return SearchJob::failed(SubmitRequest::new(build_target_url(url, params)));
            }
        };

        let mut job = SearchJob::pending(request, job_id.clone());
        job.settle(self.poll(&job_id, policy));
        job
    }

    pub fn search_target(&self, target: &SearchTarget) -> Option<Value> {
        self.search(&target.url, &target.params, self.policy)
            .into_result()
    }

    pub fn search_flights(&self, query: &FlightQuery) -> Option<Value> {
        self.search_target(&query.target())
    }

    pub fn search_hotels(&self, query: &HotelQuery) -> Option<Value> {
        self.search_target(&query.target())
    }

    pub fn search_news(&self, query: &NewsQuery) -> Option<Value> {
        self.search_target(&query.target())
    }
}
