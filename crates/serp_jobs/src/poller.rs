use serde_json::Value;

use crate::{
    build_target_url, FlightQuery, HotelQuery, JobBackend, JobId, NewsQuery, PollPolicy, SearchJob,
    SearchTarget, SubmissionError, SubmitRequest,
};

/// Submits search jobs and waits for their results, yielding to the runtime
/// between attempts.
#[derive(Debug, Clone)]
pub struct JobPoller<B: JobBackend> {
    backend: B,
    policy: PollPolicy,
}

impl<B: JobBackend + Sync> JobPoller<B> {
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

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Submits a scrape of `url` + `params` and returns the issued job id.
    #[tracing::instrument(skip(self, params))]
    pub async fn try_submit<K, V>(
        &self,
        url: &str,
        params: &[(K, V)],
    ) -> Result<(SubmitRequest, JobId), SubmissionError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let request = SubmitRequest::new(build_target_url(url, params));
        let job_id = self
            .backend
            .submit(&request)
            .await
            .map_err(SubmissionError::from)
            .and_then(|resp| resp.into_job_id())?;

        tracing::debug!(%job_id, "Search job submitted");
        Ok((request, job_id))
    }

    /// Fail-soft [`JobPoller::try_submit`]: any failure is logged and yields `None`.
    pub async fn submit<K, V>(&self, url: &str, params: &[(K, V)]) -> Option<JobId>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.try_submit(url, params)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to submit search job"))
            .ok()
            .map(|(_, job_id)| job_id)
    }

    /// Polls for the job's result.
    ///
    /// `None` means the outcome is unknown, not that the job failed.
    #[tracing::instrument(skip(self))]
    pub async fn poll(&self, job_id: &JobId, policy: PollPolicy) -> Option<Value> {
        for attempt in policy.attempts() {
            if let Some(wait) = attempt.wait_before {
                tokio::time::sleep(wait).await;
            }

            match self.backend.fetch_result(job_id).await {
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

    /// Submit then poll. A failed submission never polls.
    pub async fn search<K, V>(&self, url: &str, params: &[(K, V)], policy: PollPolicy) -> SearchJob
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let (request, job_id) = match self.try_submit(url, params).await {
            Ok(submitted) => submitted,
            Err(e) => {
                tracing::error!(error = %e, "Failed to submit search job");
                let request = SubmitRequest::new(build_target_url(url, params));
                return SearchJob::failed(request);
            }
        };

        let mut job = SearchJob::pending(request, job_id.clone());
        let result = self.poll(&job_id, policy).await;
        job.settle(result);
        job
    }

    pub async fn search_target(&self, target: &SearchTarget) -> Option<Value> {
        self.search(&target.url, &target.params, self.policy)
            .await
            .into_result()
    }

    pub async fn search_flights(&self, query: &FlightQuery) -> Option<Value> {
        self.search_target(&query.target()).await
    }

    pub async fn search_hotels(&self, query: &HotelQuery) -> Option<Value> {
        self.search_target(&query.target()).await
    }

    pub async fn search_news(&self, query: &NewsQuery) -> Option<Value> {
        self.search_target(&query.target()).await
    }
}
