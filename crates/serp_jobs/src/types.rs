use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SubmissionError;

/// Opaque job identifier issued by the backend on submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        JobId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of the `/req` submission call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitRequest {
    pub url: String,
    pub brd_json: &'static str,
}

impl SubmitRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            brd_json: "json",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub response_id: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
}

impl SubmitResponse {
    /// `response_id` wins over `job_id`; empty identifiers are rejected.
    pub fn into_job_id(self) -> Result<JobId, SubmissionError> {
        self.response_id
            .or(self.job_id)
            .filter(|id| !id.trim().is_empty())
            .map(JobId)
            .ok_or(SubmissionError::MissingJobId)
    }
}

/// Raw outcome of one `/get_result` call.
///
/// Pending jobs answer with a non-200 status or a body that is not JSON, so the
/// body is kept as text and only parsed by [`FetchResponse::ready_json`].
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ready_json(&self) -> Option<Value> {
        if self.status != 200 {
            return None;
        }

        serde_json::from_str(&self.body)
            .inspect_err(|e| {
                let preview = self.body.chars().take(200).collect::<String>();
                tracing::warn!(error = %e, raw = %preview, "Failed to parse result body");
            })
            .ok()
    }
}

/// A job only exists once the backend issued its id, so it starts out `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Ready,
    Failed,
    TimedOut,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Ready | JobStatus::Failed | JobStatus::TimedOut)
    }
}

/// One search operation, from submission to a terminal status.
#[derive(Debug, Clone)]
pub struct SearchJob {
    pub id: Option<JobId>,
    pub status: JobStatus,
    pub payload: SubmitRequest,
    pub result: Option<Value>,
}

impl SearchJob {
    pub(crate) fn failed(payload: SubmitRequest) -> Self {
        Self {
            id: None,
            status: JobStatus::Failed,
            payload,
            result: None,
        }
    }

    pub(crate) fn pending(payload: SubmitRequest, id: JobId) -> Self {
        Self {
            id: Some(id),
            status: JobStatus::Pending,
            payload,
            result: None,
        }
    }

    pub(crate) fn settle(&mut self, result: Option<Value>) {
        self.status = if result.is_some() {
            JobStatus::Ready
        } else {
            JobStatus::TimedOut
        };
        self.result = result;
    }

    pub fn into_result(self) -> Option<Value> {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_serializes_brd_json_flag() {
        let body = serde_json::to_value(SubmitRequest::new("https://example.com")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"url": "https://example.com", "brd_json": "json"})
        );
    }

    #[test]
    fn test_response_id_preferred_over_job_id() {
        let resp: SubmitResponse =
            serde_json::from_str(r#"{"response_id": "r-1", "job_id": "j-1"}"#).unwrap();
        assert_eq!(resp.into_job_id().unwrap(), JobId::new("r-1"));

        let resp: SubmitResponse = serde_json::from_str(r#"{"job_id": "j-1"}"#).unwrap();
        assert_eq!(resp.into_job_id().unwrap(), JobId::new("j-1"));
    }

    #[test]
    fn test_missing_or_blank_identifier_is_rejected() {
        let resp: SubmitResponse = serde_json::from_str(r#"{"status": "queued"}"#).unwrap();
        assert!(matches!(
            resp.into_job_id(),
            Err(SubmissionError::MissingJobId)
        ));

        let resp: SubmitResponse = serde_json::from_str(r#"{"response_id": "  "}"#).unwrap();
        assert!(resp.into_job_id().is_err());
    }

    #[test]
    fn test_ready_json_requires_exact_200_and_valid_json() {
        assert!(FetchResponse::new(202, r#"{"ok": true}"#).ready_json().is_none());
        assert!(FetchResponse::new(201, r#"{"ok": true}"#).ready_json().is_none());
        assert!(FetchResponse::new(200, "still processing").ready_json().is_none());
        assert_eq!(
            FetchResponse::new(200, r#"{"ok": true}"#).ready_json(),
            Some(serde_json::json!({"ok": true}))
        );
    }

    #[test]
    fn test_job_settles_from_pending() {
        let request = SubmitRequest::new("https://example.com");
        let mut job = SearchJob::pending(request.clone(), JobId::new("r-1"));
        assert_eq!(job.status, JobStatus::Pending);
        assert!(!job.status.is_terminal());

        job.settle(Some(serde_json::json!({"ok": true})));
        assert_eq!(job.status, JobStatus::Ready);
        assert!(job.status.is_terminal());

        let mut job = SearchJob::pending(request, JobId::new("r-2"));
        job.settle(None);
        assert_eq!(job.status, JobStatus::TimedOut);
        assert!(job.into_result().is_none());
    }
}
