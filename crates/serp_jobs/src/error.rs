#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Job submission failed: {0}")]
    Backend(#[from] BackendError),
    #[error("Submission response carried neither `response_id` nor `job_id`")]
    MissingJobId,
}
