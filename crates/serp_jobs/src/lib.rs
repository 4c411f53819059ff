//! # Serp Jobs
//!
//! Client for job-oriented scraping backends (BrightData SERP). A search is
//! submitted once, then its result is polled for with a flat retry budget and a
//! flat delay between attempts.
//!
//! Two flavours share the same attempt/delay plan ([`PollPolicy::attempts`]):
//! [`JobPoller`] suspends on `tokio::time::sleep`, [`blocking::JobPoller`] parks
//! the calling thread.

pub mod backend;
pub mod blocking;
mod error;
mod poller;
mod policy;
mod query;
pub mod searches;
mod types;

pub use backend::{BrightData, BrightDataConfig, JobBackend};
pub use error::{BackendError, SubmissionError};
pub use poller::JobPoller;
pub use policy::{Attempt, PollPolicy};
pub use query::build_target_url;
pub use searches::{FlightQuery, HotelQuery, NewsQuery, SearchTarget};
pub use types::{FetchResponse, JobId, JobStatus, SearchJob, SubmitRequest, SubmitResponse};
