use std::time::Duration;

/// Flat retry budget: `max_retries` attempts with `delay` between consecutive
/// attempts. No backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            delay: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    /// 1-based attempt number
    pub number: u32,
    /// Pause to observe before issuing this attempt
    pub wait_before: Option<Duration>,
}

impl PollPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// The attempt plan shared by the async and blocking pollers.
    ///
    /// The first attempt is issued immediately; every later attempt waits `delay`.
    pub fn attempts(&self) -> impl Iterator<Item = Attempt> {
        let delay = self.delay;
        (1..=self.max_retries).map(move |number| Attempt {
            number,
            wait_before: (number > 1).then_some(delay),
        })
    }
}
