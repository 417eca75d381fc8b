use std::fmt;
use std::time::Duration;
use crate::diagnostics::{Diagnostics, Event};
use crate::driver::Driver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBudget {
    pub max_polls: usize,
    pub interval: Duration,
    /// Polls during which the failure fragment is tolerated.
    pub grace_iterations: usize,
}

impl Default for PollBudget {
    fn default() -> Self {
        Self {
            max_polls: 20,
            interval: Duration::from_millis(500),
            grace_iterations: 4,
        }
    }
}

/// Classified result of waiting for the post-login redirect.
/// Each variant carries the last URL seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Success(String),
    Failed(String),
    Exhausted(String),
}

impl PollOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PollOutcome::Success(_))
    }
}

impl fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollOutcome::Success(url) => write!(f, "success ({})", url),
            PollOutcome::Failed(url) => write!(f, "failed ({})", url),
            PollOutcome::Exhausted(url) => write!(f, "exhausted ({})", url),
        }
    }
}

/// Samples the page URL once per interval until it shows `success`, shows
/// `failure` past the grace period, or the budget runs out.
pub fn classify_login(
    driver: &dyn Driver,
    success: &str,
    failure: &str,
    budget: PollBudget,
    diagnostics: &dyn Diagnostics,
) -> PollOutcome {
    let mut url = driver.url();
    let mut outcome = None;

    for i in 0..budget.max_polls {
        driver.wait(budget.interval);
        url = driver.url();
        diagnostics.record(Event::PollTick { iteration: i, url: url.clone() });

        if url.contains(success) {
            outcome = Some(PollOutcome::Success(url.clone()));
            break;
        }
        if url.contains(failure) && i > budget.grace_iterations {
            outcome = Some(PollOutcome::Failed(url.clone()));
            break;
        }
    }

    let outcome = outcome.unwrap_or(PollOutcome::Exhausted(url));
    diagnostics.record(Event::PollFinished(outcome.clone()));
    outcome
}
