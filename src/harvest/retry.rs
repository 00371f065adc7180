//! Per-offset retry state machine.
//!
//! A `RetryState` lives for exactly one offset. Each failed attempt yields a
//! [`Transition`]: either wait and retry (possibly with a smaller page), or wait
//! and give the offset up.

use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

use crate::config::RetryPolicy;

type Delays = std::iter::Map<ExponentialBackoff, fn(Duration) -> Duration>;

fn halve(d: Duration) -> Duration {
    d / 2
}

/// Waits of `base`, `2 * base`, `4 * base`, ... (millisecond resolution).
///
/// `ExponentialBackoff::from_millis(2).factor(base)` yields `2^n * base` for
/// n = 1, 2, ..., so halving each step gives `base * 2^(n-1)`.
pub fn backoff_delays(base: Duration) -> Delays {
    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    ExponentialBackoff::from_millis(2)
        .factor(base_ms)
        .map(halve as fn(Duration) -> Duration)
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Sleep `wait`, then request the same offset again with `page_size` rows.
    Retry {
        wait: Duration,
        page_size: usize,
        /// The page size was halved by this failure.
        shrunk: bool,
    },
    /// The attempt ceiling is reached: sleep `wait`, then move to the next offset.
    Exhausted { wait: Duration },
}

/// `{attempt, page size}` for one offset.
#[derive(Debug)]
pub struct RetryState {
    attempt: usize,
    page_size: usize,
    shrunk: bool,
    max_attempts: usize,
    shrink_after_attempt: usize,
    shrink_floor: usize,
    delays: Delays,
}

impl RetryState {
    pub fn new(policy: &RetryPolicy, page_size: usize) -> Self {
        RetryState {
            attempt: 1,
            page_size,
            shrunk: false,
            max_attempts: policy.max_attempts,
            shrink_after_attempt: policy.shrink_after_attempt,
            shrink_floor: policy.shrink_floor,
            delays: backoff_delays(policy.backoff_base),
        }
    }

    /// 1-based number of the attempt about to be made.
    pub fn attempt(&self) -> usize {
        self.attempt
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Page size for the attempt about to be made.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Records that the current attempt failed.
    pub fn on_failure(&mut self) -> Transition {
        let wait = self.delays.next().unwrap_or_default();
        let failed = self.attempt;
        if failed >= self.max_attempts {
            return Transition::Exhausted { wait };
        }

        let shrunk = !self.shrunk
            && failed == self.shrink_after_attempt
            && self.page_size > self.shrink_floor;
        if shrunk {
            self.page_size /= 2;
            self.shrunk = true;
        }
        self.attempt += 1;
        Transition::Retry {
            wait,
            page_size: self.page_size,
            shrunk,
        }
    }
}
