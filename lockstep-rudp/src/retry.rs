//! Retransmission policy.
//!
//! The protocol retries at a fixed interval: the socket receive timeout
//! converts each blocked wait into a retransmission, with no backoff.
//! [`RetryPolicy`] keeps that behavior as the unbounded default and lets
//! callers bound a loop by attempt count or wall-clock deadline instead of
//! polling forever.

use std::time::{Duration, Instant};

/// Bounds for a retransmission loop.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum transmission attempts (`None` = unbounded)
    pub max_attempts: Option<u32>,
    /// Wall-clock budget for the whole loop (`None` = unbounded)
    pub deadline: Option<Duration>,
}

impl RetryPolicy {
    /// Retry forever at the socket's receive interval.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            deadline: None,
        }
    }

    /// Cap the number of transmission attempts.
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            deadline: None,
        }
    }

    /// Cap the total time spent in the loop.
    pub fn with_deadline(deadline: Duration) -> Self {
        Self {
            max_attempts: None,
            deadline: Some(deadline),
        }
    }

    /// Begin tracking a new send loop.
    pub(crate) fn start(&self) -> RetryState {
        RetryState {
            policy: self.clone(),
            attempts: 0,
            started: Instant::now(),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Per-loop attempt tracking.
#[derive(Debug)]
pub(crate) struct RetryState {
    policy: RetryPolicy,
    attempts: u32,
    started: Instant,
}

impl RetryState {
    /// Record one transmission attempt. Returns `false` once the policy is
    /// exhausted; the first transmission is always allowed.
    pub(crate) fn attempt(&mut self) -> bool {
        self.attempts += 1;
        if self.attempts == 1 {
            return true;
        }
        if let Some(max) = self.policy.max_attempts {
            if self.attempts > max {
                return false;
            }
        }
        if let Some(deadline) = self.policy.deadline {
            if self.started.elapsed() > deadline {
                return false;
            }
        }
        true
    }

    /// Attempts recorded so far, including a final refused one.
    pub(crate) fn attempts(&self) -> u32 {
        self.attempts
    }
}
