//! Bounded readiness polling.
//!
//! Provisioning latency is variable; a fixed-duration sleep either wastes
//! time or races the real creation. This module replaces that with a capped
//! sleep-and-retry loop against a status query: the check runs immediately,
//! then at `interval` spacing until it reports ready or `max_wait` elapses.
//! The check itself must be a read-only status query so an interrupted poll
//! is safe to resume.

use std::time::{Duration, Instant};

/// One observation from a readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    NotReady,
}

/// Final outcome of a bounded poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The check reported ready within the window.
    Ready,
    /// `max_wait` elapsed without a ready observation.
    TimedOut { waited: Duration },
}

/// Repeatedly invoke `check` until it reports [`Readiness::Ready`] or
/// `max_wait` elapses. `NotReady` is the one retried condition; errors from
/// the check propagate immediately.
pub fn poll_until_ready<E, F>(
    mut check: F,
    interval: Duration,
    max_wait: Duration,
) -> Result<PollOutcome, E>
where
    F: FnMut() -> Result<Readiness, E>,
{
    let started = Instant::now();
    loop {
        if check()? == Readiness::Ready {
            return Ok(PollOutcome::Ready);
        }
        let elapsed = started.elapsed();
        if elapsed >= max_wait {
            return Ok(PollOutcome::TimedOut { waited: elapsed });
        }
        // Never sleep past the deadline.
        let remaining = max_wait - elapsed;
        std::thread::sleep(interval.min(remaining));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
