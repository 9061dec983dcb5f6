//! Poll-Until-Match Engine
//!
//! Bounded retry loop behind every verify keyword. The engine never creates
//! errors of its own: it hands back the last observed value and the caller
//! decides how to report a non-match.
//!
//! Loop shape:
//!
//! 1. note whether the deadline has passed
//! 2. produce a value, return it at once if the predicate holds
//! 3. if the deadline had passed in step 1, return the value
//! 4. sleep `poll_interval`, go to 1
//!
//! There is always at least one evaluation, there is no sleep after a
//! success, and the final evaluation starts at or after the deadline.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default poll interval between attempts
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default timeout for state, list and table verifications
pub const DEFAULT_STATE_TIMEOUT: Duration = Duration::from_secs(2);

/// Timing of one poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSpec {
    /// Total time budget
    pub timeout: Duration,
    /// Sleep between attempts
    pub poll_interval: Duration,
}

impl Default for PollSpec {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_STATE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PollSpec {
    /// Create a poll spec with the default interval
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Create from float seconds; negative or NaN values become zero
    #[must_use]
    pub fn from_secs_f64(timeout: f64, poll_interval: f64) -> Self {
        Self {
            timeout: secs(timeout),
            poll_interval: secs(poll_interval),
        }
    }

    /// Set the timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// A single evaluation, no waiting
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            timeout: Duration::ZERO,
            poll_interval: Duration::ZERO,
        }
    }
}

pub(crate) fn secs(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::try_from_secs_f64(value).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

/// Poll a fallible producer until `predicate` holds or the deadline passes
///
/// Producer errors are returned at once without retrying.
pub fn try_poll_until<T, E, P, F>(spec: PollSpec, mut produce: P, mut predicate: F) -> Result<T, E>
where
    P: FnMut() -> Result<T, E>,
    F: FnMut(&T) -> bool,
{
    let start = Instant::now();
    let deadline = start.checked_add(spec.timeout);
    let mut attempt: u32 = 0;
    let elapsed_ms = || start.elapsed().as_millis() as u64;

    loop {
        let expired = deadline.is_some_and(|d| Instant::now() >= d);
        attempt += 1;
        let value = produce()?;
        if predicate(&value) {
            debug!(attempt, elapsed_ms = elapsed_ms(), "poll matched");
            return Ok(value);
        }
        if expired {
            debug!(attempt, elapsed_ms = elapsed_ms(), "poll deadline reached");
            return Ok(value);
        }
        std::thread::sleep(spec.poll_interval);
    }
}

/// Poll an infallible producer; returns the last produced value
pub fn poll_until<T, P, F>(spec: PollSpec, mut produce: P, predicate: F) -> T
where
    P: FnMut() -> T,
    F: FnMut(&T) -> bool,
{
    match try_poll_until::<T, Infallible, _, _>(spec, || Ok(produce()), predicate) {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Poll a boolean state until it equals `expected`; returns the last observation
pub fn poll_until_yes_no<P>(spec: PollSpec, produce: P, expected: bool) -> bool
where
    P: FnMut() -> bool,
{
    poll_until(spec, produce, |observed| *observed == expected)
}

/// Fallible form of [`poll_until_yes_no`]
pub fn try_poll_until_yes_no<E, P>(spec: PollSpec, produce: P, expected: bool) -> Result<bool, E>
where
    P: FnMut() -> Result<bool, E>,
{
    try_poll_until(spec, produce, |observed| *observed == expected)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn fast(timeout_ms: u64, poll_ms: u64) -> PollSpec {
        PollSpec::new(Duration::from_millis(timeout_ms))
            .with_poll_interval(Duration::from_millis(poll_ms))
    }

    mod spec_tests {
        use super::*;

        #[test]
        fn test_default() {
            let spec = PollSpec::default();
            assert_eq!(spec.timeout, Duration::from_secs(2));
            assert_eq!(spec.poll_interval, Duration::from_millis(100));
        }

        #[test]
        fn test_from_secs_clamps() {
            let spec = PollSpec::from_secs_f64(-1.0, f64::NAN);
            assert_eq!(spec.timeout, Duration::ZERO);
            assert_eq!(spec.poll_interval, Duration::ZERO);
            let spec = PollSpec::from_secs_f64(1.5, 0.25);
            assert_eq!(spec.timeout, Duration::from_millis(1500));
            assert_eq!(spec.poll_interval, Duration::from_millis(250));
        }

        #[test]
        fn test_serde() {
            let spec = fast(500, 50);
            let json = serde_json::to_string(&spec).unwrap();
            let back: PollSpec = serde_json::from_str(&json).unwrap();
            assert_eq!(back, spec);
        }
    }

    mod loop_tests {
        use super::*;

        #[test]
        fn test_immediate_success_does_not_sleep() {
            let spec = fast(5_000, 1_000);
            let start = Instant::now();
            let value = poll_until(spec, || 42, |v| *v == 42);
            assert_eq!(value, 42);
            assert!(start.elapsed() < Duration::from_millis(500));
        }

        #[test]
        fn test_success_after_n_attempts() {
            let spec = fast(2_000, 10);
            let mut calls = 0;
            let start = Instant::now();
            let value = poll_until(
                spec,
                || {
                    calls += 1;
                    calls
                },
                |v| *v == 4,
            );
            assert_eq!(value, 4);
            assert_eq!(calls, 4);
            // three sleeps of 10ms, well under the timeout
            assert!(start.elapsed() < Duration::from_millis(1_000));
        }

        #[test]
        fn test_final_evaluation_at_or_after_deadline() {
            let timeout = Duration::from_millis(120);
            let spec = PollSpec::new(timeout).with_poll_interval(Duration::from_millis(50));
            let start = Instant::now();
            let mut stamps = Vec::new();
            let value = poll_until(
                spec,
                || {
                    stamps.push(start.elapsed());
                    stamps.len()
                },
                |_| false,
            );
            assert_eq!(value, stamps.len());
            let last = *stamps.last().unwrap();
            assert!(last >= timeout, "last evaluation at {last:?}");
        }

        #[test]
        fn test_zero_timeout_evaluates_once() {
            let mut calls = 0;
            let value = poll_until(
                PollSpec::immediate(),
                || {
                    calls += 1;
                    "x"
                },
                |_| false,
            );
            assert_eq!(value, "x");
            assert_eq!(calls, 1);
        }

        #[test]
        fn test_yes_no() {
            let mut state = false;
            let observed = poll_until_yes_no(
                fast(1_000, 5),
                || {
                    state = !state;
                    state
                },
                true,
            );
            assert!(observed);
            let observed = poll_until_yes_no(PollSpec::immediate(), || true, false);
            assert!(observed);
        }
    }

    mod fallible_tests {
        use super::*;

        #[test]
        fn test_error_propagates_without_retry() {
            let mut calls = 0;
            let result: Result<i32, String> = try_poll_until(
                fast(1_000, 10),
                || {
                    calls += 1;
                    Err("boom".to_string())
                },
                |_| true,
            );
            assert_eq!(result.unwrap_err(), "boom");
            assert_eq!(calls, 1);
        }

        #[test]
        fn test_error_after_some_values() {
            let mut calls = 0;
            let result: Result<i32, &str> = try_poll_until(
                fast(1_000, 1),
                || {
                    calls += 1;
                    if calls < 3 {
                        Ok(calls)
                    } else {
                        Err("gone")
                    }
                },
                |_| false,
            );
            assert_eq!(result.unwrap_err(), "gone");
        }

        #[test]
        fn test_yes_no_fallible() {
            let result: Result<bool, ()> =
                try_poll_until_yes_no(PollSpec::immediate(), || Ok(false), true);
            assert_eq!(result, Ok(false));
        }
    }
}
