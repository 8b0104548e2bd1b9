//! Leaky admission gate for high-frequency events.
//!
//! A throttle bounds how often a handler runs.  Calls that arrive within the
//! interval after the last *executed* call are dropped outright: their payload
//! is discarded, never queued or merged.  The first call always runs
//! immediately, so a new burst of movement is felt without delay.
//!
//! This is not a debouncer.  Nothing is ever deferred or scheduled; the gate
//! only compares the call timestamp with the timestamp of the last execution.
//!
//! ```text
//! interval = 20ms
//! calls:     0    5    12   20   31   39   45
//! executed:  0              20             45
//! ```

use std::time::{Duration, Instant};

/// Default interval applied to move events (at most 50 per second).
pub const DEFAULT_MOVE_INTERVAL: Duration = Duration::from_millis(20);

/// Timestamp-comparison gate deciding whether a call may execute.
#[derive(Debug, Clone)]
pub struct ThrottleGate {
    interval: Duration,
    last_executed: Option<Instant>,
}

impl ThrottleGate {
    /// Creates a gate that admits at most one call per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_executed: None,
        }
    }

    /// Returns `true` and records `now` if a call at `now` may execute.
    ///
    /// A `now` earlier than the last execution (clock skew from the caller)
    /// counts as zero elapsed time and is dropped.
    pub fn admit(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_executed {
            if now.saturating_duration_since(last) < self.interval {
                return false;
            }
        }
        self.last_executed = Some(now);
        true
    }

    /// Returns the configured interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// A handler wrapped by a [`ThrottleGate`].
///
/// # Examples
///
/// ```rust
/// use std::time::{Duration, Instant};
/// use remote_pad_core::Throttled;
///
/// let mut double = Throttled::new(Duration::from_millis(20), |n: i32| n * 2);
/// let t0 = Instant::now();
/// assert_eq!(double.call_at(t0, 1), Some(2));
/// assert_eq!(double.call_at(t0 + Duration::from_millis(5), 2), None);
/// assert_eq!(double.call_at(t0 + Duration::from_millis(20), 3), Some(6));
/// ```
pub struct Throttled<F> {
    gate: ThrottleGate,
    handler: F,
}

impl<F> Throttled<F> {
    /// Wraps `handler` so it executes at most once per `interval`.
    pub fn new(interval: Duration, handler: F) -> Self {
        Self {
            gate: ThrottleGate::new(interval),
            handler,
        }
    }

    /// Invokes the handler with `arg` if the gate admits a call at `now`.
    ///
    /// Returns the handler's result, or `None` when the call was dropped.
    pub fn call_at<A, R>(&mut self, now: Instant, arg: A) -> Option<R>
    where
        F: FnMut(A) -> R,
    {
        if self.gate.admit(now) {
            Some((self.handler)(arg))
        } else {
            None
        }
    }

    /// Invokes the handler with `arg` using the current time.
    pub fn call<A, R>(&mut self, arg: A) -> Option<R>
    where
        F: FnMut(A) -> R,
    {
        self.call_at(Instant::now(), arg)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
