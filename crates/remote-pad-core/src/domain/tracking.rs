//! Delta tracking: converting absolute surface positions into relative motion.
//!
//! The capture surface reports *absolute* coordinates (where the finger or
//! pointer is right now).  The remote host needs *relative* motion (how far the
//! cursor should move).  [`DeltaTracker`] bridges the two.
//!
//! # How a gesture is tracked
//!
//! ```text
//! press (10,10)   -> begin_tracking   baseline = (10,10)
//! move  (15,12)   -> move_to          delta = (5,2) * s, baseline = (15,12)
//! move  (15,12)   -> move_to          delta = (0,0) * s
//! release         -> end_tracking     further moves yield nothing
//! ```
//!
//! Each delta is measured against the *previous observed* position rather
//! than the press origin, so every delta is locally accurate no matter how
//! densely samples arrive.  When the throttle drops intermediate samples the
//! next admitted delta simply covers a larger distance; no motion is lost.

/// An absolute coordinate in capture-surface space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A scaled relative displacement produced by [`DeltaTracker::move_to`].
///
/// Components are still fractional here; the wire encoder floors them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionEvent {
    pub dx: f64,
    pub dy: f64,
}

/// Tracking flag plus the baseline the next delta is measured from.
///
/// `active` is `true` between a press and the matching release or cancel.
/// While `active` is `false`, the `(x, y)` baseline is retained but ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackingState {
    pub active: bool,
    pub x: f64,
    pub y: f64,
}

/// State machine converting a stream of absolute positions into scaled deltas.
///
/// # Examples
///
/// ```rust
/// use remote_pad_core::{DeltaTracker, MotionEvent, Position};
///
/// let mut tracker = DeltaTracker::new();
/// assert_eq!(tracker.move_to(Position::new(5.0, 5.0), 1.0), None);
///
/// tracker.begin_tracking(Position::new(10.0, 10.0));
/// let delta = tracker.move_to(Position::new(15.0, 12.0), 2.0);
/// assert_eq!(delta, Some(MotionEvent { dx: 10.0, dy: 4.0 }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeltaTracker {
    state: TrackingState,
}

impl DeltaTracker {
    /// Creates an inactive tracker with a baseline at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a gesture at `pos`.
    ///
    /// Called on mouse-down or touch-start.  A press while already active
    /// simply re-anchors the baseline.
    pub fn begin_tracking(&mut self, pos: Position) {
        self.state = TrackingState {
            active: true,
            x: pos.x,
            y: pos.y,
        };
    }

    /// Feeds a new absolute sample and returns the scaled delta since the last one.
    ///
    /// Returns `None` when no gesture is active.  `sensitivity` is sampled on
    /// every call, so a sensitivity change mid-gesture only affects later deltas.
    pub fn move_to(&mut self, pos: Position, sensitivity: f64) -> Option<MotionEvent> {
        if !self.state.active {
            return None;
        }

        let delta = MotionEvent {
            dx: (pos.x - self.state.x) * sensitivity,
            dy: (pos.y - self.state.y) * sensitivity,
        };
        self.state.x = pos.x;
        self.state.y = pos.y;
        Some(delta)
    }

    /// Ends the current gesture.  The baseline is kept but no longer used.
    pub fn end_tracking(&mut self) {
        self.state.active = false;
    }

    /// Returns `true` while a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Returns a snapshot of the tracking state.
    pub fn state(&self) -> TrackingState {
        self.state
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
