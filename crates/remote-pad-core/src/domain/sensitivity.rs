//! The sensitivity multiplier applied to every motion delta.
//!
//! The value lives on a 0.1 grid inside `[MIN, MAX]`.  Steps are rounded back
//! onto the grid after each adjustment, so ten increments from `1.0` land on
//! exactly `2.0` rather than `1.9999999999999998`.

use tracing::debug;

/// A bounded, stepped multiplier for pointer deltas.
///
/// # Examples
///
/// ```rust
/// use remote_pad_core::Sensitivity;
///
/// let mut s = Sensitivity::default();
/// assert_eq!(s.value(), 1.0);
/// s.increment();
/// assert_eq!(s.value(), 1.1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensitivity(f64);

impl Sensitivity {
    /// Lowest allowed value.
    pub const MIN: f64 = 0.0;
    /// Highest allowed value.
    pub const MAX: f64 = 10.0;
    /// Value used on first run or when the stored value is unreadable.
    pub const DEFAULT: f64 = 1.0;
    /// Amount added or removed by one adjustment.
    pub const STEP: f64 = 0.1;

    /// Creates a sensitivity, clamping `value` into range.
    ///
    /// Non-finite input falls back to [`Sensitivity::DEFAULT`].
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return Self(Self::DEFAULT);
        }
        Self(snap(value.clamp(Self::MIN, Self::MAX)))
    }

    /// Restores a sensitivity from its persisted string form.
    ///
    /// Missing or unparseable input yields the default; out-of-range input
    /// is clamped.
    pub fn from_stored(stored: Option<&str>) -> Self {
        match stored.map(|s| s.trim().parse::<f64>()) {
            Some(Ok(v)) => {
                let restored = Self::new(v);
                if restored.0 != v {
                    debug!("stored sensitivity {v} adjusted to {}", restored.0);
                }
                restored
            }
            Some(Err(e)) => {
                debug!("ignoring unreadable stored sensitivity: {e}");
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Returns the current multiplier.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Raises the value by one step, saturating at [`Sensitivity::MAX`].
    pub fn increment(&mut self) {
        *self = Self::new(self.0 + Self::STEP);
    }

    /// Lowers the value by one step, saturating at [`Sensitivity::MIN`].
    pub fn decrement(&mut self) {
        *self = Self::new(self.0 - Self::STEP);
    }

    /// Returns the persisted string form (one decimal place).
    pub fn to_stored(self) -> String {
        format!("{:.1}", self.0)
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Rounds onto the 0.1 grid.
fn snap(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one() {
        assert_eq!(Sensitivity::default().value(), 1.0);
    }

    #[test]
    fn test_increment_adds_one_step() {
        let mut s = Sensitivity::new(2.0);
        s.increment();
        assert_eq!(s.value(), 2.1);
    }

    #[test]
    fn test_decrement_removes_one_step() {
        let mut s = Sensitivity::new(2.0);
        s.decrement();
        assert_eq!(s.value(), 1.9);
    }

    #[test]
    fn test_ten_increments_land_exactly_on_grid() {
        let mut s = Sensitivity::default();
        for _ in 0..10 {
            s.increment();
        }
        assert_eq!(s.value(), 2.0);
    }

    #[test]
    fn test_increments_never_exceed_max() {
        // Start from several points, including an off-grid one
        for start in [0.0, 1.0, 9.95, 10.0] {
            let mut s = Sensitivity::new(start);
            for _ in 0..200 {
                s.increment();
                assert!(s.value() <= Sensitivity::MAX);
            }
            assert_eq!(s.value(), Sensitivity::MAX);
        }
    }

    #[test]
    fn test_decrements_never_go_below_min() {
        for start in [10.0, 1.0, 0.05, 0.0] {
            let mut s = Sensitivity::new(start);
            for _ in 0..200 {
                s.decrement();
                assert!(s.value() >= Sensitivity::MIN);
            }
            assert_eq!(s.value(), Sensitivity::MIN);
        }
    }

    #[test]
    fn test_new_clamps_out_of_range_values() {
        assert_eq!(Sensitivity::new(42.0).value(), 10.0);
        assert_eq!(Sensitivity::new(-3.0).value(), 0.0);
    }

    #[test]
    fn test_new_rejects_non_finite_values() {
        assert_eq!(Sensitivity::new(f64::NAN).value(), 1.0);
        assert_eq!(Sensitivity::new(f64::INFINITY).value(), 1.0);
    }

    #[test]
    fn test_from_stored_parses_valid_value() {
        assert_eq!(Sensitivity::from_stored(Some("2.5")).value(), 2.5);
        assert_eq!(Sensitivity::from_stored(Some(" 0.3 ")).value(), 0.3);
    }

    #[test]
    fn test_from_stored_missing_or_garbage_uses_default() {
        assert_eq!(Sensitivity::from_stored(None).value(), 1.0);
        assert_eq!(Sensitivity::from_stored(Some("fast")).value(), 1.0);
        assert_eq!(Sensitivity::from_stored(Some("")).value(), 1.0);
    }

    #[test]
    fn test_from_stored_clamps_out_of_range() {
        assert_eq!(Sensitivity::from_stored(Some("99")).value(), 10.0);
        assert_eq!(Sensitivity::from_stored(Some("-1")).value(), 0.0);
    }

    #[test]
    fn test_to_stored_uses_one_decimal() {
        let mut s = Sensitivity::default();
        s.increment();
        assert_eq!(s.to_stored(), "1.1");
        assert_eq!(Sensitivity::from_stored(Some(&s.to_stored())), s);
    }
}
