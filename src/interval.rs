//! Interval algebra over the extended reals (§4.1).

use std::fmt;
use std::hash::{Hash, Hasher};

use ordered_float::OrderedFloat;

use crate::error::TfaError;

/// A half/fully open interval `(lo, hi, lo_closed, hi_closed)` over `ℝ ∪ {+∞}`.
///
/// `+∞` is only a valid `hi` when `hi_closed` is `false`. Neither endpoint may
/// be `NaN`. A degenerate interval has `lo == hi` and both ends closed.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    lo: f64,
    hi: f64,
    lo_closed: bool,
    hi_closed: bool,
}

impl Interval {
    /// Builds a new interval, validating the ordering and finiteness rules.
    ///
    /// # Errors
    ///
    /// Returns [`TfaError::InvalidInterval`] if `lo > hi`, if either endpoint
    /// is `NaN`, or if `hi` is infinite while `hi_closed` is `true`.
    pub fn new(lo: f64, hi: f64, lo_closed: bool, hi_closed: bool) -> Result<Self, TfaError> {
        let invalid = || TfaError::InvalidInterval {
            lo,
            hi,
            lo_closed,
            hi_closed,
        };
        if lo.is_nan() || hi.is_nan() {
            return Err(invalid());
        }
        if lo.is_infinite() {
            return Err(invalid());
        }
        if hi.is_infinite() && hi_closed {
            return Err(invalid());
        }
        if lo > hi {
            return Err(invalid());
        }
        Ok(Self {
            lo,
            hi,
            lo_closed,
            hi_closed,
        })
    }

    /// Builds the degenerate interval `[value, value]`.
    pub fn degenerate(value: f64) -> Result<Self, TfaError> {
        Self::new(value, value, true, true)
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn lo_closed(&self) -> bool {
        self.lo_closed
    }

    pub fn hi_closed(&self) -> bool {
        self.hi_closed
    }

    /// Whether `lo == hi` and both endpoints are closed.
    pub fn is_degenerate(&self) -> bool {
        self.lo == self.hi && self.lo_closed && self.hi_closed
    }

    /// Membership test per §3: `(c > lo ∨ (lo_closed ∧ c = lo)) ∧ (c < hi ∨ (hi_closed ∧ c = hi))`.
    pub fn contains(&self, c: f64) -> bool {
        let lower_ok = if self.lo_closed { c >= self.lo } else { c > self.lo };
        let upper_ok = if self.hi_closed { c <= self.hi } else { c < self.hi };
        lower_ok && upper_ok
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        OrderedFloat(self.lo) == OrderedFloat(other.lo)
            && OrderedFloat(self.hi) == OrderedFloat(other.hi)
            && self.lo_closed == other.lo_closed
            && self.hi_closed == other.hi_closed
    }
}
impl Eq for Interval {}

impl Hash for Interval {
    fn hash<H: Hasher>(&self, state: &mut H) {
        OrderedFloat(self.lo).hash(state);
        OrderedFloat(self.hi).hash(state);
        self.lo_closed.hash(state);
        self.hi_closed.hash(state);
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let left = if self.lo_closed { '[' } else { '(' };
        let right = if self.hi_closed { ']' } else { ')' };
        if self.hi.is_infinite() {
            write!(f, "{}{}, +inf{}", left, self.lo, right)
        } else {
            write!(f, "{}{}, {}{}", left, self.lo, self.hi, right)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_backwards_interval() {
        assert!(Interval::new(3.0, 1.0, true, true).is_err());
    }

    #[test]
    fn rejects_nan() {
        assert!(Interval::new(f64::NAN, 1.0, true, true).is_err());
    }

    #[test]
    fn rejects_closed_infinite_upper_bound() {
        assert!(Interval::new(0.0, f64::INFINITY, true, true).is_err());
    }

    #[test]
    fn accepts_open_infinite_upper_bound() {
        assert!(Interval::new(0.0, f64::INFINITY, true, false).is_ok());
    }

    #[test]
    fn closed_bounds_are_inclusive() {
        let i = Interval::new(1.0, 3.0, true, true).unwrap();
        assert!(i.contains(1.0));
        assert!(i.contains(3.0));
        assert!(i.contains(2.0));
        assert!(!i.contains(0.9));
    }

    #[test]
    fn open_bounds_are_exclusive() {
        let i = Interval::new(1.0, 3.0, false, false).unwrap();
        assert!(!i.contains(1.0));
        assert!(!i.contains(3.0));
        assert!(i.contains(2.0));
    }

    #[test]
    fn degenerate_detection() {
        let i = Interval::degenerate(2.0).unwrap();
        assert!(i.is_degenerate());
        let j = Interval::new(2.0, 3.0, true, true).unwrap();
        assert!(!j.is_degenerate());
    }

    #[test]
    fn display_formats_brackets() {
        let i = Interval::new(1.0, 3.0, true, false).unwrap();
        assert_eq!(i.to_string(), "[1, 3)");
        let j = Interval::new(5.0, f64::INFINITY, false, false).unwrap();
        assert_eq!(j.to_string(), "(5, +inf)");
    }
}
