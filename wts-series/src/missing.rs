use serde::{Deserialize, Serialize};

/// Tolerance applied around a single missing sentinel value.
pub const MISSING_TOLERANCE: f64 = 0.001;

/// The set of values treated as "missing". NaN is always missing; in
/// addition, any value inside `[lower, upper]` is missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissingDomain {
    value: f64,
    lower: f64,
    upper: f64,
}

impl Default for MissingDomain {
    fn default() -> Self {
        MissingDomain::nan()
    }
}

impl MissingDomain {
    /// Only NaN is missing.
    pub fn nan() -> Self {
        MissingDomain {
            value: f64::NAN,
            lower: f64::NAN,
            upper: f64::NAN,
        }
    }

    /// A sentinel such as -999; values within `MISSING_TOLERANCE` of it are
    /// also missing.
    pub fn single(value: f64) -> Self {
        if value.is_nan() {
            return MissingDomain::nan();
        }
        MissingDomain {
            value,
            lower: value - MISSING_TOLERANCE,
            upper: value + MISSING_TOLERANCE,
        }
    }

    /// An inclusive range; the lower bound is the value written for missing.
    pub fn range(lower: f64, upper: f64) -> Self {
        let (lower, upper) = if lower <= upper {
            (lower, upper)
        } else {
            (upper, lower)
        };
        MissingDomain {
            value: lower,
            lower,
            upper,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_nan() || (value >= self.lower && value <= self.upper)
    }

    /// The value stored in cells that hold no data.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}
