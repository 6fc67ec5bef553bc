//! Sensitivity → rounding precision
//!
//! Sensitivity maps 1:1 to decimal places of latitude/longitude. Each level
//! also carries the approximate real-world edge of one rounding cell.

use std::fmt;

use crate::error::MergeError;

/// Highest accepted sensitivity level
pub const MAX_SENSITIVITY: u8 = 8;

/// Default sensitivity (~1.11 km cells)
pub const DEFAULT_SENSITIVITY: u8 = 2;

/// Cell edge per level, `(value, unit)`
const THRESHOLDS: [(&str, &str); MAX_SENSITIVITY as usize + 1] = [
    ("111", "km"),
    ("11.1", "km"),
    ("1.11", "km"),
    ("111", "m"),
    ("11.1", "m"),
    ("1.11", "m"),
    ("0.111", "m"),
    ("1.11", "cm"),
    ("1.11", "mm"),
];

/// Validated merge sensitivity in `[0, MAX_SENSITIVITY]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sensitivity(u8);

impl Sensitivity {
    /// # Errors
    /// `InvalidSensitivity` outside `[0, MAX_SENSITIVITY]`
    pub fn new(value: i64) -> Result<Self, MergeError> {
        u8::try_from(value)
            .ok()
            .filter(|level| *level <= MAX_SENSITIVITY)
            .map(Self)
            .ok_or(MergeError::InvalidSensitivity { value })
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    pub fn precision(&self) -> Precision {
        Precision {
            decimal_places: self.0,
        }
    }

    /// Approximate distance below which two detections merge
    pub fn distance_threshold(&self) -> DistanceThreshold {
        let (value, unit) = THRESHOLDS[usize::from(self.0)];
        DistanceThreshold { value, unit }
    }

    /// Every valid level, coarsest first
    pub fn all() -> impl Iterator<Item = Sensitivity> {
        (0..=MAX_SENSITIVITY).map(Self)
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self(DEFAULT_SENSITIVITY)
    }
}

impl TryFrom<i64> for Sensitivity {
    type Error = MergeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decimal places used for cluster keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Precision {
    pub decimal_places: u8,
}

impl Precision {
    /// `value` in units of `10^-decimal_places`, rounded half away from zero
    pub fn round_units(&self, value: f64) -> i64 {
        let scaled = value * 10f64.powi(i32::from(self.decimal_places));
        // |lon| ≤ 180 at 8 places stays far inside i64
        scaled.round() as i64
    }
}

/// Human-readable cell edge, e.g. `1.11 km`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceThreshold {
    pub value: &'static str,
    pub unit: &'static str,
}

impl fmt::Display for DistanceThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// Resolve a raw sensitivity to its precision
///
/// # Errors
/// `InvalidSensitivity` outside `[0, MAX_SENSITIVITY]`
pub fn resolve_precision(sensitivity: i64) -> Result<Precision, MergeError> {
    Sensitivity::new(sensitivity).map(|s| s.precision())
}
