//! The 0–100 health score.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer health score in `0..=100`.
///
/// Raw scores are accumulated as `f64` and converted once via
/// [`HealthScore::from_raw`], which clamps before rounding.
///
/// # Examples
/// ```
/// use prodhealth_core::HealthScore;
///
/// assert_eq!(HealthScore::from_raw(87.5).value(), 88);
/// assert_eq!(HealthScore::from_raw(-12.0).value(), 0);
/// assert_eq!(HealthScore::from_raw(140.0), HealthScore::MAX);
/// assert!(HealthScore::new(101).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct HealthScore(u8);

impl HealthScore {
    /// Lowest possible score.
    pub const MIN: Self = Self(0);
    /// Highest possible score; also the starting point for baseline scoring.
    pub const MAX: Self = Self(100);

    /// Wrap an integer score, rejecting values above 100.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Clamp a raw score into `0.0..=100.0` and round to the nearest integer.
    ///
    /// Halves round away from zero. Non-finite input yields [`HealthScore::MIN`].
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is clamped into 0..=100 before the cast"
    )]
    pub fn from_raw(raw: f64) -> Self {
        if !raw.is_finite() {
            return Self::MIN;
        }
        let clamped = raw.clamp(0.0, 100.0).round();
        Self(clamped as u8)
    }

    /// Return the score as an integer.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Return the score as `f64` for further adjustment.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl Default for HealthScore {
    fn default() -> Self {
        Self::MAX
    }
}

impl fmt::Display for HealthScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for HealthScore {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("health score {value} is above 100"))
    }
}

impl From<HealthScore> for u8 {
    fn from(score: HealthScore) -> Self {
        score.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(f64::NAN, 0)]
    #[case(f64::INFINITY, 0)]
    #[case(f64::NEG_INFINITY, 0)]
    #[case(-0.4, 0)]
    #[case(0.5, 1)]
    #[case(49.49, 49)]
    #[case(99.5, 100)]
    #[case(250.0, 100)]
    fn from_raw_clamps_then_rounds(#[case] raw: f64, #[case] expected: u8) {
        assert_eq!(HealthScore::from_raw(raw).value(), expected);
    }

    #[test]
    fn new_accepts_boundaries() {
        assert_eq!(HealthScore::new(0), Some(HealthScore::MIN));
        assert_eq!(HealthScore::new(100), Some(HealthScore::MAX));
        assert_eq!(HealthScore::new(101), None);
    }
}
