//! Tunable constants for baseline scoring and personalisation.
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::WeightsError;

/// A capped linear adjustment applied above a threshold.
///
/// The magnitude is `min(cap, max(0, value - threshold) * rate)`. Scorers
/// decide whether it is added or subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    /// Value at or below which the adjustment is zero.
    pub threshold: f64,
    /// Points per unit above the threshold.
    pub rate: f64,
    /// Largest possible adjustment.
    pub cap: f64,
}

impl Ramp {
    /// Build a ramp.
    #[must_use]
    pub const fn new(threshold: f64, rate: f64, cap: f64) -> Self {
        Self {
            threshold,
            rate,
            cap,
        }
    }

    /// Magnitude of the adjustment for `value`.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "ramps are linear in the nutrient")]
    pub fn apply(self, value: f64) -> f64 {
        ((value - self.threshold).max(0.0) * self.rate).min(self.cap)
    }

    fn validate(self, field: &'static str) -> Result<(), WeightsError> {
        check(field, self.threshold)?;
        check(field, self.rate)?;
        check(field, self.cap)
    }
}

fn check(field: &'static str, value: f64) -> Result<(), WeightsError> {
    if !value.is_finite() {
        return Err(WeightsError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(WeightsError::Negative { field });
    }
    Ok(())
}

/// Deductions and bonuses applied by the baseline scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineWeights {
    /// Deduction for NOVA group 4 and above.
    pub nova_ultra_processed: f64,
    /// Deduction for NOVA group 3.
    pub nova_processed: f64,
    /// Deduction for grade B.
    pub grade_b: f64,
    /// Deduction for grade C.
    pub grade_c: f64,
    /// Deduction for grade D.
    pub grade_d: f64,
    /// Deduction for grade E.
    pub grade_e: f64,
    /// Sugar deduction in g/100 g.
    pub sugars: Ramp,
    /// Saturated fat deduction in g/100 g.
    pub saturated_fat: Ramp,
    /// Salt deduction in g/100 g.
    pub salt: Ramp,
    /// Fiber bonus in g/100 g.
    pub fiber: Ramp,
    /// Protein bonus in g/100 g.
    pub protein: Ramp,
    /// Deduction per additive.
    pub additives: Ramp,
}

impl BaselineWeights {
    /// Validate the weights and return a copy.
    ///
    /// # Errors
    /// Returns [`WeightsError`] when any constant is negative or not finite.
    pub fn validate(self) -> Result<Self, WeightsError> {
        check("nova_ultra_processed", self.nova_ultra_processed)?;
        check("nova_processed", self.nova_processed)?;
        check("grade_b", self.grade_b)?;
        check("grade_c", self.grade_c)?;
        check("grade_d", self.grade_d)?;
        check("grade_e", self.grade_e)?;
        self.sugars.validate("sugars")?;
        self.saturated_fat.validate("saturated_fat")?;
        self.salt.validate("salt")?;
        self.fiber.validate("fiber")?;
        self.protein.validate("protein")?;
        self.additives.validate("additives")?;
        Ok(self)
    }
}

impl Default for BaselineWeights {
    fn default() -> Self {
        Self {
            nova_ultra_processed: 25.0,
            nova_processed: 12.0,
            grade_b: 2.0,
            grade_c: 7.0,
            grade_d: 15.0,
            grade_e: 25.0,
            sugars: Ramp::new(5.0, 1.2, 30.0),
            saturated_fat: Ramp::new(2.0, 1.5, 20.0),
            salt: Ramp::new(0.3, 25.0, 15.0),
            fiber: Ramp::new(0.0, 1.2, 10.0),
            protein: Ramp::new(0.0, 0.4, 8.0),
            additives: Ramp::new(0.0, 3.0, 15.0),
        }
    }
}

/// Deductions applied when a user has stored preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalizationWeights {
    /// Flat deduction when any allergen matches.
    pub allergen_base: f64,
    /// Extra deduction per matched allergen.
    pub allergen_per_hit: f64,
    /// Largest total allergen deduction.
    pub allergen_cap: f64,
    /// Deduction when a vegetarian product contains meat terms.
    pub vegetarian: f64,
    /// Deduction when a vegan product contains animal-product terms.
    pub vegan: f64,
    /// Sugar deduction for weight loss and diabetes goals.
    pub sugar_goal: Ramp,
    /// Salt deduction for the heart health goal.
    pub salt_goal: Ramp,
    /// Saturated fat deduction for the cholesterol goal.
    pub saturated_fat_goal: Ramp,
}

impl PersonalizationWeights {
    /// Validate the weights and return a copy.
    ///
    /// # Errors
    /// Returns [`WeightsError`] when any constant is negative or not finite.
    pub fn validate(self) -> Result<Self, WeightsError> {
        check("allergen_base", self.allergen_base)?;
        check("allergen_per_hit", self.allergen_per_hit)?;
        check("allergen_cap", self.allergen_cap)?;
        check("vegetarian", self.vegetarian)?;
        check("vegan", self.vegan)?;
        self.sugar_goal.validate("sugar_goal")?;
        self.salt_goal.validate("salt_goal")?;
        self.saturated_fat_goal.validate("saturated_fat_goal")?;
        Ok(self)
    }

    /// Deduction for `hits` matched allergens; zero when nothing matched.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "allergen deduction grows linearly with hits"
    )]
    pub fn allergen_penalty(&self, hits: usize) -> f64 {
        if hits == 0 {
            return 0.0;
        }
        let count = f64::from(u32::try_from(hits).unwrap_or(u32::MAX));
        (self.allergen_base + self.allergen_per_hit * count).min(self.allergen_cap)
    }
}

impl Default for PersonalizationWeights {
    fn default() -> Self {
        Self {
            allergen_base: 20.0,
            allergen_per_hit: 5.0,
            allergen_cap: 40.0,
            vegetarian: 15.0,
            vegan: 20.0,
            sugar_goal: Ramp::new(5.0, 1.5, 15.0),
            salt_goal: Ramp::new(0.3, 30.0, 15.0),
            saturated_fat_goal: Ramp::new(2.0, 1.8, 15.0),
        }
    }
}
