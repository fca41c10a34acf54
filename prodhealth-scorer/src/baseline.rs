//! Baseline health score computed from nutrition data alone.

#![forbid(unsafe_code)]

use log::debug;
use prodhealth_core::{HealthScore, NutritionGrade, NutritionRecord};

use crate::{BaselineWeights, WeightsError};

/// Scores a product from its nutrition record.
///
/// Scoring starts at 100, applies every adjustment independently, then
/// clamps and rounds once.
///
/// # Examples
/// ```
/// use prodhealth_core::{NutritionGrade, NutritionRecord};
/// use prodhealth_scorer::BaselineScorer;
///
/// let scorer = BaselineScorer::default();
/// let record = NutritionRecord::default()
///     .with_grade(NutritionGrade::E)
///     .with_nova_group(4);
/// assert_eq!(scorer.score(&record).value(), 50);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BaselineScorer {
    weights: BaselineWeights,
}

impl BaselineScorer {
    /// Build a scorer with custom weights.
    ///
    /// # Errors
    /// Returns [`WeightsError`] when the weights fail validation.
    pub fn new(weights: BaselineWeights) -> Result<Self, WeightsError> {
        Ok(Self {
            weights: weights.validate()?,
        })
    }

    /// Return the weights in use.
    #[must_use]
    pub const fn weights(&self) -> &BaselineWeights {
        &self.weights
    }

    /// Score a record.
    #[must_use]
    pub fn score(&self, record: &NutritionRecord) -> HealthScore {
        let raw = self.raw_score(record);
        let score = HealthScore::from_raw(raw);
        debug!("baseline raw score {raw} rounded to {score}");
        score
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "baseline scoring sums weighted nutrient adjustments"
    )]
    fn raw_score(&self, record: &NutritionRecord) -> f64 {
        let w = &self.weights;
        let n = &record.nutrients;
        HealthScore::MAX.as_f64()
            - self.nova_penalty(record.nova_group)
            - self.grade_penalty(record.nutrition_grade)
            - w.sugars.apply(n.sugars_or_zero())
            - w.saturated_fat.apply(n.saturated_fat_or_zero())
            - w.salt.apply(n.salt_or_zero())
            + w.fiber.apply(n.fiber_or_zero())
            + w.protein.apply(n.protein_or_zero())
            - w.additives.apply(f64::from(record.additives_or_zero()))
    }

    const fn nova_penalty(&self, group: Option<u8>) -> f64 {
        match group {
            Some(g) if g >= 4 => self.weights.nova_ultra_processed,
            Some(3) => self.weights.nova_processed,
            _ => 0.0,
        }
    }

    const fn grade_penalty(&self, grade: Option<NutritionGrade>) -> f64 {
        match grade {
            Some(NutritionGrade::B) => self.weights.grade_b,
            Some(NutritionGrade::C) => self.weights.grade_c,
            Some(NutritionGrade::D) => self.weights.grade_d,
            Some(NutritionGrade::E) => self.weights.grade_e,
            Some(NutritionGrade::A) | None => 0.0,
        }
    }
}

/// Score a record with the default weights.
///
/// # Examples
/// ```
/// use prodhealth_core::NutritionRecord;
///
/// assert_eq!(prodhealth_scorer::score(&NutritionRecord::default()).value(), 100);
/// ```
#[must_use]
pub fn score(record: &NutritionRecord) -> HealthScore {
    BaselineScorer::default().score(record)
}
