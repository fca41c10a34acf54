//! Preference-driven adjustment of a baseline score.
//!
//! Users without stored preferences get their baseline back unchanged. Users
//! with preferences, even empty ones, get a personalisation pass.

#![forbid(unsafe_code)]

use log::debug;
use prodhealth_core::{Diet, Goal, HealthScore, NutritionRecord, Preferences};

use crate::{IngredientScan, PersonalizationWeights, WeightsError};

/// Applies allergen, diet and goal deductions to a baseline score.
///
/// # Examples
/// ```
/// use prodhealth_core::{HealthScore, NutritionRecord, Preferences};
/// use prodhealth_scorer::Personalizer;
///
/// let personalizer = Personalizer::default();
/// let record = NutritionRecord::default().with_ingredients("Roasted peanuts");
/// let base = HealthScore::new(80).expect("in range");
///
/// assert_eq!(personalizer.adjust(base, &record, None), base);
/// let prefs = Preferences::default().with_allergen("Peanuts");
/// assert_eq!(personalizer.adjust(base, &record, Some(&prefs)).value(), 55);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Personalizer {
    weights: PersonalizationWeights,
}

impl Personalizer {
    /// Build a personalizer with custom weights.
    ///
    /// # Errors
    /// Returns [`WeightsError`] when the weights fail validation.
    pub fn new(weights: PersonalizationWeights) -> Result<Self, WeightsError> {
        Ok(Self {
            weights: weights.validate()?,
        })
    }

    /// Return the weights in use.
    #[must_use]
    pub const fn weights(&self) -> &PersonalizationWeights {
        &self.weights
    }

    /// Adjust `baseline` for the user's preferences.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "deductions are subtracted from the baseline in floating point"
    )]
    pub fn adjust(
        &self,
        baseline: HealthScore,
        record: &NutritionRecord,
        preferences: Option<&Preferences>,
    ) -> HealthScore {
        let Some(prefs) = preferences else {
            return baseline;
        };
        let scan = IngredientScan::new(record, prefs);
        let deduction = self.diet_deduction(&scan, prefs) + self.goal_deduction(record, prefs);
        let score = HealthScore::from_raw(baseline.as_f64() - deduction);
        debug!(
            "personalised {baseline} to {score} ({} allergen hits)",
            scan.matched_allergens().len()
        );
        score
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "deductions accumulate as floating point points"
    )]
    fn diet_deduction(&self, scan: &IngredientScan, prefs: &Preferences) -> f64 {
        let mut total = self.weights.allergen_penalty(scan.matched_allergens().len());
        if prefs.follows(Diet::Vegetarian) && scan.contains_meat() {
            total += self.weights.vegetarian;
        }
        if prefs.follows(Diet::Vegan) && scan.contains_animal_products() {
            total += self.weights.vegan;
        }
        total
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "deductions accumulate as floating point points"
    )]
    fn goal_deduction(&self, record: &NutritionRecord, prefs: &Preferences) -> f64 {
        let n = &record.nutrients;
        let mut total = 0.0;
        if watches_sugar(prefs) {
            total += self.weights.sugar_goal.apply(n.sugars_or_zero());
        }
        if prefs.has_goal(Goal::HeartHealth) {
            total += self.weights.salt_goal.apply(n.salt_or_zero());
        }
        if prefs.has_goal(Goal::LowerCholesterol) {
            total += self.weights.saturated_fat_goal.apply(n.saturated_fat_or_zero());
        }
        total
    }
}

pub(crate) fn watches_sugar(prefs: &Preferences) -> bool {
    prefs.has_goal(Goal::WeightLoss) || prefs.has_goal(Goal::DiabetesManagement)
}

/// Adjust `baseline` with the default weights.
///
/// Returns `baseline` unchanged when `preferences` is `None`.
#[must_use]
pub fn personalize(
    baseline: HealthScore,
    record: &NutritionRecord,
    preferences: Option<&Preferences>,
) -> HealthScore {
    Personalizer::default().adjust(baseline, record, preferences)
}
