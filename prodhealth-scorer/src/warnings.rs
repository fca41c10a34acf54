//! Human-readable warnings for a scan.
//!
//! Warnings are emitted in a fixed order: allergens, vegetarian, vegan,
//! sugar, salt, saturated fat. At most one warning is produced per check.

#![forbid(unsafe_code)]

use std::fmt;
use std::num::FpCategory;

use prodhealth_core::{
    Diet, Goal, NutritionRecord, Preferences, Severity, Warning, WarningCategory,
};

use crate::IngredientScan;
use crate::personalize::{Personalizer, watches_sugar};

impl Personalizer {
    /// Build the ordered warning list for a record.
    ///
    /// Nutrient warnings fire above the thresholds of the matching goal
    /// deductions. Returns an empty list when `preferences` is `None`.
    #[must_use]
    pub fn warnings(
        &self,
        record: &NutritionRecord,
        preferences: Option<&Preferences>,
    ) -> Vec<Warning> {
        let Some(prefs) = preferences else {
            return Vec::new();
        };
        let scan = IngredientScan::new(record, prefs);
        let mut out = Vec::new();

        let allergens = scan.matched_allergens();
        if !allergens.is_empty() {
            let plural = if allergens.len() > 1 { "s" } else { "" };
            out.push(Warning::new(
                WarningCategory::Allergen,
                Severity::Danger,
                format!("Contains your allergen{plural}: {}", allergens.join(", ")),
            ));
        }

        if prefs.follows(Diet::Vegetarian) && scan.contains_meat() {
            out.push(Warning::new(
                WarningCategory::Dietary,
                Severity::Warn,
                "Not vegetarian based on ingredients listed.",
            ));
        }
        if prefs.follows(Diet::Vegan) && (scan.contains_animal_products() || scan.contains_meat()) {
            out.push(Warning::new(
                WarningCategory::Dietary,
                Severity::Warn,
                "Not vegan based on ingredients listed.",
            ));
        }

        self.nutrient_warnings(record, prefs, &mut out);
        out
    }

    fn nutrient_warnings(&self, record: &NutritionRecord, prefs: &Preferences, out: &mut Vec<Warning>) {
        let n = &record.nutrients;
        let weights = self.weights();

        let sugars = n.sugars_or_zero();
        if watches_sugar(prefs) && sugars > weights.sugar_goal.threshold {
            out.push(Warning::new(
                WarningCategory::Sugar,
                Severity::Warn,
                format!(
                    "High sugar for your goals ({}g/100g). Consider lower-sugar options.",
                    JsNumber(sugars)
                ),
            ));
        }

        let salt = n.salt_or_zero();
        if prefs.has_goal(Goal::HeartHealth) && salt > weights.salt_goal.threshold {
            out.push(Warning::new(
                WarningCategory::Salt,
                Severity::Warn,
                format!(
                    "High salt for heart health ({}mg/100g).",
                    JsNumber(milligrams(salt))
                ),
            ));
        }

        let saturated_fat = n.saturated_fat_or_zero();
        if prefs.has_goal(Goal::LowerCholesterol)
            && saturated_fat > weights.saturated_fat_goal.threshold
        {
            out.push(Warning::new(
                WarningCategory::SaturatedFat,
                Severity::Warn,
                format!(
                    "High saturated fat ({}g/100g). Consider lower saturated fat choices.",
                    JsNumber(saturated_fat)
                ),
            ));
        }
    }
}

#[expect(clippy::float_arithmetic, reason = "grams to whole milligrams")]
fn milligrams(grams: f64) -> f64 {
    (grams * 1000.0).round()
}

/// Formats a number the way JavaScript's `String(number)` does.
///
/// Magnitudes at or above `1e21` or below `1e-6` use exponent notation with
/// an explicit sign (`1e+21`, `1.5e-7`); everything else uses the shortest
/// round-trip decimal. Zero of either sign prints as `0`.
struct JsNumber(f64);

impl fmt::Display for JsNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        match value.classify() {
            FpCategory::Nan => return f.write_str("NaN"),
            FpCategory::Infinite if value.is_sign_negative() => return f.write_str("-Infinity"),
            FpCategory::Infinite => return f.write_str("Infinity"),
            FpCategory::Zero => return f.write_str("0"),
            FpCategory::Normal | FpCategory::Subnormal => {}
        }
        let magnitude = value.abs();
        if !(1e-6..1e21).contains(&magnitude) {
            let exp = format!("{value:e}");
            return match exp.split_once('e') {
                Some((mantissa, power)) if !power.starts_with('-') => {
                    write!(f, "{mantissa}e+{power}")
                }
                _ => f.write_str(&exp),
            };
        }
        write!(f, "{value}")
    }
}

/// Build warnings with the default thresholds.
///
/// # Examples
/// ```
/// use prodhealth_core::{Goal, NutritionRecord, Preferences};
///
/// let record = NutritionRecord::default().with_salt(1.2);
/// let prefs = Preferences::default().with_goal(Goal::HeartHealth);
/// let warnings = prodhealth_scorer::warnings(&record, Some(&prefs));
/// assert_eq!(warnings[0].message, "High salt for heart health (1200mg/100g).");
/// assert!(prodhealth_scorer::warnings(&record, None).is_empty());
/// ```
#[must_use]
pub fn warnings(record: &NutritionRecord, preferences: Option<&Preferences>) -> Vec<Warning> {
    Personalizer::default().warnings(record, preferences)
}
