//! Health scoring rules for packaged food.
//!
//! The crate turns a [`NutritionRecord`](prodhealth_core::NutritionRecord)
//! into three results:
//! - **Baseline score**: [`score`] starts at 100 and applies NOVA, Nutri-Score,
//!   nutrient and additive adjustments before clamping into `0..=100`.
//! - **Personalised score**: [`personalize`] deducts points for matched
//!   allergens, diet conflicts and goal-relevant nutrients. Without stored
//!   preferences the baseline is returned unchanged.
//! - **Warnings**: [`warnings`] lists the same concerns as messages, in a
//!   fixed order.
//!
//! All functions are pure and never fail. Constants live in
//! [`BaselineWeights`] and [`PersonalizationWeights`]; the free functions use
//! their defaults.
//!
//! # Examples
//!
//! ```
//! use prodhealth_core::{Goal, NutritionGrade, NutritionRecord, Preferences};
//! use prodhealth_scorer::{personalize, score, warnings};
//!
//! let record = NutritionRecord::default()
//!     .with_grade(NutritionGrade::D)
//!     .with_sugars(15.0);
//! let base = score(&record);
//! assert_eq!(base.value(), 73);
//!
//! let prefs = Preferences::default().with_goal(Goal::WeightLoss);
//! assert_eq!(personalize(base, &record, Some(&prefs)).value(), 58);
//! assert_eq!(warnings(&record, Some(&prefs)).len(), 1);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod analysis;
mod baseline;
mod error;
mod ingredients;
mod personalize;
mod types;
mod warnings;

pub use analysis::{Analyser, Analysis, analyse};
pub use baseline::{BaselineScorer, score};
pub use error::WeightsError;
pub use ingredients::{ANIMAL_PRODUCT_TERMS, IngredientScan, MEAT_TERMS};
pub use personalize::{Personalizer, personalize};
pub use types::{BaselineWeights, PersonalizationWeights, Ramp};
pub use warnings::warnings;

#[cfg(test)]
mod tests;
