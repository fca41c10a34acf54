//! One-call scoring of a record for a user.

#![forbid(unsafe_code)]

use prodhealth_core::{HealthScore, NutritionRecord, Preferences, Warning};
use serde::{Deserialize, Serialize};

use crate::{BaselineScorer, Personalizer};

/// Outcome of scoring one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// Score from nutrition data alone.
    pub baseline: HealthScore,
    /// Final score; equals `baseline` when no preferences were supplied.
    pub score: HealthScore,
    /// Ordered warnings; empty when no preferences were supplied.
    pub warnings: Vec<Warning>,
    /// Whether a personalisation pass ran.
    pub personalised: bool,
}

/// Baseline scorer and personalizer bundled for repeated use.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Analyser {
    baseline: BaselineScorer,
    personalizer: Personalizer,
}

impl Analyser {
    /// Combine a baseline scorer with a personalizer.
    #[must_use]
    pub const fn new(baseline: BaselineScorer, personalizer: Personalizer) -> Self {
        Self {
            baseline,
            personalizer,
        }
    }

    /// Score, personalise and warn.
    #[must_use]
    pub fn analyse(&self, record: &NutritionRecord, preferences: Option<&Preferences>) -> Analysis {
        let baseline = self.baseline.score(record);
        Analysis {
            baseline,
            score: self.personalizer.adjust(baseline, record, preferences),
            warnings: self.personalizer.warnings(record, preferences),
            personalised: preferences.is_some(),
        }
    }
}

/// Analyse a record with the default weights.
///
/// # Examples
/// ```
/// use prodhealth_core::{Diet, NutritionRecord, Preferences};
/// use prodhealth_scorer::analyse;
///
/// let record = NutritionRecord::default().with_ingredients("Chicken, rice");
/// let prefs = Preferences::default().with_diet(Diet::Vegetarian);
/// let analysis = analyse(&record, Some(&prefs));
/// assert_eq!(analysis.baseline.value(), 100);
/// assert_eq!(analysis.score.value(), 85);
/// assert_eq!(analysis.warnings.len(), 1);
/// ```
#[must_use]
pub fn analyse(record: &NutritionRecord, preferences: Option<&Preferences>) -> Analysis {
    Analyser::default().analyse(record, preferences)
}
