//! User preferences: health goals, diet types and allergens.
//!
//! Each list is free-form. The UI offers the well-known values below, and
//! users may add their own strings. Matching against well-known goals and
//! diets is exact, so `"weight loss"` is a custom goal distinct from
//! [`Goal::WeightLoss`].
//!
//! Whether a user has preferences at all is modelled by the caller as
//! `Option<Preferences>`; `Preferences::default()` means "I have none", which
//! still runs a personalisation pass.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Allergens offered by default in the preferences UI.
pub const COMMON_ALLERGENS: [&str; 8] = [
    "Peanuts", "Tree nuts", "Milk", "Eggs", "Wheat", "Soy", "Fish", "Sesame",
];

/// Well-known health goals.
///
/// # Examples
/// ```
/// use prodhealth_core::Goal;
///
/// assert_eq!(Goal::HeartHealth.as_str(), "Heart Health");
/// assert_eq!("diabetes management".parse::<Goal>(), Ok(Goal::DiabetesManagement));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Goal {
    /// Reduce body weight.
    WeightLoss,
    /// Increase body weight.
    WeightGain,
    /// Cardiovascular health.
    HeartHealth,
    /// Blood sugar control.
    DiabetesManagement,
    /// Reduce LDL cholesterol.
    LowerCholesterol,
    /// More energy through the day.
    EnergyBoost,
}

impl Goal {
    /// Every well-known goal in UI order.
    pub const ALL: [Self; 6] = [
        Self::WeightLoss,
        Self::WeightGain,
        Self::HeartHealth,
        Self::DiabetesManagement,
        Self::LowerCholesterol,
        Self::EnergyBoost,
    ];

    /// Label stored in preference lists.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WeightLoss => "Weight Loss",
            Self::WeightGain => "Weight Gain",
            Self::HeartHealth => "Heart Health",
            Self::DiabetesManagement => "Diabetes Management",
            Self::LowerCholesterol => "Lower Cholesterol",
            Self::EnergyBoost => "Energy Boost",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|goal| goal.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown goal '{s}'"))
    }
}

/// Well-known diet types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diet {
    /// No meat or fish.
    Vegetarian,
    /// No animal products.
    Vegan,
    /// No gluten.
    GlutenFree,
    /// No dairy.
    DairyFree,
    /// Low carbohydrate.
    Keto,
    /// Paleolithic.
    Paleo,
}

impl Diet {
    /// Every well-known diet in UI order.
    pub const ALL: [Self; 6] = [
        Self::Vegetarian,
        Self::Vegan,
        Self::GlutenFree,
        Self::DairyFree,
        Self::Keto,
        Self::Paleo,
    ];

    /// Label stored in preference lists.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vegetarian => "Vegetarian",
            Self::Vegan => "Vegan",
            Self::GlutenFree => "Gluten-Free",
            Self::DairyFree => "Dairy-Free",
            Self::Keto => "Keto",
            Self::Paleo => "Paleo",
        }
    }
}

impl fmt::Display for Diet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Diet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|diet| diet.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown diet '{s}'"))
    }
}

/// Insertion-ordered list of unique, non-blank preference values.
///
/// Values are trimmed on insert. Duplicates and blank strings are ignored,
/// mirroring how the preferences UI adds custom entries.
///
/// # Examples
/// ```
/// use prodhealth_core::PreferenceList;
///
/// let mut list = PreferenceList::new();
/// assert!(list.insert(" Peanuts "));
/// assert!(!list.insert("Peanuts"));
/// assert!(!list.insert("   "));
/// assert_eq!(list.iter().collect::<Vec<_>>(), vec!["Peanuts"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "Vec<String>", into = "Vec<String>")
)]
pub struct PreferenceList {
    values: Vec<String>,
}

impl PreferenceList {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Add a value, returning `true` when the list changed.
    pub fn insert(&mut self, value: impl AsRef<str>) -> bool {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() || self.contains(trimmed) {
            return false;
        }
        self.values.push(trimmed.to_owned());
        true
    }

    /// Remove a value, returning `true` when it was present.
    pub fn remove(&mut self, value: &str) -> bool {
        let before = self.values.len();
        self.values.retain(|existing| existing != value);
        self.values.len() != before
    }

    /// Report whether `value` is present (exact match).
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|existing| existing == value)
    }

    /// Iterate over values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Report whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for PreferenceList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        for value in iter {
            list.insert(value);
        }
        list
    }
}

impl From<Vec<String>> for PreferenceList {
    fn from(values: Vec<String>) -> Self {
        values.into_iter().collect()
    }
}

impl From<PreferenceList> for Vec<String> {
    fn from(list: PreferenceList) -> Self {
        list.values
    }
}

/// A user's stored goals, diet types and allergens.
///
/// # Examples
/// ```
/// use prodhealth_core::{Diet, Goal, Preferences};
///
/// let prefs = Preferences::default()
///     .with_goal(Goal::HeartHealth)
///     .with_diet(Diet::Vegan)
///     .with_allergen("Peanuts");
/// assert!(prefs.has_goal(Goal::HeartHealth));
/// assert!(prefs.follows(Diet::Vegan));
/// assert!(!prefs.follows(Diet::Vegetarian));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Preferences {
    /// Health goals.
    pub goals: PreferenceList,
    /// Diet types.
    pub dietary: PreferenceList,
    /// Allergens to avoid.
    pub allergens: PreferenceList,
}

impl Preferences {
    /// Report whether a well-known goal is selected.
    #[must_use]
    pub fn has_goal(&self, goal: Goal) -> bool {
        self.goals.contains(goal.as_str())
    }

    /// Report whether a well-known diet is selected.
    #[must_use]
    pub fn follows(&self, diet: Diet) -> bool {
        self.dietary.contains(diet.as_str())
    }

    /// Report whether all three lists are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty() && self.dietary.is_empty() && self.allergens.is_empty()
    }

    /// Add a goal, well-known or custom.
    #[must_use]
    pub fn with_goal(mut self, goal: impl fmt::Display) -> Self {
        self.goals.insert(goal.to_string());
        self
    }

    /// Add a diet type, well-known or custom.
    #[must_use]
    pub fn with_diet(mut self, diet: impl fmt::Display) -> Self {
        self.dietary.insert(diet.to_string());
        self
    }

    /// Add an allergen.
    #[must_use]
    pub fn with_allergen(mut self, allergen: impl fmt::Display) -> Self {
        self.allergens.insert(allergen.to_string());
        self
    }
}
