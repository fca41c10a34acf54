//! Nutrition records as supplied by a product catalog.
//!
//! Every field is optional because catalog coverage is patchy. Scoring code
//! never reads the raw options for numeric maths; it goes through the
//! `*_or_zero` accessors so the "missing means zero" rule is spelled out in
//! one place.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Nutri-Score letter grade summarising overall nutritional quality.
///
/// # Examples
/// ```
/// use prodhealth_core::NutritionGrade;
///
/// assert_eq!(NutritionGrade::parse("d"), Some(NutritionGrade::D));
/// assert_eq!(NutritionGrade::parse(" E "), None);
/// assert_eq!(NutritionGrade::parse("unknown"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum NutritionGrade {
    /// Best grade.
    A,
    /// Good.
    B,
    /// Average.
    C,
    /// Poor.
    D,
    /// Worst grade.
    E,
}

impl NutritionGrade {
    /// All grades from best to worst.
    pub const ALL: [Self; 5] = [Self::A, Self::B, Self::C, Self::D, Self::E];

    /// Parse a grade letter, ignoring case.
    ///
    /// Returns `None` for anything other than a single `A`–`E` letter,
    /// including padded input such as `" e "`. Scoring treats that the same
    /// as an absent grade.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "E" => Some(Self::E),
            _ => None,
        }
    }

    /// Return the grade as an uppercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        }
    }
}

impl fmt::Display for NutritionGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NutritionGrade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown nutrition grade '{s}'"))
    }
}

impl TryFrom<String> for NutritionGrade {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NutritionGrade> for String {
    fn from(grade: NutritionGrade) -> Self {
        grade.as_str().to_owned()
    }
}

/// Per-100 g nutrient quantities.
///
/// Non-finite values are treated the same as absent ones by the accessors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Nutrients {
    /// Energy in kcal.
    pub energy_kcal: Option<f64>,
    /// Sugars in grams.
    pub sugars: Option<f64>,
    /// Saturated fat in grams.
    pub saturated_fat: Option<f64>,
    /// Salt in grams.
    pub salt: Option<f64>,
    /// Fiber in grams.
    pub fiber: Option<f64>,
    /// Protein in grams.
    pub protein: Option<f64>,
}

const fn finite_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

impl Nutrients {
    /// Energy per 100 g, `0.0` when unknown.
    #[must_use]
    pub const fn energy_kcal_or_zero(&self) -> f64 {
        finite_or_zero(self.energy_kcal)
    }

    /// Sugars per 100 g, `0.0` when unknown.
    #[must_use]
    pub const fn sugars_or_zero(&self) -> f64 {
        finite_or_zero(self.sugars)
    }

    /// Saturated fat per 100 g, `0.0` when unknown.
    #[must_use]
    pub const fn saturated_fat_or_zero(&self) -> f64 {
        finite_or_zero(self.saturated_fat)
    }

    /// Salt per 100 g, `0.0` when unknown.
    #[must_use]
    pub const fn salt_or_zero(&self) -> f64 {
        finite_or_zero(self.salt)
    }

    /// Fiber per 100 g, `0.0` when unknown.
    #[must_use]
    pub const fn fiber_or_zero(&self) -> f64 {
        finite_or_zero(self.fiber)
    }

    /// Protein per 100 g, `0.0` when unknown.
    #[must_use]
    pub const fn protein_or_zero(&self) -> f64 {
        finite_or_zero(self.protein)
    }
}

/// Ingredient list text in up to two languages.
///
/// Catalogs expose a localized field and an English one. [`resolve`]
/// prefers the localized text, falls back to English, and finally to the
/// empty string. Blank fields count as missing.
///
/// [`resolve`]: IngredientText::resolve
///
/// # Examples
/// ```
/// use prodhealth_core::IngredientText;
///
/// let text = IngredientText {
///     localized: Some(String::new()),
///     english: Some("Wheat flour, sugar".into()),
/// };
/// assert_eq!(text.resolve(), "Wheat flour, sugar");
/// assert_eq!(IngredientText::default().resolve(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct IngredientText {
    /// Ingredient list in the product's own language.
    pub localized: Option<String>,
    /// Ingredient list in English.
    pub english: Option<String>,
}

impl IngredientText {
    /// Build ingredient text with only the localized field set.
    #[must_use]
    pub fn localized(text: impl Into<String>) -> Self {
        Self {
            localized: Some(text.into()),
            english: None,
        }
    }

    /// Return the preferred non-empty ingredient text.
    #[must_use]
    pub fn resolve(&self) -> &str {
        let localized = self.localized.as_deref().filter(|t| !t.is_empty());
        let english = self.english.as_deref().filter(|t| !t.is_empty());
        localized.or(english).unwrap_or_default()
    }
}

/// A product's nutritional record.
///
/// # Examples
/// ```
/// use prodhealth_core::{NutritionGrade, NutritionRecord};
///
/// let record = NutritionRecord::default()
///     .with_grade(NutritionGrade::C)
///     .with_nova_group(4)
///     .with_sugars(12.0);
/// assert_eq!(record.nova_group, Some(4));
/// assert_eq!(record.additives_or_zero(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct NutritionRecord {
    /// Nutri-Score grade, if known.
    pub nutrition_grade: Option<NutritionGrade>,
    /// NOVA processing group, nominally 1–4.
    pub nova_group: Option<u8>,
    /// Number of additives.
    pub additives_count: Option<u32>,
    /// Per-100 g nutrients.
    pub nutrients: Nutrients,
    /// Ingredient list text.
    pub ingredients: IngredientText,
}

impl NutritionRecord {
    /// Additive count, `0` when unknown.
    #[must_use]
    pub fn additives_or_zero(&self) -> u32 {
        self.additives_count.unwrap_or(0)
    }

    /// Set the nutrition grade.
    #[must_use]
    pub const fn with_grade(mut self, grade: NutritionGrade) -> Self {
        self.nutrition_grade = Some(grade);
        self
    }

    /// Set the NOVA group.
    #[must_use]
    pub const fn with_nova_group(mut self, group: u8) -> Self {
        self.nova_group = Some(group);
        self
    }

    /// Set the additive count.
    #[must_use]
    pub const fn with_additives(mut self, count: u32) -> Self {
        self.additives_count = Some(count);
        self
    }

    /// Set sugars per 100 g.
    #[must_use]
    pub const fn with_sugars(mut self, grams: f64) -> Self {
        self.nutrients.sugars = Some(grams);
        self
    }

    /// Set saturated fat per 100 g.
    #[must_use]
    pub const fn with_saturated_fat(mut self, grams: f64) -> Self {
        self.nutrients.saturated_fat = Some(grams);
        self
    }

    /// Set salt per 100 g.
    #[must_use]
    pub const fn with_salt(mut self, grams: f64) -> Self {
        self.nutrients.salt = Some(grams);
        self
    }

    /// Set fiber per 100 g.
    #[must_use]
    pub const fn with_fiber(mut self, grams: f64) -> Self {
        self.nutrients.fiber = Some(grams);
        self
    }

    /// Set protein per 100 g.
    #[must_use]
    pub const fn with_protein(mut self, grams: f64) -> Self {
        self.nutrients.protein = Some(grams);
        self
    }

    /// Set the localized ingredient text.
    #[must_use]
    pub fn with_ingredients(mut self, text: impl Into<String>) -> Self {
        self.ingredients.localized = Some(text.into());
        self
    }
}
