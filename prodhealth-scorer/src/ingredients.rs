//! Substring checks over a product's ingredient text.
//!
//! Matching is plain substring search: the lower-cased ingredient text is
//! searched for lower-cased terms without any word-boundary handling, so
//! `"fisher"` matches `"fish"`.

#![forbid(unsafe_code)]

use prodhealth_core::{NutritionRecord, Preferences};

/// Terms that mark a product as not vegetarian.
pub const MEAT_TERMS: [&str; 6] = ["chicken", "meat", "pork", "fish", "beef", "gelatin"];

/// Terms that mark a product as containing animal products.
pub const ANIMAL_PRODUCT_TERMS: [&str; 7] =
    ["milk", "egg", "honey", "butter", "ghee", "cheese", "curd"];

/// Result of scanning ingredient text against a user's preferences.
///
/// # Examples
/// ```
/// use prodhealth_core::{NutritionRecord, Preferences};
/// use prodhealth_scorer::IngredientScan;
///
/// let record = NutritionRecord::default().with_ingredients("Wheat flour, Peanuts, Milk solids");
/// let prefs = Preferences::default().with_allergen("Peanuts").with_allergen("Soy");
/// let scan = IngredientScan::new(&record, &prefs);
/// assert_eq!(scan.matched_allergens(), ["peanuts"]);
/// assert!(scan.contains_animal_products());
/// assert!(!scan.contains_meat());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IngredientScan {
    allergens: Vec<String>,
    meat: bool,
    animal_products: bool,
}

impl IngredientScan {
    /// Scan the record's resolved ingredient text.
    ///
    /// The text is lower-cased once and reused for every check.
    #[must_use]
    pub fn new(record: &NutritionRecord, preferences: &Preferences) -> Self {
        let text = record.ingredients.resolve().to_lowercase();
        let allergens = preferences
            .allergens
            .iter()
            .map(str::to_lowercase)
            .filter(|allergen| text.contains(allergen.as_str()))
            .collect();
        Self {
            allergens,
            meat: contains_any(&text, &MEAT_TERMS),
            animal_products: contains_any(&text, &ANIMAL_PRODUCT_TERMS),
        }
    }

    /// Lower-cased allergens found in the text, in preference order.
    #[must_use]
    pub fn matched_allergens(&self) -> &[String] {
        &self.allergens
    }

    /// Report whether any meat term was found.
    #[must_use]
    pub const fn contains_meat(&self) -> bool {
        self.meat
    }

    /// Report whether any animal-product term was found.
    #[must_use]
    pub const fn contains_animal_products(&self) -> bool {
        self.animal_products
    }
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}
