//! Open Food Facts response types.
//!
//! Only the fields the scoring engine and the history log consume are
//! modelled. Open Food Facts is loose with types: numbers sometimes arrive
//! as strings and strings as numbers, so every field goes through a lenient
//! decoder that turns anything unusable into `None` instead of failing the
//! whole payload.
//!
//! See: <https://openfoodfacts.github.io/openfoodfacts-server/api/>

use log::warn;
use prodhealth_core::{
    IngredientText, Nutrients, NutritionGrade, NutritionRecord, Product, ProductSummary,
};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Response of the v2 product endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductResponse {
    /// `1` when found, `0` when the product is unknown.
    #[serde(deserialize_with = "lenient_number")]
    pub status: Option<f64>,
    /// Barcode echoed by the service.
    #[serde(deserialize_with = "lenient_text")]
    pub code: Option<String>,
    /// Product payload; absent when not found.
    pub product: Option<OffProduct>,
}

impl ProductResponse {
    /// Convert into a domain product, `None` when the catalog reported no
    /// such product.
    #[must_use]
    pub fn into_product(self, barcode: &str) -> Option<Product> {
        if self.status.and_then(whole_number) == Some(0) {
            return None;
        }
        let product = self.product?;
        let code = self
            .code
            .or_else(|| product.code.clone())
            .unwrap_or_else(|| barcode.to_owned());
        Some(product.into_product(code))
    }
}

/// Response of the `cgi/search.pl` endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    /// Matching products for the requested page.
    pub products: Vec<OffProduct>,
}

impl SearchResponse {
    /// Convert hits into summaries, skipping hits without a barcode.
    #[must_use]
    pub fn into_summaries(self) -> Vec<ProductSummary> {
        self.products
            .into_iter()
            .filter_map(OffProduct::into_summary)
            .collect()
    }
}

/// A product as returned by either endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OffProduct {
    #[serde(deserialize_with = "lenient_text")]
    code: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    product_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    generic_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    brands: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    image_url: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    image_small_url: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    nutrition_grade_fr: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    nutriscore_grade: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    nova_group: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    additives_n: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    ingredients_text: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    ingredients_text_en: Option<String>,
    nutriments: Option<OffNutriments>,
}

/// Per-100 g nutrient block.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OffNutriments {
    #[serde(rename = "energy-kcal_100g", deserialize_with = "lenient_number")]
    energy_kcal_hyphenated: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    energy_kcal_100g: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    sugars_100g: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    saturated_fat_100g: Option<f64>,
    #[serde(rename = "saturated-fat_100g", deserialize_with = "lenient_number")]
    saturated_fat_hyphenated: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    salt_100g: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    fiber_100g: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    proteins_100g: Option<f64>,
}

impl From<OffNutriments> for Nutrients {
    fn from(raw: OffNutriments) -> Self {
        Self {
            energy_kcal: raw.energy_kcal_hyphenated.or(raw.energy_kcal_100g),
            sugars: raw.sugars_100g,
            saturated_fat: raw.saturated_fat_100g.or(raw.saturated_fat_hyphenated),
            salt: raw.salt_100g,
            fiber: raw.fiber_100g,
            protein: raw.proteins_100g,
        }
    }
}

impl OffProduct {
    fn record(&mut self) -> NutritionRecord {
        let grade = first_non_empty(self.nutrition_grade_fr.take(), self.nutriscore_grade.take())
            .and_then(|raw| NutritionGrade::parse(&raw));
        NutritionRecord {
            nutrition_grade: grade,
            nova_group: self
                .nova_group
                .and_then(whole_number)
                .and_then(|n| u8::try_from(n).ok()),
            additives_count: self.additives_n.and_then(whole_number),
            nutrients: self.nutriments.take().map(Nutrients::from).unwrap_or_default(),
            ingredients: IngredientText {
                localized: self.ingredients_text.take(),
                english: self.ingredients_text_en.take(),
            },
        }
    }

    fn into_product(mut self, code: String) -> Product {
        let record = self.record();
        Product {
            code,
            name: non_empty(self.product_name),
            brand: non_empty(self.brands),
            image_url: non_empty(self.image_url),
            record,
        }
    }

    fn into_summary(self) -> Option<ProductSummary> {
        let code = non_empty(self.code)?;
        Some(ProductSummary {
            code,
            name: first_non_empty(self.product_name, self.generic_name),
            brand: non_empty(self.brands),
            image_url: non_empty(self.image_small_url),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn first_non_empty(first: Option<String>, second: Option<String>) -> Option<String> {
    non_empty(first).or_else(|| non_empty(second))
}

/// Convert a non-negative whole number to `u32`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is checked to be a whole number within u32 range"
)]
fn whole_number(value: f64) -> Option<u32> {
    let in_range = value >= 0.0 && value <= f64::from(u32::MAX);
    (in_range && value.fract() == 0.0).then(|| value as u32)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Number(number)) => Some(number),
        Some(Loose::Text(text)) => {
            let parsed = text.trim().parse::<f64>().ok();
            if parsed.is_none() && !text.trim().is_empty() {
                warn!("ignoring non-numeric catalog value {text:?}");
            }
            parsed
        }
        Some(Loose::Other(_)) | None => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Text(text)) => Some(text),
        Some(Loose::Number(number)) => Some(number.to_string()),
        Some(Loose::Other(_)) | None => None,
    })
}
