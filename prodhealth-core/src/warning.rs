//! Personalised warnings attached to a scan.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum WarningCategory {
    /// The ingredients mention one of the user's allergens.
    Allergen,
    /// The ingredients conflict with a diet type.
    Dietary,
    /// Sugar is high for the user's goals.
    Sugar,
    /// Salt is high for the user's goals.
    Salt,
    /// Saturated fat is high for the user's goals.
    SaturatedFat,
}

/// How serious a warning is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Severity {
    /// Informational.
    Info,
    /// Worth attention.
    Warn,
    /// Potentially harmful.
    Danger,
}

/// A human-readable concern derived from a product and a user's preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Warning {
    /// Subject of the warning.
    pub category: WarningCategory,
    /// Seriousness.
    pub severity: Severity,
    /// Message shown to the user.
    pub message: String,
}

impl Warning {
    /// Build a warning.
    #[must_use]
    pub fn new(category: WarningCategory, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            category,
            severity,
            message: message.into(),
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn serialises_with_wire_names() {
        let warning = Warning::new(
            WarningCategory::SaturatedFat,
            Severity::Warn,
            "High saturated fat",
        );
        let json = serde_json::to_value(&warning).expect("encode warning");
        assert_eq!(json["category"], "saturatedFat");
        assert_eq!(json["severity"], "warn");
    }
}
