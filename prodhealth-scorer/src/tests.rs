//! Unit coverage for scoring, personalisation and warnings.
#![forbid(unsafe_code)]

use prodhealth_core::{
    Diet, Goal, HealthScore, NutritionGrade, NutritionRecord, Preferences, Severity,
    WarningCategory,
};
use rstest::{fixture, rstest};

use crate::{
    BaselineScorer, BaselineWeights, PersonalizationWeights, Personalizer, Ramp, WeightsError,
    analyse, personalize, score, warnings,
};

fn base(value: u8) -> HealthScore {
    HealthScore::new(value).expect("score in range")
}

#[fixture]
fn empty_prefs() -> Preferences {
    Preferences::default()
}

#[test]
fn empty_record_scores_full_marks() {
    assert_eq!(score(&NutritionRecord::default()).value(), 100);
}

#[rstest]
#[case(NutritionRecord::default().with_nova_group(4), 75)]
#[case(NutritionRecord::default().with_nova_group(7), 75)]
#[case(NutritionRecord::default().with_nova_group(3), 88)]
#[case(NutritionRecord::default().with_nova_group(2), 100)]
#[case(NutritionRecord::default().with_grade(NutritionGrade::E), 75)]
#[case(NutritionRecord::default().with_grade(NutritionGrade::D), 85)]
#[case(NutritionRecord::default().with_grade(NutritionGrade::C), 93)]
#[case(NutritionRecord::default().with_grade(NutritionGrade::B), 98)]
#[case(NutritionRecord::default().with_grade(NutritionGrade::A), 100)]
#[case(
    NutritionRecord::default().with_grade(NutritionGrade::E).with_nova_group(4),
    50
)]
#[case(NutritionRecord::default().with_sugars(15.0), 88)]
#[case(NutritionRecord::default().with_sugars(5.0), 100)]
#[case(NutritionRecord::default().with_sugars(80.0), 70)]
#[case(NutritionRecord::default().with_saturated_fat(6.0), 94)]
#[case(NutritionRecord::default().with_salt(0.3), 100)]
#[case(NutritionRecord::default().with_salt(0.5), 95)]
#[case(NutritionRecord::default().with_salt(3.0), 85)]
#[case(NutritionRecord::default().with_additives(2), 94)]
#[case(NutritionRecord::default().with_additives(9), 85)]
fn baseline_deductions(#[case] record: NutritionRecord, #[case] expected: u8) {
    assert_eq!(score(&record).value(), expected);
}

#[test]
fn bonuses_are_clamped_at_one_hundred() {
    let record = NutritionRecord::default().with_fiber(20.0).with_protein(30.0);
    assert_eq!(score(&record), HealthScore::MAX);
}

#[test]
fn bonuses_offset_deductions() {
    // 100 - 25 (E) - 12 (sugar 15) + 6 (fiber 5) + 4 (protein 10) = 73
    let record = NutritionRecord::default()
        .with_grade(NutritionGrade::E)
        .with_sugars(15.0)
        .with_fiber(5.0)
        .with_protein(10.0);
    assert_eq!(score(&record).value(), 73);
}

#[test]
fn worst_case_floors_at_zero() {
    let record = NutritionRecord::default()
        .with_grade(NutritionGrade::E)
        .with_nova_group(4)
        .with_sugars(60.0)
        .with_saturated_fat(30.0)
        .with_salt(5.0)
        .with_additives(12);
    assert_eq!(score(&record), HealthScore::MIN);
}

#[test]
fn rounding_happens_once_at_the_end() {
    // 100 - 0.6 (sugar 5.5) - 0.75 (sat fat 2.5) = 98.65 -> 99
    let record = NutritionRecord::default()
        .with_sugars(5.5)
        .with_saturated_fat(2.5);
    assert_eq!(score(&record).value(), 99);
}

#[test]
fn non_finite_nutrients_are_ignored() {
    let record = NutritionRecord::default()
        .with_sugars(f64::NAN)
        .with_salt(f64::INFINITY);
    assert_eq!(score(&record).value(), 100);
}

#[rstest]
#[case(0)]
#[case(42)]
#[case(100)]
fn absent_preferences_are_identity(#[case] value: u8) {
    let record = NutritionRecord::default()
        .with_sugars(40.0)
        .with_ingredients("chicken, milk, peanuts");
    assert_eq!(personalize(base(value), &record, None), base(value));
}

#[rstest]
fn empty_preferences_change_nothing(empty_prefs: Preferences) {
    let record = NutritionRecord::default().with_sugars(40.0);
    assert_eq!(personalize(base(64), &record, Some(&empty_prefs)).value(), 64);
    assert!(warnings(&record, Some(&empty_prefs)).is_empty());
}

#[rstest]
#[case("Roasted peanuts, salt", &["Peanuts"], 55)]
#[case("Roasted peanut kernels", &["Peanuts"], 80)]
#[case("Coconut oil, sugar", &["Nuts"], 80)]
#[case("egg white, sugar", &["Eggs"], 80)]
#[case("milk, soy lecithin", &["Milk", "Soy"], 50)]
#[case("milk, soy, wheat, sesame, eggs", &["Milk", "Soy", "Wheat", "Sesame", "Eggs"], 40)]
#[case("rice flour", &["Peanuts"], 80)]
fn allergen_deductions(#[case] text: &str, #[case] allergens: &[&str], #[case] expected: u8) {
    let record = NutritionRecord::default().with_ingredients(text);
    let prefs = allergens
        .iter()
        .fold(Preferences::default(), |p, a| p.with_allergen(a));
    assert_eq!(
        personalize(base(80), &record, Some(&prefs)).value(),
        expected
    );
}

#[test]
fn vegetarian_and_vegan_deductions_stack() {
    let record = NutritionRecord::default().with_ingredients("Chicken, butter");
    let prefs = Preferences::default()
        .with_diet(Diet::Vegetarian)
        .with_diet(Diet::Vegan);
    assert_eq!(personalize(base(90), &record, Some(&prefs)).value(), 55);
}

#[test]
fn vegan_deduction_ignores_meat_terms() {
    let record = NutritionRecord::default().with_ingredients("beef stock");
    let prefs = Preferences::default().with_diet(Diet::Vegan);
    assert_eq!(personalize(base(90), &record, Some(&prefs)).value(), 90);
    let found = warnings(&record, Some(&prefs));
    assert_eq!(found.len(), 1);
    assert_eq!(
        found.first().map(|w| w.message.as_str()),
        Some("Not vegan based on ingredients listed.")
    );
}

#[rstest]
#[case(Goal::WeightLoss, 70)]
#[case(Goal::DiabetesManagement, 70)]
#[case(Goal::HeartHealth, 70)]
#[case(Goal::LowerCholesterol, 76)]
#[case(Goal::EnergyBoost, 85)]
fn goal_deductions(#[case] goal: Goal, #[case] expected: u8) {
    // sugar 25 -> 15 (cap), salt 1.0 -> 15 (cap), sat fat 7 -> 9
    let record = NutritionRecord::default()
        .with_sugars(25.0)
        .with_salt(1.0)
        .with_saturated_fat(7.0);
    let prefs = Preferences::default().with_goal(goal);
    assert_eq!(
        personalize(base(85), &record, Some(&prefs)).value(),
        expected
    );
}

#[test]
fn weight_loss_and_diabetes_deduct_sugar_once() {
    let record = NutritionRecord::default().with_sugars(10.0);
    let prefs = Preferences::default()
        .with_goal(Goal::WeightLoss)
        .with_goal(Goal::DiabetesManagement);
    assert_eq!(personalize(base(80), &record, Some(&prefs)).value(), 73);
}

#[test]
fn warnings_are_empty_without_preferences() {
    let record = NutritionRecord::default()
        .with_sugars(50.0)
        .with_ingredients("peanuts");
    assert!(warnings(&record, None).is_empty());
}

#[rstest]
#[case(&["Peanuts"], "Contains your allergen: peanuts")]
#[case(&["Peanuts", "Milk"], "Contains your allergens: peanuts, milk")]
#[case(&["Soy", "Milk", "Peanuts"], "Contains your allergens: milk, peanuts")]
fn allergen_warning_pluralises(#[case] allergens: &[&str], #[case] expected: &str) {
    let record = NutritionRecord::default().with_ingredients("Peanuts, MILK powder");
    let prefs = allergens
        .iter()
        .fold(Preferences::default(), |p, a| p.with_allergen(a));
    let found = warnings(&record, Some(&prefs));
    let first = found.first().expect("allergen warning");
    assert_eq!(first.category, WarningCategory::Allergen);
    assert_eq!(first.severity, Severity::Danger);
    assert_eq!(first.message, expected);
}

#[rstest]
#[case("Coconut oil, sugar", "Nuts")]
#[case("egg white, sugar", "Eggs")]
#[case("tree nut mix", "Tree nuts")]
fn plural_allergens_do_not_match_singular_text(#[case] text: &str, #[case] allergen: &str) {
    let record = NutritionRecord::default().with_ingredients(text);
    let prefs = Preferences::default().with_allergen(allergen);
    let result = analyse(&record, Some(&prefs));
    assert_eq!(result.score, result.baseline);
    assert!(result.warnings.is_empty());
}

#[test]
fn warnings_follow_fixed_order() {
    let record = NutritionRecord::default()
        .with_ingredients("pork gelatin, milk, peanuts")
        .with_sugars(12.5)
        .with_salt(0.35)
        .with_saturated_fat(4.0);
    let prefs = Preferences::default()
        .with_allergen("Peanuts")
        .with_diet(Diet::Vegetarian)
        .with_diet(Diet::Vegan)
        .with_goal(Goal::LowerCholesterol)
        .with_goal(Goal::HeartHealth)
        .with_goal(Goal::DiabetesManagement);
    let messages: Vec<_> = warnings(&record, Some(&prefs))
        .into_iter()
        .map(|w| (w.category, w.message))
        .collect();
    assert_eq!(
        messages,
        vec![
            (
                WarningCategory::Allergen,
                "Contains your allergen: peanuts".to_owned()
            ),
            (
                WarningCategory::Dietary,
                "Not vegetarian based on ingredients listed.".to_owned()
            ),
            (
                WarningCategory::Dietary,
                "Not vegan based on ingredients listed.".to_owned()
            ),
            (
                WarningCategory::Sugar,
                "High sugar for your goals (12.5g/100g). Consider lower-sugar options.".to_owned()
            ),
            (
                WarningCategory::Salt,
                "High salt for heart health (350mg/100g).".to_owned()
            ),
            (
                WarningCategory::SaturatedFat,
                "High saturated fat (4g/100g). Consider lower saturated fat choices.".to_owned()
            ),
        ]
    );
}

#[rstest]
#[case(5.0, 0.3, 2.0)]
#[case(0.0, 0.0, 0.0)]
fn nutrient_warnings_use_strict_thresholds(
    #[case] sugars: f64,
    #[case] salt: f64,
    #[case] saturated_fat: f64,
) {
    let record = NutritionRecord::default()
        .with_sugars(sugars)
        .with_salt(salt)
        .with_saturated_fat(saturated_fat);
    let prefs = Preferences::default()
        .with_goal(Goal::WeightLoss)
        .with_goal(Goal::HeartHealth)
        .with_goal(Goal::LowerCholesterol);
    assert!(warnings(&record, Some(&prefs)).is_empty());
}

#[test]
fn scoring_is_deterministic() {
    let record = NutritionRecord::default()
        .with_grade(NutritionGrade::C)
        .with_sugars(9.3)
        .with_ingredients("milk, sugar");
    let prefs = Preferences::default()
        .with_allergen("Milk")
        .with_goal(Goal::WeightLoss);
    assert_eq!(score(&record), score(&record));
    assert_eq!(
        warnings(&record, Some(&prefs)),
        warnings(&record, Some(&prefs))
    );
    assert_eq!(analyse(&record, Some(&prefs)), analyse(&record, Some(&prefs)));
}

#[test]
fn analyse_reports_personalisation() {
    let record = NutritionRecord::default().with_nova_group(3);
    let plain = analyse(&record, None);
    assert!(!plain.personalised);
    assert_eq!(plain.score, plain.baseline);
    assert_eq!(plain.baseline.value(), 88);

    let personal = analyse(&record, Some(&Preferences::default()));
    assert!(personal.personalised);
    assert_eq!(personal.score.value(), 88);
}

#[rstest]
#[case(f64::NAN, WeightsError::NonFinite { field: "grade_e" })]
#[case(-1.0, WeightsError::Negative { field: "grade_e" })]
fn baseline_weights_are_validated(#[case] value: f64, #[case] expected: WeightsError) {
    let weights = BaselineWeights {
        grade_e: value,
        ..BaselineWeights::default()
    };
    assert_eq!(BaselineScorer::new(weights), Err(expected));
}

#[test]
fn personalization_ramps_are_validated() {
    let weights = PersonalizationWeights {
        salt_goal: Ramp::new(0.3, f64::INFINITY, 15.0),
        ..PersonalizationWeights::default()
    };
    assert_eq!(
        Personalizer::new(weights),
        Err(WeightsError::NonFinite { field: "salt_goal" })
    );
}

#[test]
fn custom_weights_change_the_outcome() {
    let weights = BaselineWeights {
        grade_e: 40.0,
        ..BaselineWeights::default()
    };
    let scorer = BaselineScorer::new(weights).expect("valid weights");
    let record = NutritionRecord::default().with_grade(NutritionGrade::E);
    assert_eq!(scorer.score(&record).value(), 60);
}

#[test]
fn weights_deserialise_with_defaults() {
    let weights: BaselineWeights =
        serde_json::from_str(r#"{"grade_e": 30.0}"#).expect("decode weights");
    assert_eq!(
        weights,
        BaselineWeights {
            grade_e: 30.0,
            ..BaselineWeights::default()
        }
    );
}
