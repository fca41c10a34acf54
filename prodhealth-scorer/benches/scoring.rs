//! Criterion benchmarks for the analysis pipeline.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package prodhealth-scorer
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use prodhealth_core::{Diet, Goal, NutritionGrade, NutritionRecord, Preferences};
use prodhealth_scorer::{analyse, score};

/// Long ingredient list resembling a processed snack label.
const INGREDIENTS: &str = "Refined wheat flour, palm oil, sugar, invert syrup, milk solids, \
    cocoa solids, raising agents (503(ii), 500(ii)), iodised salt, emulsifiers (322, 471), \
    artificial flavouring substances, peanut butter, whey powder, edible starch";

fn snack() -> NutritionRecord {
    NutritionRecord::default()
        .with_grade(NutritionGrade::D)
        .with_nova_group(4)
        .with_additives(6)
        .with_sugars(28.4)
        .with_saturated_fat(9.1)
        .with_salt(0.9)
        .with_fiber(2.0)
        .with_protein(6.5)
        .with_ingredients(INGREDIENTS)
}

fn busy_preferences() -> Preferences {
    Preferences::default()
        .with_goal(Goal::WeightLoss)
        .with_goal(Goal::HeartHealth)
        .with_goal(Goal::LowerCholesterol)
        .with_diet(Diet::Vegetarian)
        .with_diet(Diet::Vegan)
        .with_allergen("Peanuts")
        .with_allergen("Milk")
        .with_allergen("Soy")
        .with_allergen("Sesame")
}

fn bench_scoring(c: &mut Criterion) {
    let record = snack();
    let prefs = busy_preferences();

    c.bench_function("baseline_score", |b| {
        b.iter(|| score(black_box(&record)));
    });
    c.bench_function("analyse_without_preferences", |b| {
        b.iter(|| analyse(black_box(&record), None));
    });
    c.bench_function("analyse_with_preferences", |b| {
        b.iter(|| analyse(black_box(&record), Some(black_box(&prefs))));
    });
}

criterion_group!(benches, bench_scoring);
criterion_main!(benches);
