//! Meal timing and food variety analysis.
//!
//! Category matching is a plain case-insensitive substring check against
//! fixed keyword lists, so "chicken breast" counts as protein via "chicken".

use crate::analysis::constants::{
    CATEGORY_WEIGHT, EXPECTED_CATEGORIES, EXPECTED_UNIQUE_FOODS, MAX_MEAL_GAP_HOURS,
    UNIQUE_FOODS_WEIGHT,
};
use crate::analysis::stats::{mean, round_to};
use crate::models::{FoodEntry, MealPattern, MealType, MealTypeStats};
use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Broad food group used for diversity scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Protein,
    Vegetable,
    Fruit,
    Grain,
    Dairy,
}

/// Keywords that place a food in a category.
pub const FOOD_CATEGORIES: &[(FoodCategory, &[&str])] = &[
    (
        FoodCategory::Protein,
        &["chicken", "fish", "eggs", "meat", "tofu", "beans"],
    ),
    (
        FoodCategory::Vegetable,
        &["broccoli", "spinach", "carrot", "lettuce", "pepper"],
    ),
    (
        FoodCategory::Fruit,
        &["apple", "banana", "orange", "berry", "melon"],
    ),
    (
        FoodCategory::Grain,
        &["rice", "bread", "pasta", "oats", "quinoa"],
    ),
    (FoodCategory::Dairy, &["milk", "yogurt", "cheese"]),
];

/// Timing of logged meals.
///
/// The average gap spans first to last meal, so it is unaffected by order.
pub fn analyze_meal_pattern(history: &[FoodEntry]) -> MealPattern {
    let mut times: Vec<_> = history.iter().map(|e| e.timestamp).collect();
    times.sort();

    let gap_exceeds_4h = times
        .windows(2)
        .any(|pair| hours_between(pair[0], pair[1]) > MAX_MEAL_GAP_HOURS);

    let average_gap_hours = match (times.first(), times.last()) {
        (Some(first), Some(last)) if times.len() > 1 => {
            round_to(hours_between(*first, *last) / (times.len() - 1) as f64, 1)
        }
        _ => 0.0,
    };

    MealPattern {
        total_meals: times.len(),
        gap_exceeds_4h,
        average_gap_hours,
    }
}

fn hours_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / (1000.0 * 60.0 * 60.0)
}

/// Count how many entries fall into each food category.
///
/// An entry can count towards several categories.
pub fn categorize_foods(history: &[FoodEntry]) -> BTreeMap<FoodCategory, usize> {
    let mut found: BTreeMap<FoodCategory, usize> = BTreeMap::new();

    for entry in history {
        let name = entry.food_name.to_lowercase();
        for (category, keywords) in FOOD_CATEGORIES {
            if keywords.iter().any(|keyword| name.contains(keyword)) {
                *found.entry(*category).or_default() += 1;
            }
        }
    }

    found
}

/// Food variety score in `[0, 1]`.
pub fn calculate_food_diversity(history: &[FoodEntry]) -> f64 {
    let unique: HashSet<String> = history.iter().map(|e| e.food_name.to_lowercase()).collect();
    let categories = categorize_foods(history);

    let unique_score = (unique.len() as f64 / EXPECTED_UNIQUE_FOODS).min(1.0);
    let category_score = (categories.len() as f64 / EXPECTED_CATEGORIES).min(1.0);

    unique_score * UNIQUE_FOODS_WEIGHT + category_score * CATEGORY_WEIGHT
}

/// Per-meal-type habits, evaluated in the given local offset.
pub fn meal_type_patterns(history: &[FoodEntry], offset: FixedOffset) -> Vec<MealTypeStats> {
    let logged_days: BTreeSet<NaiveDate> = history
        .iter()
        .map(|e| e.timestamp.with_timezone(&offset).date_naive())
        .collect();

    MealType::ALL
        .iter()
        .filter_map(|meal_type| {
            let meals: Vec<&FoodEntry> =
                history.iter().filter(|e| e.meal_type == *meal_type).collect();
            if meals.is_empty() {
                return None;
            }

            let calories: Vec<f64> = meals.iter().map(|e| e.calories).collect();
            let hours: Vec<f64> = meals
                .iter()
                .map(|e| {
                    let local = e.timestamp.with_timezone(&offset);
                    local.hour() as f64 + local.minute() as f64 / 60.0
                })
                .collect();
            let days_with_meal: BTreeSet<NaiveDate> = meals
                .iter()
                .map(|e| e.timestamp.with_timezone(&offset).date_naive())
                .collect();

            Some(MealTypeStats {
                meal_type: *meal_type,
                count: meals.len(),
                average_calories: mean(&calories).map(f64::round).unwrap_or(0.0),
                average_hour: mean(&hours).map(|h| round_to(h, 1)),
                days_ratio: round_to(days_with_meal.len() as f64 / logged_days.len() as f64, 2),
            })
        })
        .collect()
}
