//! Nutrition estimation from a static food table.
//!
//! Food names are matched exactly after lower-casing. Anything not in the
//! table gets a fixed baseline estimate, which is an approximation and not
//! an error.

use crate::analysis::stats::round_to;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Estimated nutrition for a logged quantity of food.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionEstimate {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// A food with known nutrition per unit quantity.
#[derive(Debug, Clone, Copy)]
pub struct KnownFood {
    pub name: &'static str,
    pub base: NutritionEstimate,
}

const fn food(name: &'static str, calories: f64, protein: f64, carbs: f64, fat: f64) -> KnownFood {
    KnownFood {
        name,
        base: NutritionEstimate {
            calories,
            protein,
            carbs,
            fat,
        },
    }
}

pub const KNOWN_FOODS: &[KnownFood] = &[
    food("apple", 52.0, 0.3, 14.0, 0.2),
    food("banana", 89.0, 1.1, 23.0, 0.3),
    food("chicken breast", 165.0, 31.0, 0.0, 3.6),
    food("rice", 130.0, 2.7, 28.0, 0.3),
    food("eggs", 155.0, 13.0, 1.1, 11.0),
    food("bread", 265.0, 9.0, 49.0, 3.2),
    food("milk", 42.0, 3.4, 5.0, 1.0),
    food("yogurt", 59.0, 3.5, 4.7, 3.3),
    food("pasta", 131.0, 5.0, 25.0, 1.0),
    food("salmon", 208.0, 20.0, 0.0, 13.0),
    food("broccoli", 34.0, 2.8, 7.0, 0.4),
    food("spinach", 23.0, 2.9, 3.6, 0.4),
];

/// Baseline used for foods missing from the table.
pub const DEFAULT_ESTIMATE: NutritionEstimate = NutritionEstimate {
    calories: 100.0,
    protein: 5.0,
    carbs: 15.0,
    fat: 3.0,
};

fn lookup(food_name: &str) -> Option<&'static KnownFood> {
    let key = food_name.to_lowercase();
    KNOWN_FOODS.iter().find(|food| food.name == key)
}

/// Whether the food has an entry in the table.
pub fn is_known(food_name: &str) -> bool {
    lookup(food_name).is_some()
}

/// Estimate nutrition for `quantity` units of a food.
///
/// Negative or non-finite quantities are treated as 1. Calories are rounded
/// to whole kcal, macros to one decimal.
pub fn estimate(food_name: &str, quantity: f64) -> NutritionEstimate {
    let quantity = if quantity.is_finite() && quantity >= 0.0 {
        quantity
    } else {
        debug!("Coercing invalid quantity {} to 1", quantity);
        1.0
    };

    let base = match lookup(food_name) {
        Some(food) => food.base,
        None => {
            debug!("No table entry for '{}', using default estimate", food_name);
            DEFAULT_ESTIMATE
        }
    };

    NutritionEstimate {
        calories: (base.calories * quantity).round(),
        protein: round_to(base.protein * quantity, 1),
        carbs: round_to(base.carbs * quantity, 1),
        fat: round_to(base.fat * quantity, 1),
    }
}

/// Estimate from a raw text quantity, as typed by a user.
///
/// Unparsable text counts as a quantity of 1.
pub fn estimate_from_input(food_name: &str, raw_quantity: &str) -> NutritionEstimate {
    let quantity = raw_quantity.trim().parse::<f64>().unwrap_or(1.0);
    estimate(food_name, quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apple_single_portion() {
        let result = estimate("apple", 1.0);
        assert_eq!(
            result,
            NutritionEstimate {
                calories: 52.0,
                protein: 0.3,
                carbs: 14.0,
                fat: 0.2,
            }
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(estimate("Chicken Breast", 1.0), estimate("chicken breast", 1.0));
        assert!(is_known("SALMON"));
    }

    #[test]
    fn test_no_fuzzy_matching() {
        // Substrings of known foods are not matched.
        assert!(!is_known("grilled chicken breast"));
        assert_eq!(estimate("grilled chicken breast", 1.0), DEFAULT_ESTIMATE);
    }

    #[test]
    fn test_unknown_food_scales_default() {
        let result = estimate("dragon fruit", 2.0);
        assert_eq!(result.calories, 200.0);
        assert_eq!(result.protein, 10.0);
        assert_eq!(result.carbs, 30.0);
        assert_eq!(result.fat, 6.0);
    }

    #[test]
    fn test_rounding() {
        let result = estimate("chicken breast", 1.5);
        assert_eq!(result.calories, 248.0); // 247.5 rounds up
        assert_eq!(result.protein, 46.5);
        assert_eq!(result.fat, 5.4);
    }

    #[test]
    fn test_estimate_is_linear_in_quantity() {
        for food in KNOWN_FOODS {
            for q in [0.5, 1.0, 1.5, 3.0] {
                let single = estimate(food.name, q);
                let double = estimate(food.name, 2.0 * q);
                assert!((double.calories - 2.0 * single.calories).abs() <= 1.5);
                assert!((double.protein - 2.0 * single.protein).abs() <= 0.16);
                assert!((double.carbs - 2.0 * single.carbs).abs() <= 0.16);
                assert!((double.fat - 2.0 * single.fat).abs() <= 0.16);
            }
        }
    }

    #[test]
    fn test_invalid_quantity_coerced_to_one() {
        let one = estimate("banana", 1.0);
        assert_eq!(estimate("banana", -3.0), one);
        assert_eq!(estimate("banana", f64::NAN), one);
        assert_eq!(estimate("banana", f64::INFINITY), one);
    }

    #[test]
    fn test_zero_quantity() {
        assert_eq!(estimate("banana", 0.0), NutritionEstimate::default());
    }

    #[test]
    fn test_unparsable_quantity_counts_as_one() {
        assert_eq!(estimate_from_input("rice", "lots"), estimate("rice", 1.0));
        assert_eq!(estimate_from_input("rice", " 2 "), estimate("rice", 2.0));
        assert_eq!(estimate_from_input("rice", ""), estimate("rice", 1.0));
    }

    #[test]
    fn test_estimate_is_idempotent() {
        assert_eq!(estimate("yogurt", 1.3), estimate("yogurt", 1.3));
    }
}
