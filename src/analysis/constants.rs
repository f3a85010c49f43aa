//! Fixed reference values used by the analytics.
//!
//! None of these are user-configurable; they are compiled in.

/// A reference range with an ideal point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceRange {
    pub min: f64,
    pub max: f64,
    pub ideal: f64,
}

/// Nutrient reference ranges (Dietary Reference Intakes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientRanges {
    /// Grams of protein per kg of body weight.
    pub protein_per_kg: ReferenceRange,
    /// Carbohydrates relative to total calories.
    pub carb_ratio: ReferenceRange,
    /// Fat relative to total calories.
    pub fat_ratio: ReferenceRange,
    /// Grams of fiber per day.
    pub fiber_grams: ReferenceRange,
}

pub const NUTRIENT_RANGES: NutrientRanges = NutrientRanges {
    protein_per_kg: ReferenceRange {
        min: 0.8,
        max: 2.0,
        ideal: 1.2,
    },
    carb_ratio: ReferenceRange {
        min: 0.45,
        max: 0.65,
        ideal: 0.5,
    },
    fat_ratio: ReferenceRange {
        min: 0.20,
        max: 0.35,
        ideal: 0.3,
    },
    fiber_grams: ReferenceRange {
        min: 25.0,
        max: 35.0,
        ideal: 30.0,
    },
};

impl Default for NutrientRanges {
    fn default() -> Self {
        NUTRIENT_RANGES
    }
}

/// Gap between consecutive meals that counts as irregular.
pub const MAX_MEAL_GAP_HOURS: f64 = 4.0;

/// Diversity score below which variety is flagged.
pub const MIN_DIVERSITY_SCORE: f64 = 0.6;

/// Distinct foods expected in a healthy week.
pub const EXPECTED_UNIQUE_FOODS: f64 = 15.0;

/// Number of food categories a varied diet should cover.
pub const EXPECTED_CATEGORIES: f64 = 5.0;

pub const UNIQUE_FOODS_WEIGHT: f64 = 0.6;
pub const CATEGORY_WEIGHT: f64 = 0.4;

/// Week-over-week change (kcal/day) that counts as a trend. Tunable.
pub const TREND_THRESHOLD_KCAL: f64 = 50.0;

/// Days per trend window.
pub const SHORT_WINDOW_DAYS: i64 = 7;
/// Window used for goal projection.
pub const MEDIUM_WINDOW_DAYS: i64 = 30;
pub const LONG_WINDOW_DAYS: i64 = 90;

/// Entries needed before a calorie trend is reported.
pub const MIN_ENTRIES_FOR_TREND: usize = 7;
/// Daily data points needed per macro.
pub const MIN_DAYS_FOR_MACRO_TREND: usize = 3;
/// Entries in the last 30 days needed for goal projection.
pub const MIN_ENTRIES_FOR_PROJECTION: usize = 14;

/// Day average above/below overall average by this fraction is high/low.
pub const DAY_DEVIATION_RATIO: f64 = 0.10;
/// Weekend must exceed weekdays by this fraction to count as an effect.
pub const WEEKEND_EFFECT_RATIO: f64 = 0.15;

/// Energy in one kg of body fat.
pub const CALORIES_PER_KG: f64 = 7700.0;

/// Number of milestones a weight goal is split into.
pub const MILESTONE_COUNT: f64 = 5.0;

/// Body weight assumed when the user has not entered one.
pub const DEFAULT_BODY_WEIGHT_KG: f64 = 70.0;

/// Coefficient-of-variation thresholds for macro consistency.
pub const CONSISTENT_CV: f64 = 0.2;
pub const MODERATE_CV: f64 = 0.4;
