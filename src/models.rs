//! Data models for meal tracking and nutrition insights.
//!
//! This module contains the core records (logged food entries, user goals)
//! and every analytic result produced by the `analysis` modules.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Severity level of a nutrient imbalance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Worth knowing, e.g. meal timing.
    Low,
    /// Ratio or variety problems.
    Medium,
    /// Likely to affect health, e.g. too little protein.
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
        }
    }
}

impl Severity {
    /// Returns an emoji representation of the severity.
    pub fn emoji(&self) -> &'static str {
        match self {
            Severity::Low => "🟢",
            Severity::Medium => "🟡",
            Severity::High => "🔴",
        }
    }
}

/// Meal slot a food entry was logged under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// All meal types in day order.
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealType::Breakfast => write!(f, "Breakfast"),
            MealType::Lunch => write!(f, "Lunch"),
            MealType::Dinner => write!(f, "Dinner"),
            MealType::Snack => write!(f, "Snack"),
        }
    }
}

/// What the user is trying to achieve with their weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    #[default]
    Maintenance,
    WeightLoss,
    WeightGain,
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalType::Maintenance => write!(f, "Maintenance"),
            GoalType::WeightLoss => write!(f, "Weight loss"),
            GoalType::WeightGain => write!(f, "Weight gain"),
        }
    }
}

/// A single logged food or meal.
///
/// Entries are created once from an estimate and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    /// Opaque identifier.
    pub id: String,
    /// Owner of the entry.
    pub user_id: String,
    /// Free-text food name, also used as a lookup key.
    pub food_name: String,
    /// Multiplier applied to the base nutrition values.
    pub quantity: f64,
    /// Meal slot.
    pub meal_type: MealType,
    /// Energy in kcal.
    pub calories: f64,
    /// Protein in grams.
    pub protein: f64,
    /// Carbohydrates in grams.
    pub carbs: f64,
    /// Fat in grams.
    pub fat: f64,
    /// Fiber in grams (absent in older stored entries).
    #[serde(default)]
    pub fiber: f64,
    /// When the entry was logged.
    pub timestamp: DateTime<Utc>,
}

/// Daily nutrition targets plus optional body-weight goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGoals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// Current body weight in kg.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Target body weight in kg.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    #[serde(default)]
    pub goal: GoalType,
}

impl Default for UserGoals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            protein: 50.0,
            carbs: 250.0,
            fat: 70.0,
            weight: None,
            target_weight: None,
            goal: GoalType::Maintenance,
        }
    }
}

impl UserGoals {
    /// Target weight to project towards.
    ///
    /// Falls back to 90% of the current weight for weight loss, and to the
    /// current weight otherwise.
    pub fn effective_target_weight(&self) -> Option<f64> {
        match (self.target_weight, self.weight) {
            (Some(target), _) => Some(target),
            (None, Some(weight)) if self.goal == GoalType::WeightLoss => Some(weight * 0.9),
            (None, weight) => weight,
        }
    }
}

/// Summed nutrition values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

impl NutritionTotals {
    /// Nutrition contributed by a single entry.
    pub fn from_entry(entry: &FoodEntry) -> Self {
        Self {
            calories: entry.calories,
            protein: entry.protein,
            carbs: entry.carbs,
            fat: entry.fat,
            fiber: entry.fiber,
        }
    }
}

impl Add for NutritionTotals {
    type Output = NutritionTotals;

    fn add(self, other: NutritionTotals) -> NutritionTotals {
        NutritionTotals {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
            fiber: self.fiber + other.fiber,
        }
    }
}

impl AddAssign for NutritionTotals {
    fn add_assign(&mut self, other: NutritionTotals) {
        *self = *self + other;
    }
}

impl std::iter::Sum for NutritionTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutritionTotals::default(), |acc, n| acc + n)
    }
}

/// Totals for one local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub totals: NutritionTotals,
    /// Number of entries logged that day.
    pub entries: usize,
}

/// Kind of nutrient imbalance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImbalanceKind {
    LowProtein,
    HighCarbRatio,
    LowFat,
    IrregularMealTiming,
    LowFoodDiversity,
}

impl fmt::Display for ImbalanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImbalanceKind::LowProtein => write!(f, "Low protein"),
            ImbalanceKind::HighCarbRatio => write!(f, "High carb ratio"),
            ImbalanceKind::LowFat => write!(f, "Low fat"),
            ImbalanceKind::IrregularMealTiming => write!(f, "Irregular meal timing"),
            ImbalanceKind::LowFoodDiversity => write!(f, "Low food diversity"),
        }
    }
}

/// A flagged deviation of intake from a reference range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Imbalance {
    pub kind: ImbalanceKind,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub symptoms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub solutions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub foods: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

impl Imbalance {
    /// Creates an imbalance with no supporting lists.
    pub fn new(kind: ImbalanceKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            impact: None,
            recommendation: None,
            symptoms: Vec::new(),
            solutions: Vec::new(),
            foods: Vec::new(),
            examples: Vec::new(),
        }
    }
}

/// Count of imbalances per severity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImbalanceSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ImbalanceSummary {
    /// Creates a summary from a list of imbalances.
    pub fn from_imbalances(imbalances: &[Imbalance]) -> Self {
        let mut summary = Self {
            total: imbalances.len(),
            ..Self::default()
        };

        for imbalance in imbalances {
            match imbalance.severity {
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
        }

        summary
    }
}

/// Meal component that can be missing from a plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealComponent {
    Protein,
    Vegetables,
    Fiber,
}

impl fmt::Display for MealComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealComponent::Protein => write!(f, "protein"),
            MealComponent::Vegetables => write!(f, "vegetables"),
            MealComponent::Fiber => write!(f, "fiber"),
        }
    }
}

/// Kind of meal adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentKind {
    AddComponents,
    ReducePortion,
    TimingAdjustment,
    IncreaseProtein,
    BalanceCarbs,
    AddVariety,
}

/// A suggested change to a single meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub kind: AdjustmentKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    /// Free-form benefit or practical tip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
    /// Components flagged as missing (only for `AddComponents`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<MealComponent>,
}

impl Adjustment {
    pub fn new(kind: AdjustmentKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            suggestion: None,
            examples: Vec::new(),
            tip: None,
            missing: Vec::new(),
        }
    }
}

/// Category of an ingredient swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapCategory {
    HighCalorie,
    LowProtein,
    LowFiber,
}

/// A healthier replacement for a food item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swap {
    pub item: String,
    pub category: SwapCategory,
    pub healthy_options: Vec<String>,
    pub benefit: String,
    pub tip: String,
}

/// Direction of a calorie trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// Week-over-week calorie trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    /// Average kcal per entry over the last 7 days.
    pub current_average: f64,
    /// Average kcal per entry over the 7 days before that.
    pub previous_average: f64,
    /// `current_average - previous_average`.
    pub trend: f64,
    pub direction: TrendDirection,
    /// Extrapolated average 7 days ahead.
    pub prediction: f64,
    /// Days until the calorie goal is reached at the current rate.
    pub days_to_goal: Option<i64>,
    pub goal_outlook: String,
    pub recommendation: String,
}

/// Macronutrient tracked by the macro trend analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Macro {
    Protein,
    Carbs,
    Fat,
}

impl Macro {
    pub const ALL: [Macro; 3] = [Macro::Protein, Macro::Carbs, Macro::Fat];

    /// Value of this macro in a totals record.
    pub fn value_of(self, totals: &NutritionTotals) -> f64 {
        match self {
            Macro::Protein => totals.protein,
            Macro::Carbs => totals.carbs,
            Macro::Fat => totals.fat,
        }
    }

    /// Daily target for this macro.
    pub fn goal_of(self, goals: &UserGoals) -> f64 {
        match self {
            Macro::Protein => goals.protein,
            Macro::Carbs => goals.carbs,
            Macro::Fat => goals.fat,
        }
    }
}

impl fmt::Display for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Macro::Protein => write!(f, "protein"),
            Macro::Carbs => write!(f, "carbs"),
            Macro::Fat => write!(f, "fat"),
        }
    }
}

/// Day-to-day consistency label derived from the coefficient of variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Consistency {
    Consistent,
    Moderate,
    Variable,
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Consistency::Consistent => write!(f, "Consistent"),
            Consistency::Moderate => write!(f, "Moderate"),
            Consistency::Variable => write!(f, "Variable"),
        }
    }
}

/// Seven-day statistics for one macronutrient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroTrend {
    #[serde(rename = "macro")]
    pub nutrient: Macro,
    /// Mean daily intake in grams, rounded.
    pub average: f64,
    pub goal: f64,
    /// Signed percentage deviation from the goal.
    pub deviation_percent: Option<f64>,
    pub consistency: Consistency,
    /// Regression slope in grams per day.
    pub slope: f64,
    pub suggestion: String,
}

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn is_weekend(self) -> bool {
        matches!(self, DayOfWeek::Saturday | DayOfWeek::Sunday)
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Intake averages for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCycle {
    pub day: DayOfWeek,
    pub average_calories: f64,
    pub average_protein: f64,
    pub is_high_day: bool,
    pub is_low_day: bool,
    pub entries: usize,
}

/// Weekend versus weekday comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekendEffect {
    pub detected: bool,
    /// Percentage by which weekend intake exceeds weekday intake.
    pub difference_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Recurring day-of-week intake pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyCycle {
    /// Days with data, Monday first.
    pub days: Vec<DayCycle>,
    pub weekend_effect: WeekendEffect,
}

/// One intermediate step towards the weight goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Weight at the milestone, e.g. "78kg".
    pub label: String,
    pub kg_to_lose: f64,
    pub weeks_to_reach: i64,
    pub expected_date: NaiveDate,
    pub celebration: String,
}

/// How much logged data backs a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionConfidence {
    Low,
    Medium,
    High,
}

/// Projected time to reach the target weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProjection {
    pub current_weight: f64,
    pub goal_weight: f64,
    /// kg per week, two decimals.
    pub predicted_loss_per_week: f64,
    pub weeks_to_goal: i64,
    pub expected_date: NaiveDate,
    pub confidence: PredictionConfidence,
    pub milestones: Vec<Milestone>,
}

/// Timing gaps between logged meals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MealPattern {
    pub total_meals: usize,
    pub gap_exceeds_4h: bool,
    pub average_gap_hours: f64,
}

/// Habits for one meal slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealTypeStats {
    pub meal_type: MealType,
    pub count: usize,
    pub average_calories: f64,
    /// Mean local hour of day, one decimal.
    pub average_hour: Option<f64>,
    /// Share of logged days that include this meal.
    pub days_ratio: f64,
}

/// Everything the trend engine can say about a history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub calorie_trend: Option<TrendReport>,
    pub macro_trends: Vec<MacroTrend>,
    pub meal_type_patterns: Vec<MealTypeStats>,
    pub weekly_cycle: WeeklyCycle,
    pub goal_progress: Option<GoalProjection>,
}

/// Metadata about an insight report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub user_id: String,
    pub generated_at: DateTime<Utc>,
    /// Time range label, e.g. "7d".
    pub range: String,
    pub entries_analyzed: usize,
    pub days_logged: usize,
}

/// The complete insight report for one user and time range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insights {
    pub metadata: ReportMetadata,
    pub goals: UserGoals,
    pub totals: NutritionTotals,
    pub average_daily: NutritionTotals,
    pub imbalances: Vec<Imbalance>,
    pub summary: ImbalanceSummary,
    pub food_diversity: f64,
    pub meal_pattern: MealPattern,
    /// Per-day totals over the most recent entries.
    pub recent_progress: Vec<DailyTotals>,
    pub trends: Option<TrendAnalysis>,
    pub adjustments: Vec<Adjustment>,
    pub recommendations: Vec<String>,
}
