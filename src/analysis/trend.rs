//! Trend prediction over the logged history.
//!
//! The engine is pinned to an analysis instant and a local UTC offset at
//! construction so that every window and calendar question is reproducible.

use crate::analysis::aggregator::daily_totals;
use crate::analysis::constants::{
    CALORIES_PER_KG, CONSISTENT_CV, DAY_DEVIATION_RATIO, MEDIUM_WINDOW_DAYS, MILESTONE_COUNT,
    MIN_DAYS_FOR_MACRO_TREND, MIN_ENTRIES_FOR_PROJECTION, MIN_ENTRIES_FOR_TREND, MODERATE_CV,
    SHORT_WINDOW_DAYS, TREND_THRESHOLD_KCAL, WEEKEND_EFFECT_RATIO,
};
use crate::analysis::meal_pattern::meal_type_patterns;
use crate::analysis::stats::{
    coefficient_of_variation, linear_projection, linear_slope, mean, round_to,
};
use crate::models::{
    Consistency, DayCycle, DayOfWeek, FoodEntry, GoalProjection, GoalType, Macro, MacroTrend,
    Milestone, PredictionConfidence, TrendAnalysis, TrendDirection, TrendReport, UserGoals,
    WeekendEffect, WeeklyCycle,
};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Builds calorie, macro, weekly and goal projections.
#[derive(Debug, Clone)]
pub struct TrendPredictionEngine {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl TrendPredictionEngine {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Everything the engine can compute for a history.
    pub fn analyze_trends(&self, history: &[FoodEntry], goals: &UserGoals) -> TrendAnalysis {
        TrendAnalysis {
            calorie_trend: self.predict_calorie_trend(history, goals),
            macro_trends: self.predict_macro_trends(history, goals),
            meal_type_patterns: meal_type_patterns(history, self.offset),
            weekly_cycle: self.detect_weekly_cycles(history),
            goal_progress: self.predict_goal_progress(history, goals),
        }
    }

    /// Entries with `now - from_days_ago < timestamp <= now - to_days_ago`.
    fn window(&self, history: &[FoodEntry], from_days_ago: i64, to_days_ago: i64) -> Vec<FoodEntry> {
        let start = self.now - Duration::days(from_days_ago);
        let end = self.now - Duration::days(to_days_ago);
        history
            .iter()
            .filter(|e| e.timestamp > start && e.timestamp <= end)
            .cloned()
            .collect()
    }

    /// Week-over-week calorie trend, `None` below seven entries.
    pub fn predict_calorie_trend(
        &self,
        history: &[FoodEntry],
        goals: &UserGoals,
    ) -> Option<TrendReport> {
        if history.len() < MIN_ENTRIES_FOR_TREND {
            debug!(
                "Only {} entries, need {} for a calorie trend",
                history.len(),
                MIN_ENTRIES_FOR_TREND
            );
            return None;
        }

        let current = self.window(history, SHORT_WINDOW_DAYS, 0);
        let previous = self.window(history, 2 * SHORT_WINDOW_DAYS, SHORT_WINDOW_DAYS);

        let current_average = average_calories(&current);
        let previous_average = average_calories(&previous);
        let trend = current_average - previous_average;

        let direction = if trend > TREND_THRESHOLD_KCAL {
            TrendDirection::Increasing
        } else if trend < -TREND_THRESHOLD_KCAL {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        };

        let prediction = linear_projection(
            &[previous_average, current_average],
            SHORT_WINDOW_DAYS as f64,
        )
        .unwrap_or(current_average);

        let distance_to_goal = goals.calories - prediction;
        let (days_to_goal, goal_outlook) = if distance_to_goal <= 0.0 {
            (None, "On track with goal".to_string())
        } else if trend.abs() < f64::EPSILON {
            (
                None,
                "Calories are flat, cannot estimate time to goal".to_string(),
            )
        } else {
            let days = ((goals.calories - current_average).abs() / trend.abs()).round() as i64;
            (
                Some(days),
                format!("At current rate, you'll reach goal in {} days", days),
            )
        };

        Some(TrendReport {
            current_average: current_average.round(),
            previous_average: previous_average.round(),
            trend: trend.round(),
            direction,
            prediction: prediction.round(),
            days_to_goal,
            goal_outlook,
            recommendation: calorie_recommendation(trend, goals.goal),
        })
    }

    /// Seven-day statistics per macro from daily totals.
    ///
    /// Empty when fewer than three days were logged in the window.
    pub fn predict_macro_trends(&self, history: &[FoodEntry], goals: &UserGoals) -> Vec<MacroTrend> {
        let recent = self.window(history, SHORT_WINDOW_DAYS, 0);
        let days = daily_totals(&recent, self.offset);

        if days.len() < MIN_DAYS_FOR_MACRO_TREND {
            debug!(
                "Only {} days logged this week, need {} for macro trends",
                days.len(),
                MIN_DAYS_FOR_MACRO_TREND
            );
            return Vec::new();
        }

        Macro::ALL
            .iter()
            .filter_map(|nutrient| {
                let values: Vec<f64> = days.iter().map(|d| nutrient.value_of(&d.totals)).collect();
                let average = mean(&values)?;
                let goal = nutrient.goal_of(goals);

                let deviation_percent = if goal > 0.0 {
                    Some(((average - goal) / goal * 100.0).round())
                } else {
                    None
                };

                // A zero mean only happens when every day is zero.
                let consistency = match coefficient_of_variation(&values) {
                    Some(cv) if cv >= MODERATE_CV => Consistency::Variable,
                    Some(cv) if cv >= CONSISTENT_CV => Consistency::Moderate,
                    _ => Consistency::Consistent,
                };

                Some(MacroTrend {
                    nutrient: *nutrient,
                    average: average.round(),
                    goal,
                    deviation_percent,
                    consistency,
                    slope: round_to(linear_slope(&values).unwrap_or(0.0), 2),
                    suggestion: macro_suggestion(*nutrient, deviation_percent),
                })
            })
            .collect()
    }

    /// Day-of-week averages and the weekend effect.
    pub fn detect_weekly_cycles(&self, history: &[FoodEntry]) -> WeeklyCycle {
        let mut by_day: BTreeMap<DayOfWeek, Vec<&FoodEntry>> = BTreeMap::new();
        for entry in history {
            let weekday = entry.timestamp.with_timezone(&self.offset).weekday();
            by_day.entry(DayOfWeek::from(weekday)).or_default().push(entry);
        }

        let overall = mean(&history.iter().map(|e| e.calories).collect::<Vec<_>>()).unwrap_or(0.0);

        let days: Vec<DayCycle> = DayOfWeek::ALL
            .iter()
            .filter_map(|day| {
                let entries = by_day.get(day)?;
                let calories: Vec<f64> = entries.iter().map(|e| e.calories).collect();
                let protein: Vec<f64> = entries.iter().map(|e| e.protein).collect();
                let average_calories = mean(&calories)?;

                Some(DayCycle {
                    day: *day,
                    average_calories: average_calories.round(),
                    average_protein: mean(&protein).unwrap_or(0.0).round(),
                    is_high_day: average_calories > overall * (1.0 + DAY_DEVIATION_RATIO),
                    is_low_day: average_calories < overall * (1.0 - DAY_DEVIATION_RATIO),
                    entries: entries.len(),
                })
            })
            .collect();

        let weekday: Vec<f64> = days
            .iter()
            .filter(|d| !d.day.is_weekend() && d.average_calories > 0.0)
            .map(|d| d.average_calories)
            .collect();
        let weekend: Vec<f64> = days
            .iter()
            .filter(|d| d.day.is_weekend() && d.average_calories > 0.0)
            .map(|d| d.average_calories)
            .collect();

        let weekend_effect = match (mean(&weekday), mean(&weekend)) {
            (Some(weekday_avg), Some(weekend_avg)) if weekday_avg > 0.0 => {
                let detected = weekend_avg > weekday_avg * (1.0 + WEEKEND_EFFECT_RATIO);
                WeekendEffect {
                    detected,
                    difference_percent: Some(
                        ((weekend_avg - weekday_avg) / weekday_avg * 100.0).round(),
                    ),
                    suggestion: detected.then(|| {
                        "Weekend eating is higher. Try planning one healthy weekend meal."
                            .to_string()
                    }),
                }
            }
            _ => WeekendEffect::default(),
        };

        WeeklyCycle {
            days,
            weekend_effect,
        }
    }

    /// Weeks until the target weight at the current calorie deficit.
    pub fn predict_goal_progress(
        &self,
        history: &[FoodEntry],
        goals: &UserGoals,
    ) -> Option<GoalProjection> {
        let recent = self.window(history, MEDIUM_WINDOW_DAYS, 0);
        if recent.len() < MIN_ENTRIES_FOR_PROJECTION {
            debug!(
                "Only {} entries in the last {} days, need {} for a projection",
                recent.len(),
                MEDIUM_WINDOW_DAYS,
                MIN_ENTRIES_FOR_PROJECTION
            );
            return None;
        }

        let current_weight = goals.weight?;
        let goal_weight = goals.effective_target_weight()?;
        if goal_weight >= current_weight {
            debug!("Target weight is not below current weight, nothing to project");
            return None;
        }

        let days = daily_totals(&recent, self.offset);
        let daily_calories: Vec<f64> = days.iter().map(|d| d.totals.calories).collect();
        let deficit = goals.calories - mean(&daily_calories)?;
        if deficit <= 0.0 {
            debug!("No calorie deficit ({:.0} kcal), nothing to project", deficit);
            return None;
        }

        let kg_per_week = deficit * 7.0 / CALORIES_PER_KG;
        if !kg_per_week.is_finite() || kg_per_week <= 0.0 {
            return None;
        }

        let weeks_to_goal = (current_weight - goal_weight) / kg_per_week;
        let Some(expected_date) = self.date_after_weeks(weeks_to_goal) else {
            debug!(
                "Goal is {:.0} weeks away at {:.4} kg/week, past the last representable date",
                weeks_to_goal, kg_per_week
            );
            return None;
        };

        Some(GoalProjection {
            current_weight,
            goal_weight,
            predicted_loss_per_week: round_to(kg_per_week, 2),
            weeks_to_goal: weeks_to_goal.round() as i64,
            expected_date,
            confidence: self.prediction_confidence(&days.iter().map(|d| d.date).collect()),
            milestones: self.milestones(current_weight, goal_weight, kg_per_week)?,
        })
    }

    /// Local date `weeks` from now, or `None` outside the calendar range.
    fn date_after_weeks(&self, weeks: f64) -> Option<NaiveDate> {
        if !weeks.is_finite() {
            return None;
        }
        let delta = Duration::try_days((weeks * 7.0).round() as i64)?;
        let date = self.now.checked_add_signed(delta)?;
        Some(date.with_timezone(&self.offset).date_naive())
    }

    /// Share of the last 30 days that have at least one entry.
    fn prediction_confidence(&self, logged_days: &BTreeSet<NaiveDate>) -> PredictionConfidence {
        let ratio = logged_days.len() as f64 / MEDIUM_WINDOW_DAYS as f64;
        if ratio < 0.5 {
            PredictionConfidence::Low
        } else if ratio < 0.8 {
            PredictionConfidence::Medium
        } else {
            PredictionConfidence::High
        }
    }

    fn milestones(&self, current: f64, goal: f64, kg_per_week: f64) -> Option<Vec<Milestone>> {
        let total = current - goal;
        let step = (total / MILESTONE_COUNT).floor().max(1.0);

        let mut milestones = Vec::new();
        let mut i = 1;
        while i as f64 * step <= total {
            let kg_to_lose = i as f64 * step;
            let weeks = kg_to_lose / kg_per_week;
            milestones.push(Milestone {
                label: format!("{}kg", round_to(current - kg_to_lose, 1)),
                kg_to_lose,
                weeks_to_reach: weeks.round() as i64,
                expected_date: self.date_after_weeks(weeks)?,
                celebration: if i == 1 {
                    "First milestone!".to_string()
                } else {
                    format!("Milestone {}", i)
                },
            });
            i += 1;
        }
        Some(milestones)
    }
}

fn average_calories(entries: &[FoodEntry]) -> f64 {
    mean(&entries.iter().map(|e| e.calories).collect::<Vec<_>>()).unwrap_or(0.0)
}

fn calorie_recommendation(trend: f64, goal: GoalType) -> String {
    let message = match goal {
        GoalType::WeightLoss if trend > TREND_THRESHOLD_KCAL => {
            "Calories trending up. For weight loss, aim to reverse this trend."
        }
        GoalType::WeightLoss if trend < -TREND_THRESHOLD_KCAL => {
            "Good progress! Calories trending down."
        }
        GoalType::WeightGain if trend < -TREND_THRESHOLD_KCAL => {
            "Calories trending down. For weight gain, aim to reverse this trend."
        }
        GoalType::WeightGain if trend > TREND_THRESHOLD_KCAL => {
            "Good progress! Calories trending up."
        }
        _ => "Calories stable. Continue monitoring.",
    };
    message.to_string()
}

fn macro_suggestion(nutrient: Macro, deviation_percent: Option<f64>) -> String {
    match deviation_percent {
        None => format!("Set a {} goal to track this macro", nutrient),
        Some(d) if d < -20.0 => format!("Increase {} intake, {}% below goal", nutrient, -d),
        Some(d) if d > 20.0 => format!("Reduce {} intake, {}% above goal", nutrient, d),
        Some(_) => format!("{} intake is on target", capitalize(&nutrient.to_string())),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
