//! Insight orchestration for one user and one time range.

use crate::analysis::adjustment::MealAdjustmentEngine;
use crate::analysis::aggregator::{
    average_daily_intake, daily_totals, filter_by_time_range, period_totals, recent_progress,
    TimeRange,
};
use crate::analysis::constants::{DEFAULT_BODY_WEIGHT_KG, MIN_ENTRIES_FOR_TREND};
use crate::analysis::imbalance::{ImbalanceDetector, IntakeTotals};
use crate::analysis::meal_pattern::{analyze_meal_pattern, calculate_food_diversity};
use crate::analysis::recommendations::daily_recommendations;
use crate::analysis::stats::round_to;
use crate::analysis::trend::TrendPredictionEngine;
use crate::models::{FoodEntry, ImbalanceSummary, Insights, ReportMetadata, UserGoals};
use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, info};

/// Run every analysis over the entries inside `range`.
///
/// `today` holds the entries of the current local day and only feeds the
/// daily recommendations.
pub fn build_insights(
    user_id: &str,
    entries: &[FoodEntry],
    today: &[FoodEntry],
    goals: &UserGoals,
    range: TimeRange,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Insights {
    let history = filter_by_time_range(entries, range, now);
    info!(
        "Analyzing {} of {} entries for the last {}",
        history.len(),
        entries.len(),
        range
    );

    let totals = period_totals(&history);
    let days = daily_totals(&history, offset);

    let intake = IntakeTotals {
        total_protein: totals.protein,
        total_carbs: totals.carbs,
        total_fat: totals.fat,
        total_calories: totals.calories,
        weight: goals.weight.unwrap_or(DEFAULT_BODY_WEIGHT_KG),
    };
    let imbalances = ImbalanceDetector::new().detect_imbalances(&intake, &history);
    let summary = ImbalanceSummary::from_imbalances(&imbalances);

    let trends = if history.len() >= MIN_ENTRIES_FOR_TREND {
        Some(TrendPredictionEngine::new(now, offset).analyze_trends(&history, goals))
    } else {
        debug!("Not enough entries in range for trend analysis");
        None
    };

    let adjustments = history
        .iter()
        .max_by_key(|e| e.timestamp)
        .map(|latest| {
            MealAdjustmentEngine::new(offset).suggest_meal_adjustments(latest, goals, &imbalances)
        })
        .unwrap_or_default();

    let recommendations = daily_recommendations(&period_totals(today), Some(goals));

    Insights {
        metadata: ReportMetadata {
            user_id: user_id.to_string(),
            generated_at: now,
            range: range.to_string(),
            entries_analyzed: history.len(),
            days_logged: days.len(),
        },
        goals: goals.clone(),
        totals,
        average_daily: average_daily_intake(&days),
        summary,
        imbalances,
        food_diversity: round_to(calculate_food_diversity(&history), 2),
        meal_pattern: analyze_meal_pattern(&history),
        recent_progress: recent_progress(entries, offset),
        trends,
        adjustments,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregator::entries_on_day;
    use crate::models::{ImbalanceKind, MealType};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 20, 12, 0, 0).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn create_test_entry(days_ago: i64, name: &str, calories: f64) -> FoodEntry {
        FoodEntry {
            id: format!("{}-{}", days_ago, name),
            user_id: "u".to_string(),
            food_name: name.to_string(),
            quantity: 1.0,
            meal_type: MealType::Lunch,
            calories,
            protein: 10.0,
            carbs: 50.0,
            fat: 20.0,
            fiber: 2.0,
            timestamp: now() - Duration::days(days_ago) - Duration::hours(2),
        }
    }

    fn insights_for(entries: &[FoodEntry], range: TimeRange) -> Insights {
        let today = entries_on_day(entries, now().date_naive(), utc());
        build_insights("u", entries, &today, &UserGoals::default(), range, now(), utc())
    }

    #[test]
    fn test_empty_history() {
        let insights = insights_for(&[], TimeRange::Week);

        assert_eq!(insights.metadata.entries_analyzed, 0);
        assert_eq!(insights.totals.calories, 0.0);
        assert!(insights.trends.is_none());
        assert!(insights.adjustments.is_empty());
        assert_eq!(insights.food_diversity, 0.0);
        assert!(insights.recent_progress.is_empty());
        // Protein check still runs against the default body weight.
        assert_eq!(insights.imbalances[0].kind, ImbalanceKind::LowProtein);
        assert_eq!(insights.recommendations.len(), 2);
    }

    #[test]
    fn test_range_filters_history() {
        let entries = vec![
            create_test_entry(0, "rice", 500.0),
            create_test_entry(3, "pasta", 600.0),
            create_test_entry(20, "bread", 700.0),
        ];

        let week = insights_for(&entries, TimeRange::Week);
        assert_eq!(week.metadata.entries_analyzed, 2);
        assert_eq!(week.metadata.range, "7d");
        assert_eq!(week.totals.calories, 1100.0);
        assert_eq!(week.average_daily.calories, 550.0);

        let month = insights_for(&entries, TimeRange::Month);
        assert_eq!(month.metadata.entries_analyzed, 3);
    }

    #[test]
    fn test_trends_need_seven_entries() {
        let six: Vec<FoodEntry> = (0..6).map(|d| create_test_entry(d, "rice", 500.0)).collect();
        let insights = insights_for(&six, TimeRange::Week);
        assert!(insights.trends.is_none());

        let seven: Vec<FoodEntry> = (0..7).map(|d| create_test_entry(d, "rice", 500.0)).collect();
        let insights = insights_for(&seven, TimeRange::Week);
        let trends = insights.trends.expect("trends expected");
        assert!(trends.calorie_trend.is_some());
        assert_eq!(trends.weekly_cycle.days.len(), 7);
    }

    #[test]
    fn test_adjustments_for_latest_meal() {
        let entries = vec![
            create_test_entry(0, "toast", 300.0),
            create_test_entry(2, "spinach salad", 300.0),
        ];

        let insights = insights_for(&entries, TimeRange::Week);

        let add = &insights.adjustments[0];
        assert!(add.message.contains("vegetables"));
    }

    #[test]
    fn test_recommendations_cover_today_only() {
        let entries = vec![
            create_test_entry(0, "rice", 1900.0),
            create_test_entry(1, "rice", 100.0),
        ];

        let insights = insights_for(&entries, TimeRange::Week);

        // 1900 kcal today is above 80% of 2000, but 10g protein is low.
        assert_eq!(insights.recommendations.len(), 1);
        assert!(insights.recommendations[0].contains("protein"));
    }

    #[test]
    fn test_recommendations_use_given_today_entries() {
        let entries = vec![create_test_entry(0, "rice", 1900.0)];

        let insights = build_insights(
            "u",
            &entries,
            &[],
            &UserGoals::default(),
            TimeRange::Week,
            now(),
            utc(),
        );

        // Nothing passed for today, so both calorie and protein reminders show.
        assert_eq!(insights.recommendations.len(), 2);
    }

    #[test]
    fn test_recent_progress_ignores_range() {
        let entries = vec![
            create_test_entry(20, "bread", 700.0),
            create_test_entry(0, "rice", 500.0),
        ];

        let insights = insights_for(&entries, TimeRange::Week);

        assert_eq!(insights.metadata.entries_analyzed, 1);
        assert_eq!(insights.recent_progress.len(), 2);
        assert_eq!(insights.recent_progress[0].totals.calories, 700.0);
        assert_eq!(insights.recent_progress[1].entries, 1);
    }
}
