//! Progress aggregation over logged entries.
//!
//! This module groups raw entries into per-day totals and computes period
//! totals and averages used by the charts and the other analytics.

use crate::analysis::constants::{LONG_WINDOW_DAYS, MEDIUM_WINDOW_DAYS, SHORT_WINDOW_DAYS};
use crate::analysis::stats::round_to;
use crate::models::{DailyTotals, FoodEntry, NutritionTotals};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of most recent entries shown on the progress chart.
const RECENT_ENTRY_COUNT: usize = 7;

/// Look-back window for insights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl TimeRange {
    pub fn days(self) -> i64 {
        match self {
            TimeRange::Week => SHORT_WINDOW_DAYS,
            TimeRange::Month => MEDIUM_WINDOW_DAYS,
            TimeRange::Quarter => LONG_WINDOW_DAYS,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.days())
    }
}

/// Sum of all entries.
pub fn period_totals(entries: &[FoodEntry]) -> NutritionTotals {
    entries.iter().map(NutritionTotals::from_entry).sum()
}

/// Group entries by local calendar day, oldest day first.
pub fn daily_totals(entries: &[FoodEntry], offset: FixedOffset) -> Vec<DailyTotals> {
    let mut grouped: BTreeMap<NaiveDate, (NutritionTotals, usize)> = BTreeMap::new();

    for entry in entries {
        let date = entry.timestamp.with_timezone(&offset).date_naive();
        let slot = grouped.entry(date).or_default();
        slot.0 += NutritionTotals::from_entry(entry);
        slot.1 += 1;
    }

    grouped
        .into_iter()
        .map(|(date, (totals, count))| DailyTotals {
            date,
            totals,
            entries: count,
        })
        .collect()
}

/// Daily totals over the most recently inserted entries.
///
/// The window is entry-based, not date-based: it covers the last seven
/// entries in insertion order.
pub fn recent_progress(entries: &[FoodEntry], offset: FixedOffset) -> Vec<DailyTotals> {
    let start = entries.len().saturating_sub(RECENT_ENTRY_COUNT);
    daily_totals(&entries[start..], offset)
}

/// Mean intake per logged day, rounded to whole units.
pub fn average_daily_intake(days: &[DailyTotals]) -> NutritionTotals {
    let count = days.len().max(1) as f64;
    let total: NutritionTotals = days.iter().map(|d| d.totals).sum();

    NutritionTotals {
        calories: (total.calories / count).round(),
        protein: (total.protein / count).round(),
        carbs: (total.carbs / count).round(),
        fat: (total.fat / count).round(),
        fiber: round_to(total.fiber / count, 1),
    }
}

/// Entries logged within the time range ending at `now`.
pub fn filter_by_time_range(
    entries: &[FoodEntry],
    range: TimeRange,
    now: DateTime<Utc>,
) -> Vec<FoodEntry> {
    let cutoff = now - Duration::days(range.days());
    entries
        .iter()
        .filter(|e| e.timestamp >= cutoff)
        .cloned()
        .collect()
}

/// Entries logged on the given local calendar day.
pub fn entries_on_day(entries: &[FoodEntry], day: NaiveDate, offset: FixedOffset) -> Vec<FoodEntry> {
    entries
        .iter()
        .filter(|e| e.timestamp.with_timezone(&offset).date_naive() == day)
        .cloned()
        .collect()
}
