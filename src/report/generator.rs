//! Markdown report generation.
//!
//! This module renders an [`Insights`] value as a Markdown document or as
//! pretty-printed JSON.

use crate::analysis::constants::NUTRIENT_RANGES;
use crate::models::{
    Adjustment, DailyTotals, GoalProjection, Imbalance, ImbalanceSummary, Insights, MacroTrend,
    MealPattern, MealTypeStats, NutritionTotals, ReportMetadata, Severity, TrendAnalysis,
    TrendReport, UserGoals, WeeklyCycle,
};
use anyhow::Result;

/// Optional sections of the Markdown report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub include_weekly_cycle: bool,
    pub include_adjustments: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_weekly_cycle: true,
            include_adjustments: true,
        }
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(insights: &Insights, options: ReportOptions) -> String {
    let mut output = String::new();

    output.push_str("# MealWise Insights Report\n\n");

    output.push_str(&generate_metadata_section(&insights.metadata));
    output.push_str(&generate_table_of_contents(insights, options));
    output.push_str(&generate_summary_section(insights));
    output.push_str(&generate_imbalances_section(&insights.imbalances));
    output.push_str(&generate_habits_section(
        &insights.meal_pattern,
        insights.food_diversity,
    ));

    if !insights.recent_progress.is_empty() {
        output.push_str(&generate_recent_progress_section(&insights.recent_progress));
    }

    if let Some(ref trends) = insights.trends {
        output.push_str(&generate_trends_section(trends));
        if options.include_weekly_cycle {
            output.push_str(&generate_weekly_cycle_section(&trends.weekly_cycle));
        }
    }

    if options.include_adjustments {
        output.push_str(&generate_adjustments_section(&insights.adjustments));
    }

    output.push_str(&generate_recommendations_section(&insights.recommendations));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **User:** {}\n", metadata.user_id));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Time Range:** {}\n", metadata.range));
    section.push_str(&format!(
        "- **Entries Analyzed:** {}\n",
        metadata.entries_analyzed
    ));
    section.push_str(&format!("- **Days Logged:** {}\n", metadata.days_logged));
    section.push('\n');

    section
}

fn generate_table_of_contents(insights: &Insights, options: ReportOptions) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Summary](#summary)\n");
    toc.push_str("- [Imbalances](#imbalances)\n");
    toc.push_str("- [Eating Habits](#eating-habits)\n");

    if !insights.recent_progress.is_empty() {
        toc.push_str("- [Recent Progress](#recent-progress)\n");
    }

    if insights.trends.is_some() {
        toc.push_str("- [Trends](#trends)\n");
        if options.include_weekly_cycle {
            toc.push_str("- [Weekly Cycle](#weekly-cycle)\n");
        }
    }

    if options.include_adjustments && !insights.adjustments.is_empty() {
        toc.push_str("- [Meal Adjustments](#meal-adjustments)\n");
    }

    if !insights.recommendations.is_empty() {
        toc.push_str("- [Recommendations](#recommendations)\n");
    }

    toc.push('\n');

    toc
}

/// Generate the summary section.
fn generate_summary_section(insights: &Insights) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str(&generate_severity_table(&insights.summary));
    section.push_str(&generate_intake_table(
        &insights.average_daily,
        &insights.totals,
        &insights.goals,
    ));

    section
}

fn generate_severity_table(summary: &ImbalanceSummary) -> String {
    let mut table = String::new();

    table.push_str("### Imbalance Severity Breakdown\n\n");
    table.push_str(&format!(
        "| {} High | {} Medium | {} Low | **Total** |\n",
        Severity::High.emoji(),
        Severity::Medium.emoji(),
        Severity::Low.emoji(),
    ));
    table.push_str("|:---:|:---:|:---:|:---:|\n");
    table.push_str(&format!(
        "| {} | {} | {} | **{}** |\n\n",
        summary.high, summary.medium, summary.low, summary.total
    ));

    table
}

fn generate_intake_table(
    average: &NutritionTotals,
    totals: &NutritionTotals,
    goals: &UserGoals,
) -> String {
    let mut table = String::new();

    table.push_str("### Daily Intake\n\n");
    table.push_str("| Nutrient | Daily Average | Goal | Period Total |\n");
    table.push_str("|:---|:---:|:---:|:---:|\n");

    let rows = [
        ("Calories (kcal)", average.calories, goals.calories, totals.calories),
        ("Protein (g)", average.protein, goals.protein, totals.protein),
        ("Carbs (g)", average.carbs, goals.carbs, totals.carbs),
        ("Fat (g)", average.fat, goals.fat, totals.fat),
    ];
    for (name, avg, goal, total) in rows {
        table.push_str(&format!("| {} | {} | {} | {:.1} |\n", name, avg, goal, total));
    }
    let fiber = NUTRIENT_RANGES.fiber_grams;
    table.push_str(&format!(
        "| Fiber (g) | {} | {}-{} | {:.1} |\n\n",
        average.fiber, fiber.min, fiber.max, totals.fiber
    ));

    table
}

/// Generate the imbalances section.
fn generate_imbalances_section(imbalances: &[Imbalance]) -> String {
    let mut section = String::new();

    section.push_str("## Imbalances\n\n");

    if imbalances.is_empty() {
        section.push_str("No nutrient imbalances detected. Great job! 🎉\n\n");
        return section;
    }

    for imbalance in imbalances {
        section.push_str(&generate_imbalance_block(imbalance));
    }

    section
}

/// Generate a single imbalance block.
fn generate_imbalance_block(imbalance: &Imbalance) -> String {
    let mut block = String::new();

    let severity_badge = match imbalance.severity {
        Severity::High => "🔴 **HIGH**",
        Severity::Medium => "🟡 **MEDIUM**",
        Severity::Low => "🟢 **LOW**",
    };

    block.push_str(&format!("### {} {}\n\n", severity_badge, imbalance.kind));
    block.push_str(&format!("{}\n\n", imbalance.message));

    if let Some(ref impact) = imbalance.impact {
        block.push_str(&format!("**Impact:** {}\n\n", impact));
    }

    push_list(&mut block, "Symptoms", &imbalance.symptoms);
    push_list(&mut block, "Solutions", &imbalance.solutions);
    push_list(&mut block, "Foods to try", &imbalance.foods);
    push_list(&mut block, "Examples", &imbalance.examples);

    if let Some(ref recommendation) = imbalance.recommendation {
        block.push_str(&format!("> 💡 **Recommendation:** {}\n\n", recommendation));
    }

    block.push_str("---\n\n");

    block
}

fn push_list(block: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    block.push_str(&format!("**{}:** {}\n\n", title, items.join(", ")));
}

fn generate_habits_section(pattern: &MealPattern, diversity: f64) -> String {
    let mut section = String::new();

    section.push_str("## Eating Habits\n\n");
    section.push_str(&format!("- **Meals Logged:** {}\n", pattern.total_meals));
    section.push_str(&format!(
        "- **Average Gap Between Meals:** {:.1}h\n",
        pattern.average_gap_hours
    ));
    section.push_str(&format!(
        "- **Gaps Over 4h:** {}\n",
        if pattern.gap_exceeds_4h { "yes" } else { "no" }
    ));
    section.push_str(&format!(
        "- **Food Diversity Score:** {:.0}%\n\n",
        diversity * 100.0
    ));

    section
}

/// Per-day totals for the latest entries, oldest day first.
fn generate_recent_progress_section(days: &[DailyTotals]) -> String {
    let mut section = String::new();

    section.push_str("## Recent Progress\n\n");
    section.push_str("| Date | Calories | Protein (g) | Carbs (g) | Fat (g) | Entries |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---:|:---:|\n");
    for day in days {
        section.push_str(&format!(
            "| {} | {:.0} | {:.1} | {:.1} | {:.1} | {} |\n",
            day.date, day.totals.calories, day.totals.protein, day.totals.carbs, day.totals.fat,
            day.entries
        ));
    }
    section.push('\n');

    section
}

/// Generate the trends section.
fn generate_trends_section(trends: &TrendAnalysis) -> String {
    let mut section = String::new();

    section.push_str("## Trends\n\n");

    match trends.calorie_trend {
        Some(ref trend) => section.push_str(&generate_calorie_trend(trend)),
        None => section.push_str("Not enough data for a calorie trend yet.\n\n"),
    }

    if !trends.macro_trends.is_empty() {
        section.push_str(&generate_macro_table(&trends.macro_trends));
    }

    if !trends.meal_type_patterns.is_empty() {
        section.push_str(&generate_meal_type_table(&trends.meal_type_patterns));
    }

    if let Some(ref projection) = trends.goal_progress {
        section.push_str(&generate_projection(projection));
    }

    section
}

fn generate_calorie_trend(trend: &TrendReport) -> String {
    let mut block = String::new();

    block.push_str("### Calories\n\n");
    block.push_str(&format!(
        "- **This Week:** {} kcal per entry\n",
        trend.current_average
    ));
    block.push_str(&format!(
        "- **Last Week:** {} kcal per entry\n",
        trend.previous_average
    ));
    block.push_str(&format!(
        "- **Change:** {:+} kcal ({})\n",
        trend.trend, trend.direction
    ));
    block.push_str(&format!("- **Next Week:** ~{} kcal\n", trend.prediction));
    block.push_str(&format!("- **Outlook:** {}\n\n", trend.goal_outlook));
    block.push_str(&format!("> 💡 {}\n\n", trend.recommendation));

    block
}

fn generate_macro_table(trends: &[MacroTrend]) -> String {
    let mut table = String::new();

    table.push_str("### Macros (last 7 days)\n\n");
    table.push_str("| Macro | Average | Goal | Deviation | Consistency | Suggestion |\n");
    table.push_str("|:---|:---:|:---:|:---:|:---:|:---|\n");

    for trend in trends {
        let deviation = trend
            .deviation_percent
            .map(|d| format!("{:+}%", d))
            .unwrap_or_else(|| "-".to_string());
        table.push_str(&format!(
            "| {} | {}g | {}g | {} | {} | {} |\n",
            trend.nutrient, trend.average, trend.goal, deviation, trend.consistency, trend.suggestion
        ));
    }
    table.push('\n');

    table
}

fn generate_meal_type_table(stats: &[MealTypeStats]) -> String {
    let mut table = String::new();

    table.push_str("### Meals\n\n");
    table.push_str("| Meal | Count | Avg Calories | Avg Time | Days |\n");
    table.push_str("|:---|:---:|:---:|:---:|:---:|\n");

    for stat in stats {
        let time = stat
            .average_hour
            .map(format_hour)
            .unwrap_or_else(|| "-".to_string());
        table.push_str(&format!(
            "| {} | {} | {} | {} | {:.0}% |\n",
            stat.meal_type,
            stat.count,
            stat.average_calories,
            time,
            stat.days_ratio * 100.0
        ));
    }
    table.push('\n');

    table
}

fn format_hour(hour: f64) -> String {
    let minutes = (hour * 60.0).round() as i64;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn generate_projection(projection: &GoalProjection) -> String {
    let mut block = String::new();

    block.push_str("### Goal Projection\n\n");
    block.push_str(&format!(
        "- **Weight:** {}kg → {}kg\n",
        projection.current_weight, projection.goal_weight
    ));
    block.push_str(&format!(
        "- **Expected Loss:** {}kg per week\n",
        projection.predicted_loss_per_week
    ));
    block.push_str(&format!(
        "- **Weeks to Goal:** {} (around {})\n",
        projection.weeks_to_goal,
        projection.expected_date.format("%Y-%m-%d")
    ));
    block.push_str(&format!("- **Confidence:** {:?}\n\n", projection.confidence));

    if !projection.milestones.is_empty() {
        block.push_str("| Milestone | To Lose | Weeks | Date | |\n");
        block.push_str("|:---|:---:|:---:|:---:|:---|\n");
        for milestone in &projection.milestones {
            block.push_str(&format!(
                "| {} | {}kg | {} | {} | {} |\n",
                milestone.label,
                milestone.kg_to_lose,
                milestone.weeks_to_reach,
                milestone.expected_date.format("%Y-%m-%d"),
                milestone.celebration
            ));
        }
        block.push('\n');
    }

    block
}

fn generate_weekly_cycle_section(cycle: &WeeklyCycle) -> String {
    let mut section = String::new();

    section.push_str("## Weekly Cycle\n\n");

    if cycle.days.is_empty() {
        section.push_str("No weekday data yet.\n\n");
        return section;
    }

    section.push_str("| Day | Avg Calories | Avg Protein | Entries | |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---:|\n");
    for day in &cycle.days {
        let marker = if day.is_high_day {
            "⬆️ high"
        } else if day.is_low_day {
            "⬇️ low"
        } else {
            ""
        };
        section.push_str(&format!(
            "| {} | {} | {}g | {} | {} |\n",
            day.day, day.average_calories, day.average_protein, day.entries, marker
        ));
    }
    section.push('\n');

    let effect = &cycle.weekend_effect;
    if effect.detected {
        section.push_str(&format!(
            "**Weekend effect:** weekend intake is {}% higher than weekdays.\n\n",
            effect.difference_percent.unwrap_or(0.0)
        ));
    }
    if let Some(ref suggestion) = effect.suggestion {
        section.push_str(&format!("> 💡 {}\n\n", suggestion));
    }

    section
}

fn generate_adjustments_section(adjustments: &[Adjustment]) -> String {
    if adjustments.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Meal Adjustments\n\n");
    section.push_str("For your most recent meal:\n\n");

    for adjustment in adjustments {
        section.push_str(&format!("- **{}**", adjustment.message));
        if let Some(ref suggestion) = adjustment.suggestion {
            section.push_str(&format!(": {}", suggestion));
        }
        section.push('\n');
        if !adjustment.examples.is_empty() {
            section.push_str(&format!("  - e.g. {}\n", adjustment.examples.join(", ")));
        }
        if let Some(ref tip) = adjustment.tip {
            section.push_str(&format!("  - {}\n", tip));
        }
    }
    section.push('\n');

    section
}

/// Generate the recommendations section.
fn generate_recommendations_section(recommendations: &[String]) -> String {
    if recommendations.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Recommendations\n\n");
    section.push_str("Based on today's intake:\n\n");

    for (i, rec) in recommendations.iter().enumerate() {
        section.push_str(&format!("{}. {}\n", i + 1, rec));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(
        "*Generated by MealWise. Estimates come from a small static food table and are approximate.*\n",
    );

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(insights: &Insights) -> Result<String> {
    serde_json::to_string_pretty(insights).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdjustmentKind, ImbalanceKind, TrendDirection};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn create_test_insights() -> Insights {
        let imbalances = vec![
            {
                let mut i = Imbalance::new(
                    ImbalanceKind::LowProtein,
                    Severity::High,
                    "Protein intake too low (0.6g/kg vs recommended 0.8g/kg)",
                );
                i.foods = vec!["eggs".to_string(), "tofu".to_string()];
                i
            },
            Imbalance::new(
                ImbalanceKind::LowFoodDiversity,
                Severity::Medium,
                "Low food variety score: 20%",
            ),
        ];

        Insights {
            metadata: ReportMetadata {
                user_id: "demo".to_string(),
                generated_at: Utc.with_ymd_and_hms(2026, 10, 20, 12, 0, 0).unwrap(),
                range: "7d".to_string(),
                entries_analyzed: 9,
                days_logged: 4,
            },
            goals: UserGoals::default(),
            totals: NutritionTotals {
                calories: 6000.0,
                protein: 160.0,
                carbs: 700.0,
                fat: 200.0,
                fiber: 40.0,
            },
            average_daily: NutritionTotals {
                calories: 1500.0,
                protein: 40.0,
                carbs: 175.0,
                fat: 50.0,
                fiber: 10.0,
            },
            summary: ImbalanceSummary::from_imbalances(&imbalances),
            imbalances,
            food_diversity: 0.2,
            meal_pattern: MealPattern {
                total_meals: 9,
                gap_exceeds_4h: true,
                average_gap_hours: 8.5,
            },
            recent_progress: vec![DailyTotals {
                date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
                totals: NutritionTotals {
                    calories: 1450.0,
                    protein: 38.5,
                    carbs: 170.0,
                    fat: 48.0,
                    fiber: 9.0,
                },
                entries: 3,
            }],
            trends: None,
            adjustments: vec![Adjustment::new(
                AdjustmentKind::AddComponents,
                "Add to your meal: vegetables",
            )],
            recommendations: vec!["Consider adding a healthy snack".to_string()],
        }
    }

    fn create_test_trends() -> TrendAnalysis {
        TrendAnalysis {
            calorie_trend: Some(TrendReport {
                current_average: 1800.0,
                previous_average: 2000.0,
                trend: -200.0,
                direction: TrendDirection::Decreasing,
                prediction: 400.0,
                days_to_goal: Some(1),
                goal_outlook: "At current rate, you'll reach goal in 1 days".to_string(),
                recommendation: "Calories stable. Continue monitoring.".to_string(),
            }),
            macro_trends: Vec::new(),
            meal_type_patterns: Vec::new(),
            weekly_cycle: WeeklyCycle::default(),
            goal_progress: None,
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let insights = create_test_insights();
        let markdown = generate_markdown_report(&insights, ReportOptions::default());

        assert!(markdown.contains("# MealWise Insights Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("## Imbalances"));
        assert!(markdown.contains("🔴 **HIGH** Low protein"));
        assert!(markdown.contains("**Foods to try:** eggs, tofu"));
        assert!(markdown.contains("## Meal Adjustments"));
        assert!(markdown.contains("## Recommendations"));
        assert!(!markdown.contains("## Trends"));
    }

    #[test]
    fn test_severity_table_counts() {
        let insights = create_test_insights();
        let table = generate_severity_table(&insights.summary);
        assert!(table.contains("| 1 | 1 | 0 | **2** |"));
    }

    #[test]
    fn test_no_imbalances_message() {
        let section = generate_imbalances_section(&[]);
        assert!(section.contains("No nutrient imbalances detected"));
    }

    #[test]
    fn test_optional_sections() {
        let mut insights = create_test_insights();
        insights.trends = Some(create_test_trends());

        let full = generate_markdown_report(&insights, ReportOptions::default());
        assert!(full.contains("## Trends"));
        assert!(full.contains("-200 kcal (decreasing)"));
        assert!(full.contains("## Weekly Cycle"));

        let trimmed = generate_markdown_report(
            &insights,
            ReportOptions {
                include_weekly_cycle: false,
                include_adjustments: false,
            },
        );
        assert!(!trimmed.contains("## Weekly Cycle"));
        assert!(!trimmed.contains("## Meal Adjustments"));
    }

    #[test]
    fn test_recent_progress_section() {
        let mut insights = create_test_insights();
        let markdown = generate_markdown_report(&insights, ReportOptions::default());
        assert!(markdown.contains("- [Recent Progress](#recent-progress)"));
        assert!(markdown.contains("| 2026-10-19 | 1450 | 38.5 | 170.0 | 48.0 | 3 |"));

        insights.recent_progress.clear();
        let markdown = generate_markdown_report(&insights, ReportOptions::default());
        assert!(!markdown.contains("Recent Progress"));
    }

    #[test]
    fn test_fiber_goal_range() {
        let insights = create_test_insights();
        let table =
            generate_intake_table(&insights.average_daily, &insights.totals, &insights.goals);
        assert!(table.contains("| Fiber (g) | 10 | 25-35 | 40.0 |"));
    }

    #[test]
    fn test_format_hour() {
        assert_eq!(format_hour(7.5), "07:30");
        assert_eq!(format_hour(12.0), "12:00");
    }

    #[test]
    fn test_generate_json_report() {
        let insights = create_test_insights();
        let json = generate_json_report(&insights).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"LOW_PROTEIN\""));
        assert!(json.contains("\"HIGH\""));
    }
}
