//! Short advice for the current day's intake.

use crate::models::{NutritionTotals, UserGoals};

const LOW_CALORIE_RATIO: f64 = 0.8;
const LOW_PROTEIN_RATIO: f64 = 0.7;
const HIGH_CARB_RATIO: f64 = 1.2;
const HIGH_FAT_RATIO: f64 = 1.3;

/// Compare today's totals against goals, falling back to default goals.
///
/// Always returns at least one message.
pub fn daily_recommendations(current: &NutritionTotals, goals: Option<&UserGoals>) -> Vec<String> {
    let defaults = UserGoals::default();
    let goals = goals.unwrap_or(&defaults);
    let mut recommendations = Vec::new();

    if current.calories < goals.calories * LOW_CALORIE_RATIO {
        recommendations.push("Consider adding a healthy snack to meet your calorie goals");
    }

    if current.protein < goals.protein * LOW_PROTEIN_RATIO {
        recommendations.push(
            "Your protein intake is low. Add lean protein sources like chicken, fish, or legumes",
        );
    }

    if current.carbs > goals.carbs * HIGH_CARB_RATIO {
        recommendations.push(
            "Your carb intake is high. Consider balancing with more protein and vegetables",
        );
    }

    if current.fat > goals.fat * HIGH_FAT_RATIO {
        recommendations.push(
            "Monitor your fat intake. Try incorporating more lean proteins and vegetables",
        );
    }

    if recommendations.is_empty() {
        recommendations.push("Great job! Your nutrition is well balanced. Keep it up!");
    }

    recommendations.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(calories: f64, protein: f64, carbs: f64, fat: f64) -> NutritionTotals {
        NutritionTotals {
            calories,
            protein,
            carbs,
            fat,
            fiber: 0.0,
        }
    }

    #[test]
    fn test_balanced_day() {
        let recs = daily_recommendations(&totals(1900.0, 50.0, 250.0, 70.0), None);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("well balanced"));
    }

    #[test]
    fn test_empty_day_uses_default_goals() {
        let recs = daily_recommendations(&NutritionTotals::default(), None);
        assert_eq!(recs.len(), 2);
        assert!(recs[0].contains("healthy snack"));
        assert!(recs[1].contains("protein intake is low"));
    }

    #[test]
    fn test_excess_carbs_and_fat() {
        let goals = UserGoals::default();
        let recs = daily_recommendations(&totals(2600.0, 80.0, 320.0, 100.0), Some(&goals));
        assert_eq!(recs.len(), 2);
        assert!(recs[0].contains("carb intake is high"));
        assert!(recs[1].contains("fat intake"));
    }

    #[test]
    fn test_thresholds_are_strict() {
        // Exactly 80% calories and 70% protein do not trigger advice.
        let recs = daily_recommendations(&totals(1600.0, 35.0, 300.0, 90.0), None);
        assert_eq!(recs, vec!["Great job! Your nutrition is well balanced. Keep it up!"]);
    }
}
