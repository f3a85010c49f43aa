//! Nutrient imbalance detection.
//!
//! Checks run in a fixed order and each one appends independently; the
//! output is never re-sorted by severity.

use crate::analysis::constants::{NutrientRanges, MIN_DIVERSITY_SCORE};
use crate::analysis::meal_pattern::{analyze_meal_pattern, calculate_food_diversity};
use crate::models::{FoodEntry, Imbalance, ImbalanceKind, Severity};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Aggregate intake over the analysed period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeTotals {
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub total_calories: f64,
    /// Body weight in kg.
    pub weight: f64,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const LOW_PROTEIN_SYMPTOMS: &[&str] = &["fatigue", "muscle loss", "weak immune"];
const LOW_FAT_SYMPTOMS: &[&str] = &["dry skin", "hormone imbalance", "vitamin deficiency"];

/// Evaluates intake against fixed reference ranges.
#[derive(Debug, Clone, Default)]
pub struct ImbalanceDetector {
    ranges: NutrientRanges,
}

impl ImbalanceDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect imbalances for the given totals and meal history.
    pub fn detect_imbalances(&self, totals: &IntakeTotals, history: &[FoodEntry]) -> Vec<Imbalance> {
        let mut imbalances = Vec::new();

        if let Some(imbalance) = self.check_protein(totals) {
            imbalances.push(imbalance);
        }

        if totals.total_calories > 0.0 {
            let carb_ratio = totals.total_carbs / totals.total_calories;
            let fat_ratio = totals.total_fat / totals.total_calories;

            if carb_ratio > self.ranges.carb_ratio.max {
                imbalances.push(self.high_carb_ratio(carb_ratio));
            }
            if fat_ratio < self.ranges.fat_ratio.min {
                imbalances.push(self.low_fat(fat_ratio));
            }
        } else {
            debug!("Total calories are zero, skipping ratio checks");
        }

        if analyze_meal_pattern(history).gap_exceeds_4h {
            imbalances.push(irregular_timing());
        }

        let diversity = calculate_food_diversity(history);
        if diversity < MIN_DIVERSITY_SCORE {
            imbalances.push(low_diversity(diversity));
        }

        debug!("Detected {} imbalances", imbalances.len());
        imbalances
    }

    fn check_protein(&self, totals: &IntakeTotals) -> Option<Imbalance> {
        if totals.weight <= 0.0 {
            debug!("Body weight unknown, skipping protein check");
            return None;
        }

        let protein_per_kg = totals.total_protein / totals.weight;
        let min = self.ranges.protein_per_kg.min;
        if protein_per_kg >= min {
            return None;
        }

        let mut imbalance = Imbalance::new(
            ImbalanceKind::LowProtein,
            Severity::High,
            format!(
                "Protein intake too low ({:.1}g/kg vs recommended {:.1}g/kg)",
                protein_per_kg, min
            ),
        );
        imbalance.symptoms = strings(LOW_PROTEIN_SYMPTOMS);
        imbalance.solutions = strings(&[
            "Add lean meat",
            "Include eggs",
            "Try Greek yogurt",
            "Use protein powder",
        ]);
        imbalance.foods = strings(&["chicken breast", "eggs", "lentils", "tofu", "greek yogurt"]);
        Some(imbalance)
    }

    fn high_carb_ratio(&self, carb_ratio: f64) -> Imbalance {
        let mut imbalance = Imbalance::new(
            ImbalanceKind::HighCarbRatio,
            Severity::Medium,
            format!(
                "High carb ratio ({}% vs ideal {}%)",
                (carb_ratio * 100.0).round(),
                (self.ranges.carb_ratio.ideal * 100.0).round()
            ),
        );
        imbalance.impact = Some("May cause energy crashes and weight gain".to_string());
        imbalance.recommendation =
            Some("Replace some carbs with healthy fats or protein".to_string());
        imbalance.examples = strings(&["Swap rice for quinoa", "Add avocado instead of bread"]);
        imbalance
    }

    fn low_fat(&self, fat_ratio: f64) -> Imbalance {
        let mut imbalance = Imbalance::new(
            ImbalanceKind::LowFat,
            Severity::Medium,
            format!(
                "Low fat intake ({}% vs recommended {}%)",
                (fat_ratio * 100.0).round(),
                (self.ranges.fat_ratio.min * 100.0).round()
            ),
        );
        imbalance.symptoms = strings(LOW_FAT_SYMPTOMS);
        imbalance.solutions = strings(&["Add nuts/seeds", "Use olive oil", "Include fatty fish"]);
        imbalance.foods = strings(&["avocado", "salmon", "nuts", "olive oil", "chia seeds"]);
        imbalance
    }
}

fn irregular_timing() -> Imbalance {
    let mut imbalance = Imbalance::new(
        ImbalanceKind::IrregularMealTiming,
        Severity::Low,
        "Long gaps between meals detected",
    );
    imbalance.impact = Some("May cause overeating and energy dips".to_string());
    imbalance.recommendation = Some("Try eating every 3-4 hours".to_string());
    imbalance.examples = strings(&[
        "Breakfast: 8 AM",
        "Lunch: 12 PM",
        "Snack: 4 PM",
        "Dinner: 7 PM",
    ]);
    imbalance
}

fn low_diversity(score: f64) -> Imbalance {
    let mut imbalance = Imbalance::new(
        ImbalanceKind::LowFoodDiversity,
        Severity::Medium,
        format!("Low food variety score: {}%", (score * 100.0).round()),
    );
    imbalance.impact = Some("May miss essential nutrients and vitamins".to_string());
    imbalance.recommendation = Some(
        "Try incorporating more colorful vegetables and different protein sources".to_string(),
    );
    imbalance.examples = strings(&[
        "Red (tomatoes)",
        "Green (broccoli)",
        "Orange (carrots)",
        "Purple (eggplant)",
    ]);
    imbalance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MealType;
    use chrono::{Duration, TimeZone, Utc};

    fn create_test_entry(name: &str, hour: i64) -> FoodEntry {
        FoodEntry {
            id: format!("{}-{}", name, hour),
            user_id: "u".to_string(),
            food_name: name.to_string(),
            quantity: 1.0,
            meal_type: MealType::Lunch,
            calories: 300.0,
            protein: 20.0,
            carbs: 30.0,
            fat: 10.0,
            fiber: 2.0,
            timestamp: Utc.with_ymd_and_hms(2026, 10, 5, 6, 0, 0).unwrap() + Duration::hours(hour),
        }
    }

    /// Sixteen distinct foods across all categories, three hours apart.
    fn varied_history() -> Vec<FoodEntry> {
        [
            "chicken", "fish", "tofu", "broccoli", "spinach", "carrot", "apple", "banana",
            "orange", "rice", "bread", "pasta", "milk", "yogurt", "cheese", "oats",
        ]
        .iter()
        .enumerate()
        .map(|(i, name)| create_test_entry(name, i as i64 * 3))
        .collect()
    }

    fn kinds(imbalances: &[Imbalance]) -> Vec<ImbalanceKind> {
        imbalances.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_low_protein_detected() {
        let totals = IntakeTotals {
            total_protein: 40.0,
            total_carbs: 100.0,
            total_fat: 500.0,
            total_calories: 2000.0,
            weight: 70.0,
        };

        let imbalances = ImbalanceDetector::new().detect_imbalances(&totals, &varied_history());

        let low_protein = imbalances
            .iter()
            .find(|i| i.kind == ImbalanceKind::LowProtein)
            .expect("low protein expected");
        assert_eq!(low_protein.severity, Severity::High);
        assert!(low_protein.message.contains("0.6g/kg"));
        assert!(low_protein.message.contains("0.8g/kg"));
        assert!(!low_protein.foods.is_empty());
    }

    #[test]
    fn test_balanced_intake_has_no_imbalances() {
        let totals = IntakeTotals {
            total_protein: 100.0,
            total_carbs: 1000.0,
            total_fat: 500.0,
            total_calories: 2000.0,
            weight: 70.0,
        };

        let imbalances = ImbalanceDetector::new().detect_imbalances(&totals, &varied_history());
        assert!(imbalances.is_empty(), "unexpected: {:?}", kinds(&imbalances));
    }

    #[test]
    fn test_zero_calories_skips_ratio_checks() {
        let totals = IntakeTotals {
            total_protein: 100.0,
            total_carbs: 50.0,
            total_fat: 0.0,
            total_calories: 0.0,
            weight: 70.0,
        };

        let imbalances = ImbalanceDetector::new().detect_imbalances(&totals, &varied_history());
        let found = kinds(&imbalances);
        assert!(!found.contains(&ImbalanceKind::HighCarbRatio));
        assert!(!found.contains(&ImbalanceKind::LowFat));
        assert!(imbalances.iter().all(|i| !i.message.contains("NaN")));
    }

    #[test]
    fn test_zero_weight_skips_protein_check() {
        let totals = IntakeTotals {
            total_protein: 0.0,
            total_carbs: 1000.0,
            total_fat: 500.0,
            total_calories: 2000.0,
            weight: 0.0,
        };

        let imbalances = ImbalanceDetector::new().detect_imbalances(&totals, &varied_history());
        assert!(!kinds(&imbalances).contains(&ImbalanceKind::LowProtein));
    }

    #[test]
    fn test_fixed_output_order() {
        let totals = IntakeTotals {
            total_protein: 10.0,
            total_carbs: 1500.0,
            total_fat: 100.0,
            total_calories: 2000.0,
            weight: 70.0,
        };
        let history = vec![create_test_entry("steak", 0), create_test_entry("steak", 9)];

        let imbalances = ImbalanceDetector::new().detect_imbalances(&totals, &history);

        assert_eq!(
            kinds(&imbalances),
            vec![
                ImbalanceKind::LowProtein,
                ImbalanceKind::HighCarbRatio,
                ImbalanceKind::LowFat,
                ImbalanceKind::IrregularMealTiming,
                ImbalanceKind::LowFoodDiversity,
            ]
        );
        assert_eq!(imbalances[1].message, "High carb ratio (75% vs ideal 50%)");
        assert_eq!(imbalances[2].message, "Low fat intake (5% vs recommended 20%)");
        assert_eq!(imbalances[3].severity, Severity::Low);
        assert_eq!(imbalances[4].message, "Low food variety score: 4%");
    }

    #[test]
    fn test_detection_is_idempotent() {
        let totals = IntakeTotals {
            total_protein: 30.0,
            total_carbs: 300.0,
            total_fat: 60.0,
            total_calories: 1800.0,
            weight: 80.0,
        };
        let history = varied_history();
        let detector = ImbalanceDetector::new();
        assert_eq!(
            detector.detect_imbalances(&totals, &history),
            detector.detect_imbalances(&totals, &history)
        );
    }
}
