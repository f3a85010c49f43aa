//! Per-meal adjustments and ingredient swaps.
//!
//! All suggestions come from static templates; nothing here looks at the
//! wider history beyond the imbalances passed in.

use crate::models::{
    Adjustment, AdjustmentKind, FoodEntry, GoalType, Imbalance, ImbalanceKind, MealComponent,
    Swap, SwapCategory, UserGoals,
};
use chrono::{FixedOffset, Timelike};
use tracing::debug;

/// Below this many grams a meal is considered to lack protein.
const MIN_MEAL_PROTEIN: f64 = 15.0;

/// Below this many grams a meal is considered to lack fiber.
const MIN_MEAL_FIBER: f64 = 5.0;

/// Calorie ceiling for a single meal when losing weight.
const WEIGHT_LOSS_MEAL_LIMIT: f64 = 600.0;

/// Meals logged after this local hour count as late.
const LATE_MEAL_HOUR: u32 = 21;

const VEGETABLE_KEYWORDS: &[&str] = &["salad", "vegetable", "broccoli", "spinach", "carrot"];

/// A group of foods with healthier replacements.
struct SwapRule {
    category: SwapCategory,
    from: &'static [&'static str],
    to: &'static [&'static str],
    benefit: &'static str,
}

const SWAP_RULES: &[SwapRule] = &[
    SwapRule {
        category: SwapCategory::HighCalorie,
        from: &["white bread", "regular pasta", "fried foods", "sugary drinks"],
        to: &[
            "whole grain bread",
            "zucchini noodles",
            "grilled/baked",
            "water/herbal tea",
        ],
        benefit: "Saves ~150 calories",
    },
    SwapRule {
        category: SwapCategory::LowProtein,
        from: &["cereal alone", "plain salad", "fruit snack"],
        to: &["cereal + milk", "salad + chicken", "fruit + yogurt"],
        benefit: "Adds ~15g protein",
    },
    SwapRule {
        category: SwapCategory::LowFiber,
        from: &["white rice", "juice", "mashed potatoes"],
        to: &["brown rice/quinoa", "whole fruit", "sweet potato with skin"],
        benefit: "Adds ~5g fiber",
    },
];

const SWAP_TIP: &str = "Taste difference? Try gradually mixing with current choice";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn component_examples(component: MealComponent) -> &'static [&'static str] {
    match component {
        MealComponent::Protein => &[
            "chicken breast (31g protein)",
            "eggs (12g protein)",
            "lentils (9g protein)",
        ],
        MealComponent::Vegetables => &[
            "side salad (50 cal)",
            "steamed broccoli (30 cal)",
            "carrot sticks (25 cal)",
        ],
        MealComponent::Fiber => &[
            "apple with skin (4g fiber)",
            "chia seeds (10g fiber)",
            "beans (8g fiber)",
        ],
    }
}

/// Components the meal appears to lack.
pub fn missing_components(meal: &FoodEntry) -> Vec<MealComponent> {
    let mut missing = Vec::new();

    if meal.protein < MIN_MEAL_PROTEIN {
        missing.push(MealComponent::Protein);
    }

    let name = meal.food_name.to_lowercase();
    if !VEGETABLE_KEYWORDS.iter().any(|k| name.contains(k)) {
        missing.push(MealComponent::Vegetables);
    }

    if meal.fiber < MIN_MEAL_FIBER {
        missing.push(MealComponent::Fiber);
    }

    missing
}

/// Suggests changes to individual meals.
#[derive(Debug, Clone)]
pub struct MealAdjustmentEngine {
    offset: FixedOffset,
}

impl MealAdjustmentEngine {
    /// `offset` decides the local hour used for late-meal checks.
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Adjustments for one meal, given the user's goals and current imbalances.
    pub fn suggest_meal_adjustments(
        &self,
        meal: &FoodEntry,
        goals: &UserGoals,
        imbalances: &[Imbalance],
    ) -> Vec<Adjustment> {
        let mut adjustments = Vec::new();

        let missing = missing_components(meal);
        if !missing.is_empty() {
            let names: Vec<String> = missing.iter().map(|c| c.to_string()).collect();
            let mut adjustment = Adjustment::new(
                AdjustmentKind::AddComponents,
                format!("Add to your meal: {}", names.join(", ")),
            );
            adjustment.examples = missing
                .iter()
                .flat_map(|c| component_examples(*c).iter().map(|s| s.to_string()))
                .collect();
            adjustment.tip = Some("More balanced nutrition and sustained energy".to_string());
            adjustment.missing = missing;
            adjustments.push(adjustment);
        }

        if goals.goal == GoalType::WeightLoss && meal.calories > WEIGHT_LOSS_MEAL_LIMIT {
            let mut adjustment = Adjustment::new(
                AdjustmentKind::ReducePortion,
                "Consider smaller portion size for weight loss",
            );
            adjustment.suggestion = Some(format!(
                "Aim for 400-500 calories instead of {} calories",
                meal.calories
            ));
            adjustment.tip = Some("Use smaller plate, eat slowly, drink water first".to_string());
            adjustments.push(adjustment);
        }

        let local_hour = meal.timestamp.with_timezone(&self.offset).hour();
        if local_hour > LATE_MEAL_HOUR {
            let mut adjustment = Adjustment::new(
                AdjustmentKind::TimingAdjustment,
                "Eating late may affect sleep and digestion",
            );
            adjustment.suggestion = Some("Try eating dinner before 8 PM".to_string());
            adjustment.tip =
                Some("If hungry late, try herbal tea or small protein snack".to_string());
            adjustments.push(adjustment);
        }

        for imbalance in imbalances {
            match nutrient_adjustment(imbalance.kind, meal) {
                Some(adjustment) => adjustments.push(adjustment),
                None => debug!("No meal template for {}", imbalance.kind),
            }
        }

        adjustments
    }
}

fn nutrient_adjustment(kind: ImbalanceKind, meal: &FoodEntry) -> Option<Adjustment> {
    let adjustment = match kind {
        ImbalanceKind::LowProtein => {
            let mut a = Adjustment::new(
                AdjustmentKind::IncreaseProtein,
                format!("This meal has only {}g protein", meal.protein),
            );
            a.suggestion = Some("Add a protein source".to_string());
            a.examples = strings(&[
                "handful of nuts",
                "hard boiled egg",
                "scoop of protein powder",
            ]);
            a
        }
        ImbalanceKind::HighCarbRatio => {
            let mut a = Adjustment::new(AdjustmentKind::BalanceCarbs, "High carb meal detected");
            a.suggestion = Some("Add healthy fats or protein to slow digestion".to_string());
            a.examples = strings(&["Add avocado to sandwich", "Include nuts with pasta"]);
            a
        }
        ImbalanceKind::LowFoodDiversity => {
            let mut a = Adjustment::new(
                AdjustmentKind::AddVariety,
                "Try adding a different colored vegetable",
            );
            a.suggestion = Some("Add one new color to your plate".to_string());
            a.examples = strings(&[
                "Red (tomatoes)",
                "Purple (cabbage)",
                "Orange (sweet potato)",
                "Green (asparagus)",
            ]);
            a
        }
        ImbalanceKind::LowFat | ImbalanceKind::IrregularMealTiming => return None,
    };
    Some(adjustment)
}

/// Healthier alternatives for a food, from the first matching swap group.
pub fn generate_smart_swaps(item: &str) -> Option<Swap> {
    let name = item.to_lowercase();

    let rule = SWAP_RULES
        .iter()
        .find(|rule| rule.from.iter().any(|from| name.contains(from)))?;

    Some(Swap {
        item: item.to_string(),
        category: rule.category,
        healthy_options: strings(rule.to),
        benefit: rule.benefit.to_string(),
        tip: SWAP_TIP.to_string(),
    })
}
