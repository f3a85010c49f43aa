//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::analysis::TimeRange;
use crate::models::{GoalType, MealType, Severity};
use clap::Parser;
use std::path::PathBuf;

/// MealWise - nutrition insights from your own meal log
///
/// Log meals, get ingredient swaps, and generate Markdown/JSON insight
/// reports with imbalance detection, trends and goal projections.
///
/// Examples:
///   mealwise --log "chicken breast" --quantity 1.5 --meal-type lunch
///   mealwise --range 30d --output insights.md
///   mealwise --swap "white bread"
///   mealwise --weight 82 --target-weight 76 --goal weight-loss
///   mealwise --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// JSON file holding logged entries and goals
    ///
    /// Created on first write. Can also be set via MEALWISE_STORE or .mealwise.toml.
    #[arg(short, long, value_name = "FILE", env = "MEALWISE_STORE")]
    pub store: Option<PathBuf>,

    /// User whose data to read and write
    #[arg(short, long, value_name = "ID", env = "MEALWISE_USER")]
    pub user: Option<String>,

    /// Time range to analyze
    #[arg(short, long, value_name = "RANGE")]
    pub range: Option<RangeArg>,

    /// Output file path for the report
    ///
    /// Falls back to the config file, then to mealwise_report.md.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .mealwise.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Current body weight in kg (saved with the user's goals)
    #[arg(long, value_name = "KG")]
    pub weight: Option<f64>,

    /// Target body weight in kg (saved with the user's goals)
    #[arg(long, value_name = "KG")]
    pub target_weight: Option<f64>,

    /// Weight goal (saved with the user's goals)
    #[arg(long, value_name = "GOAL")]
    pub goal: Option<GoalArg>,

    /// Log a food instead of generating a report
    ///
    /// Nutrition is estimated from a built-in table of common foods.
    #[arg(short, long, value_name = "FOOD", conflicts_with = "swap")]
    pub log: Option<String>,

    /// Quantity multiplier for --log (unparsable values count as 1)
    #[arg(long, default_value = "1", value_name = "Q", requires = "log")]
    pub quantity: String,

    /// Meal slot for --log
    #[arg(long, default_value = "snack", value_name = "TYPE", requires = "log")]
    pub meal_type: MealTypeArg,

    /// Suggest healthier swaps for a food item and exit
    #[arg(long, value_name = "ITEM")]
    pub swap: Option<String>,

    /// Fail if imbalances at or above this severity are found
    ///
    /// Useful in scripts. Exit code 2 when threshold is exceeded.
    /// Values: high, medium, low
    #[arg(long, value_name = "LEVEL")]
    pub fail_on: Option<FailOnLevel>,

    /// Minimum severity to include in the report
    ///
    /// Imbalances below this level are filtered out. Values: high, medium, low
    #[arg(long, value_name = "LEVEL")]
    pub min_severity: Option<FailOnLevel>,

    /// Generate a default .mealwise.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Severity level for --fail-on and --min-severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum FailOnLevel {
    Low,
    Medium,
    High,
}

impl From<FailOnLevel> for Severity {
    fn from(level: FailOnLevel) -> Self {
        match level {
            FailOnLevel::Low => Severity::Low,
            FailOnLevel::Medium => Severity::Medium,
            FailOnLevel::High => Severity::High,
        }
    }
}

/// Time range for --range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RangeArg {
    #[value(name = "7d")]
    Week,
    #[value(name = "30d")]
    Month,
    #[value(name = "90d")]
    Quarter,
}

impl From<RangeArg> for TimeRange {
    fn from(range: RangeArg) -> Self {
        match range {
            RangeArg::Week => TimeRange::Week,
            RangeArg::Month => TimeRange::Month,
            RangeArg::Quarter => TimeRange::Quarter,
        }
    }
}

/// Weight goal for --goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GoalArg {
    Maintenance,
    WeightLoss,
    WeightGain,
}

impl From<GoalArg> for GoalType {
    fn from(goal: GoalArg) -> Self {
        match goal {
            GoalArg::Maintenance => GoalType::Maintenance,
            GoalArg::WeightLoss => GoalType::WeightLoss,
            GoalArg::WeightGain => GoalType::WeightGain,
        }
    }
}

/// Meal slot for --meal-type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MealTypeArg {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl From<MealTypeArg> for MealType {
    fn from(meal_type: MealTypeArg) -> Self {
        match meal_type {
            MealTypeArg::Breakfast => MealType::Breakfast,
            MealTypeArg::Lunch => MealType::Lunch,
            MealTypeArg::Dinner => MealType::Dinner,
            MealTypeArg::Snack => MealType::Snack,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        for (flag, value) in [("--weight", self.weight), ("--target-weight", self.target_weight)] {
            if let Some(kg) = value {
                if !kg.is_finite() || kg <= 0.0 {
                    return Err(format!("{} must be a positive number of kg", flag));
                }
            }
        }

        if let Some(ref food) = self.log {
            if food.trim().is_empty() {
                return Err("Food name for --log cannot be empty".to_string());
            }
        }

        if let Ok(quantity) = self.quantity.trim().parse::<f64>() {
            if !quantity.is_finite() || quantity <= 0.0 {
                return Err("--quantity must be a positive number".to_string());
            }
        }

        if let Some(ref user) = self.user {
            if user.trim().is_empty() {
                return Err("User ID cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Whether any profile flag was given.
    pub fn has_profile_update(&self) -> bool {
        self.weight.is_some() || self.target_weight.is_some() || self.goal.is_some()
    }
}
