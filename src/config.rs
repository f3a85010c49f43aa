//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.mealwise.toml` files.

use crate::analysis::TimeRange;
use crate::models::{GoalType, UserGoals};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".mealwise.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Body profile overrides.
    #[serde(default)]
    pub profile: ProfileConfig,

    /// Goals used for users without stored goals.
    #[serde(default)]
    pub goals: GoalsConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// JSON store file.
    #[serde(default = "default_store")]
    pub store: String,

    /// User to read and write.
    #[serde(default = "default_user")]
    pub user: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            store: default_store(),
            user: default_user(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "mealwise_report.md".to_string()
}

fn default_store() -> String {
    "mealwise_store.json".to_string()
}

fn default_user() -> String {
    "default".to_string()
}

/// Body profile. Set values replace the stored ones for analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Current body weight in kg.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Target body weight in kg.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<GoalType>,
}

impl ProfileConfig {
    /// Overwrite the profile fields of `goals` that are set here.
    pub fn apply_to(&self, goals: &mut UserGoals) {
        if let Some(weight) = self.weight {
            goals.weight = Some(weight);
        }
        if let Some(target) = self.target_weight {
            goals.target_weight = Some(target);
        }
        if let Some(goal) = self.goal {
            goals.goal = goal;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.weight.is_none() && self.target_weight.is_none() && self.goal.is_none()
    }
}

/// Daily nutrient goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalsConfig {
    #[serde(default = "default_calories")]
    pub calories: f64,

    /// Grams of protein per day.
    #[serde(default = "default_protein")]
    pub protein: f64,

    #[serde(default = "default_carbs")]
    pub carbs: f64,

    #[serde(default = "default_fat")]
    pub fat: f64,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            calories: default_calories(),
            protein: default_protein(),
            carbs: default_carbs(),
            fat: default_fat(),
        }
    }
}

fn default_calories() -> f64 {
    2000.0
}

fn default_protein() -> f64 {
    50.0
}

fn default_carbs() -> f64 {
    250.0
}

fn default_fat() -> f64 {
    70.0
}

impl GoalsConfig {
    /// Goals for a user with nothing stored yet.
    pub fn to_user_goals(&self) -> UserGoals {
        UserGoals {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            ..UserGoals::default()
        }
    }
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Look-back window (7d, 30d or 90d).
    #[serde(default)]
    pub range: TimeRange,

    /// Include the day-of-week section.
    #[serde(default = "default_true")]
    pub include_weekly_cycle: bool,

    /// Include per-meal adjustment suggestions.
    #[serde(default = "default_true")]
    pub include_adjustments: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            range: TimeRange::default(),
            include_weekly_cycle: true,
            include_adjustments: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref store) = args.store {
            self.general.store = store.display().to_string();
        }
        if let Some(ref user) = args.user {
            self.general.user = user.clone();
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(range) = args.range {
            self.report.range = range.into();
        }

        // Profile flags
        if let Some(weight) = args.weight {
            self.profile.weight = Some(weight);
        }
        if let Some(target) = args.target_weight {
            self.profile.target_weight = Some(target);
        }
        if let Some(goal) = args.goal {
            self.profile.goal = Some(goal.into());
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
