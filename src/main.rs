//! MealWise - nutrition insights from your own meal log
//!
//! A CLI tool that logs meals into a local JSON store and turns the
//! history into imbalance, trend and goal-projection reports.
//!
//! Exit codes:
//!   0 - Success (no imbalances above threshold, or no --fail-on set)
//!   1 - Runtime error (unreadable store, bad config, write failure, etc.)
//!   2 - Imbalances found at or above --fail-on threshold

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod store;

use anyhow::{Context, Result};
use chrono::{FixedOffset, Local, Utc};
use cli::{Args, OutputFormat};
use config::{Config, ProfileConfig, CONFIG_FILE_NAME};
use models::{ImbalanceSummary, Severity};
use report::ReportOptions;
use std::path::Path;
use store::{EntryRepository, JsonFileStore, NewEntry};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("MealWise v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .mealwise.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set your store, profile, goals and report range.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Dispatch to the requested command. Returns exit code (0 or 2).
async fn run(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    if let Some(ref item) = args.swap {
        return Ok(handle_swap(item));
    }

    let store = JsonFileStore::open(&config.general.store)
        .await
        .with_context(|| format!("Failed to open store {}", config.general.store))?;
    let mut repo = EntryRepository::new(store);
    let user = config.general.user.clone();

    if args.has_profile_update() {
        save_profile(&mut repo, &user, &config, &args)?;
    }

    let exit_code = if let Some(ref food) = args.log {
        handle_log(&mut repo, &user, food, &args)?
    } else {
        generate_report(&mut repo, &user, &config, &args)?
    };

    repo.store_mut()
        .flush()
        .await
        .with_context(|| format!("Failed to save store {}", config.general.store))?;

    Ok(exit_code)
}

/// Handle --swap: print healthier options for one item.
fn handle_swap(item: &str) -> i32 {
    match analysis::generate_smart_swaps(item) {
        Some(swap) => {
            println!("🔄 Swap ideas for \"{}\":", swap.item);
            for option in &swap.healthy_options {
                println!("   • {}", option);
            }
            println!("   {}", swap.benefit);
            println!("   💡 {}", swap.tip);
        }
        None => {
            println!("No swap suggestions for \"{}\".", item);
        }
    }
    0
}

/// Persist --weight, --target-weight and --goal into the stored goals.
fn save_profile(
    repo: &mut EntryRepository<JsonFileStore>,
    user: &str,
    config: &Config,
    args: &Args,
) -> Result<()> {
    let mut goals = repo
        .get_goals_or(user, config.goals.to_user_goals())
        .context("Failed to read goals")?;

    let update = ProfileConfig {
        weight: args.weight,
        target_weight: args.target_weight,
        goal: args.goal.map(Into::into),
    };
    update.apply_to(&mut goals);

    repo.set_goals(user, &goals).context("Failed to save goals")?;
    info!("Updated profile for {}", user);
    Ok(())
}

/// Handle --log: estimate nutrition and append an entry.
fn handle_log(
    repo: &mut EntryRepository<JsonFileStore>,
    user: &str,
    food: &str,
    args: &Args,
) -> Result<i32> {
    let food = food.trim();
    if !analysis::is_known(food) {
        warn!("\"{}\" is not in the food table, using a generic estimate", food);
    }

    let nutrition = analysis::estimate_from_input(food, &args.quantity);
    let quantity = args.quantity.trim().parse::<f64>().unwrap_or(1.0);

    let entry = repo
        .add_entry(
            user,
            NewEntry {
                food_name: food.to_string(),
                quantity,
                meal_type: args.meal_type.into(),
                nutrition,
                fiber: 0.0,
            },
            Utc::now(),
        )
        .context("Failed to log entry")?;

    println!(
        "✅ Logged {} x{} ({}): {} kcal | P {}g | C {}g | F {}g",
        entry.food_name,
        entry.quantity,
        entry.meal_type,
        entry.calories,
        entry.protein,
        entry.carbs,
        entry.fat
    );
    Ok(0)
}

/// Build insights for the configured range, write the report and print a summary.
fn generate_report(
    repo: &mut EntryRepository<JsonFileStore>,
    user: &str,
    config: &Config,
    args: &Args,
) -> Result<i32> {
    let entries = repo.get_entries(user).context("Failed to read entries")?;
    let mut goals = repo
        .get_goals_or(user, config.goals.to_user_goals())
        .context("Failed to read goals")?;
    if !config.profile.is_empty() {
        debug!("Applying profile overrides: {:?}", config.profile);
        config.profile.apply_to(&mut goals);
    }

    if entries.is_empty() {
        warn!("No entries logged for {} yet; the report will be empty", user);
    }

    let now = Utc::now();
    let offset: FixedOffset = *Local::now().offset();
    let range = config.report.range;
    let today = repo
        .today_entries(user, now, offset)
        .context("Failed to read today's entries")?;

    println!("🔬 Analyzing {} entries for {} (last {})...", entries.len(), user, range);
    let mut insights =
        analysis::build_insights(user, &entries, &today, &goals, range, now, offset);

    // Apply --min-severity filter
    if let Some(min_level) = args.min_severity {
        let min_severity = Severity::from(min_level);
        insights
            .imbalances
            .retain(|imbalance| imbalance.severity >= min_severity);
        insights.summary = ImbalanceSummary::from_imbalances(&insights.imbalances);
    }

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&insights)?,
        OutputFormat::Markdown => report::generate_markdown_report(
            &insights,
            ReportOptions {
                include_weekly_cycle: config.report.include_weekly_cycle,
                include_adjustments: config.report.include_adjustments,
            },
        ),
    };

    let output_path = Path::new(&config.general.output);
    std::fs::write(output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    let summary = &insights.summary;
    println!("\n📊 Insight Summary:");
    println!(
        "   Entries: {} over {} day(s)",
        insights.metadata.entries_analyzed, insights.metadata.days_logged
    );
    println!(
        "   Average daily: {} kcal (goal {})",
        insights.average_daily.calories, insights.goals.calories
    );
    println!("   Imbalances: {}", summary.total);
    println!(
        "   - 🔴 High: {} | 🟡 Medium: {} | 🟢 Low: {}",
        summary.high, summary.medium, summary.low
    );
    println!("\n✅ Report saved to: {}", output_path.display());

    // Check --fail-on threshold
    if let Some(fail_level) = args.fail_on {
        let threshold = Severity::from(fail_level);
        let has_imbalances_above = insights.imbalances.iter().any(|i| i.severity >= threshold);

        if has_imbalances_above {
            eprintln!(
                "\n⛔ Imbalances found at or above {} severity. Failing (exit code 2).",
                threshold
            );
            return Ok(2);
        }
    }

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
