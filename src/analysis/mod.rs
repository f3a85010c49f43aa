//! Analysis modules.
//!
//! Everything here is a pure computation over logged entries and goals.
//! Calendar questions take an explicit UTC offset and trend windows an
//! explicit `now`, so results only depend on their inputs.

pub mod adjustment;
pub mod aggregator;
pub mod constants;
pub mod estimator;
pub mod imbalance;
pub mod insights;
pub mod meal_pattern;
pub mod recommendations;
pub mod stats;
pub mod trend;

pub use adjustment::generate_smart_swaps;
pub use aggregator::TimeRange;
pub use estimator::{estimate_from_input, is_known};
pub use insights::build_insights;
