//! Insight report rendering (Markdown and JSON).

mod generator;

pub use generator::*;
