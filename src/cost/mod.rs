//! Credit cost derived from asset provenance. Recomputed on every read, never stored.

/// Category buckets and the project total.
pub mod calculator;

pub use calculator::{CostBreakdown, CostCategory, asset_cost, calculate_project_cost};
