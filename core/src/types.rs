//! Shared primitive types used across the engine.

/// Estimated credit-score points attributed to one signal.
pub type Points = u32;

/// Whole-dollar amount as reported on a tradeline.
pub type Amount = i64;

/// Days in a scoring year. Account ages are measured in these units.
pub const DAYS_PER_YEAR: f64 = 365.0;
