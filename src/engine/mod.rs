//! Line-up planning and statistics derivation.

/// Line-up planner and substitution ledger over a draft game day.
pub mod planner;
/// Point-split arithmetic and roster statistics aggregation.
pub mod stats;
