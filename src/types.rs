//! Shared primitive IDs and team-domain enums.

use serde::{Deserialize, Serialize};

/// Monotonic player identifier.
pub type PlayerId = u64;
/// Monotonic game-day identifier.
pub type GameDayId = u64;
/// Monotonic store mutation counter used for durability reporting.
pub type Revision = u64;

/// Court role bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    /// Setter.
    Setter,
    /// Middle blocker.
    MiddleBlocker,
    /// Any other court role.
    GenericPlayer,
}

/// Weekly session bucket: two trainings plus the Saturday match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Session {
    /// Monday training.
    Monday,
    /// Wednesday training.
    Wednesday,
    /// Saturday match day.
    Saturday,
}

/// One of the two Saturday line-up sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetNumber {
    /// First set.
    One,
    /// Second set.
    Two,
}
