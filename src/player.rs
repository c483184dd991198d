//! Player domain record, draft, and patch types.

use serde::{Deserialize, Serialize};

use crate::types::{PlayerId, Position};

/// Lowest legal jersey number.
pub const JERSEY_MIN: u8 = 1;
/// Highest legal jersey number.
pub const JERSEY_MAX: u8 = 99;

/// Fully materialized, authoritative player record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Stable player identifier.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Jersey number, unique across the roster.
    pub jersey: u8,
    /// Court role.
    pub position: Position,
    /// Cumulative playing-time credit across completed game days.
    pub points_played: f64,
    /// Completed game days with a counted appearance.
    pub matches_played: u32,
    /// Training sessions attended across completed game days.
    pub trainings_attended: u32,
    /// Creation timestamp in milliseconds since epoch.
    pub created_ts_ms: u64,
}

impl Player {
    /// Zeroes the derived statistic fields before a full recomputation.
    pub fn reset_stats(&mut self) {
        self.points_played = 0.0;
        self.matches_played = 0;
        self.trainings_attended = 0;
    }
}

/// Insert payload used to create a new [`Player`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerDraft {
    /// Display name.
    pub name: String,
    /// Jersey number, unique across the roster.
    pub jersey: u8,
    /// Court role.
    pub position: Position,
}

/// Sparse patch where each `Some` field overwrites the record value.
///
/// Statistic fields are owned by the statistics engine and are not patchable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerPatch {
    /// Optional replacement for the display name.
    pub name: Option<String>,
    /// Optional replacement for the jersey number.
    pub jersey: Option<u8>,
    /// Optional replacement for the court role.
    pub position: Option<Position>,
}

impl PlayerPatch {
    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies this patch in place to `rec`.
    pub fn apply_to(&self, rec: &mut Player) {
        if let Some(v) = &self.name {
            rec.name = v.clone();
        }
        if let Some(v) = self.jersey {
            rec.jersey = v;
        }
        if let Some(v) = self.position {
            rec.position = v;
        }
    }
}
