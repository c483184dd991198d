//! Runtime event stream payloads.

use crate::types::{GameDayId, PlayerId, Revision};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamEvent {
    /// A new player joined the roster.
    PlayerAdded {
        /// Added player id.
        id: PlayerId,
    },
    /// An existing player's identity fields changed.
    PlayerUpdated {
        /// Updated player id.
        id: PlayerId,
    },
    /// A player left the roster.
    PlayerRemoved {
        /// Removed player id.
        id: PlayerId,
    },
    /// A new game-day week was started.
    GameDayCreated {
        /// Created game-day id.
        id: GameDayId,
    },
    /// Attendance, line-up, or substitutions changed on a game day.
    GameDayUpdated {
        /// Updated game-day id.
        id: GameDayId,
    },
    /// A game day was completed and its statistics applied.
    GameDayCompleted {
        /// Completed game-day id.
        id: GameDayId,
    },
    /// A game day was deleted.
    GameDayRemoved {
        /// Removed game-day id.
        id: GameDayId,
    },
    /// Player statistics were rebuilt from scratch.
    StatsRecomputed,
    /// Persistence has reached at least this store revision.
    DurableUpTo {
        /// Highest revision known durable.
        revision: Revision,
    },
}
