//! In-memory authoritative roster and game-day collections.

/// Authoritative team store and mutation entry points.
pub mod store;
