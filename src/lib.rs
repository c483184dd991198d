//! Authoritative in-memory roster and game-day tracking with SQLite-backed
//! document persistence.
//!
//! # Examples
//!
//! In-memory usage with [`core::store::TeamStore`]:
//! ```
//! use teamlog::{core::store::TeamStore, player::PlayerDraft, types::Position};
//!
//! let mut store = TeamStore::new();
//! let id = store
//!     .add_player(PlayerDraft {
//!         name: "Ana".to_string(),
//!         jersey: 4,
//!         position: Position::Setter,
//!     })
//!     .expect("add player");
//! assert_eq!(id, 1);
//! ```
//!
//! Runtime usage with the SQLite document store:
//! ```no_run
//! use teamlog::{
//!     core::store::TeamStore,
//!     persist::sqlite::SqliteTeamDocs,
//!     player::PlayerDraft,
//!     runtime::handle::{RuntimeConfig, spawn_teamlog},
//!     types::Position,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let docs = SqliteTeamDocs::open("team.db").expect("open sqlite");
//! let handle = spawn_teamlog(TeamStore::new(), Some(Box::new(docs)), RuntimeConfig::default());
//! let _id = handle
//!     .add_player(PlayerDraft {
//!         name: "Ana".to_string(),
//!         jersey: 4,
//!         position: Position::Setter,
//!     })
//!     .await
//!     .expect("add player");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```

/// Authoritative in-memory store.
pub mod core;
/// Line-up planning and statistics derivation.
pub mod engine;
/// Game-day records, line-ups, and substitutions.
pub mod gameday;
/// Persistence abstraction and SQLite document store.
pub mod persist;
/// Player records and patches.
pub mod player;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Shared primitive types and enums.
pub mod types;
