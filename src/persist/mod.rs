pub mod sqlite;

use crate::{gameday::GameDay, player::Player};

#[derive(Debug)]
pub enum PersistError {
    Sqlite(rusqlite::Error),
    Serde(serde_json::Error),
    Message(String),
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Document-store contract the core persists through.
///
/// Whole-collection semantics: each save atomically replaces the stored
/// document for that collection.
pub trait TeamDocs: Send {
    fn load_roster(&self) -> PersistResult<Vec<Player>>;
    fn save_roster(&mut self, players: &[Player]) -> PersistResult<()>;
    fn load_game_days(&self) -> PersistResult<Vec<GameDay>>;
    fn save_game_days(&mut self, days: &[GameDay]) -> PersistResult<()>;
    fn flush(&mut self) -> PersistResult<()> {
        Ok(())
    }
}
