//! SQLite-backed document store for the roster and game-day collections.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{core::store::TeamStore, gameday::GameDay, player::Player};

use super::{PersistError, PersistResult, TeamDocs};

/// Version number for serialized document payloads.
pub const DOC_FORMAT_VERSION: u16 = 1;

const ROSTER_DOC: &str = "roster";
const GAME_DAYS_DOC: &str = "game_days";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocEnvelope<T> {
    format_version: u16,
    items: Vec<T>,
}

/// SQLite implementation of [`crate::persist::TeamDocs`].
pub struct SqliteTeamDocs {
    conn: Connection,
}

impl SqliteTeamDocs {
    /// Opens or creates a SQLite-backed document store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory document store.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Loads a [`TeamStore`] from both persisted collections.
    pub fn load_store(&self) -> PersistResult<TeamStore> {
        let players = self.load_roster()?;
        let game_days = self.load_game_days()?;
        Ok(TeamStore::from_collections(players, game_days))
    }

    fn load_collection<T: DeserializeOwned>(&self, collection: &str) -> PersistResult<Vec<T>> {
        let payload: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT payload FROM documents WHERE collection = ?1",
                params![collection],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(Vec::new());
        };

        let env: DocEnvelope<T> = serde_json::from_slice(&payload)?;
        if env.format_version != DOC_FORMAT_VERSION {
            return Err(PersistError::Message(format!(
                "unsupported document format version: {}",
                env.format_version
            )));
        }
        Ok(env.items)
    }

    fn save_collection<T: Serialize + Clone>(
        &mut self,
        collection: &str,
        items: &[T],
    ) -> PersistResult<()> {
        let env = DocEnvelope {
            format_version: DOC_FORMAT_VERSION,
            items: items.to_vec(),
        };
        let payload = serde_json::to_vec(&env)?;
        self.conn.execute(
            "INSERT INTO documents(collection, format_version, ts_ms, payload) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(collection) DO UPDATE SET \
             format_version = excluded.format_version, \
             ts_ms = excluded.ts_ms, \
             payload = excluded.payload",
            params![collection, DOC_FORMAT_VERSION, now_ms() as i64, payload],
        )?;
        Ok(())
    }
}

impl TeamDocs for SqliteTeamDocs {
    fn load_roster(&self) -> PersistResult<Vec<Player>> {
        self.load_collection(ROSTER_DOC)
    }

    fn save_roster(&mut self, players: &[Player]) -> PersistResult<()> {
        self.save_collection(ROSTER_DOC, players)
    }

    fn load_game_days(&self) -> PersistResult<Vec<GameDay>> {
        self.load_collection(GAME_DAYS_DOC)
    }

    fn save_game_days(&mut self, days: &[GameDay]) -> PersistResult<()> {
        self.save_collection(GAME_DAYS_DOC, days)
    }

    fn flush(&mut self) -> PersistResult<()> {
        self.conn.execute_batch("PRAGMA wal_checkpoint(PASSIVE);")?;
        Ok(())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
