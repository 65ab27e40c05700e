mod champions;
mod games;
mod ledger;

pub use champions::ChampionRow;
pub use games::{GameRow, ParticipantRow, TeamRow};

use crate::model::FetchKind;
use rusqlite::Connection;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("no fetch record for {0}")]
    NotFound(FetchKind),
    #[error("bad timestamp in fetch ledger: {0}")]
    Timestamp(String),
}

const SCHEMA: &[&str] = &[
    include_str!("../sql/schema/sqlite/00_games.sql"),
    include_str!("../sql/schema/sqlite/01_teams.sql"),
    include_str!("../sql/schema/sqlite/06_champions.sql"),
    include_str!("../sql/schema/sqlite/02_participants.sql"),
    include_str!("../sql/schema/sqlite/03_participant_items.sql"),
    include_str!("../sql/schema/sqlite/04_participant_spells.sql"),
    include_str!("../sql/schema/sqlite/05_team_banned_champions.sql"),
    include_str!("../sql/schema/sqlite/07_fetch.sql"),
];

/// The relational store. One shared connection, synchronous local
/// operations; every insert is its own implicit unit of work.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Opens (or creates) the database at `path` and applies the schema.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file cannot be opened or a DDL statement
    /// fails.
    pub fn open(path: &str) -> Result<Self, StorageError> {
        Self::init(Connection::open(path)?)
    }

    /// In-memory database, used by tests.
    ///
    /// # Errors
    ///
    /// Will return `Err` if a DDL statement fails.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        for ddl in SCHEMA {
            conn.execute_batch(ddl)?;
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, rusqlite::Error>,
    ) -> Result<T, StorageError> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&conn).map_err(StorageError::from)
    }
}
