use super::{StorageError, Store};
use crate::model::FetchKind;
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};

impl Store {
    /// Timestamp of the last successful fetch for `kind`.
    ///
    /// # Errors
    ///
    /// Will return `NotFound` if no ledger row exists (or its timestamp was
    /// nulled by a wipe), and `Err` on query or timestamp-parse failure.
    pub fn get_last_fetch(&self, kind: FetchKind) -> Result<DateTime<Utc>, StorageError> {
        let value: Option<Option<String>> = self.with_conn(|conn| {
            conn.query_row(
                "SELECT last_fetch FROM fetch WHERE fetch_type = ?1;",
                params![kind.as_str()],
                |row| row.get(0),
            )
            .optional()
        })?;

        match value.flatten() {
            Some(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| StorageError::Timestamp(raw)),
            None => Err(StorageError::NotFound(kind)),
        }
    }

    /// Upserts the ledger row for `kind`.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the row cannot be written.
    pub fn set_last_fetch(&self, kind: FetchKind, at: DateTime<Utc>) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO fetch (fetch_type, last_fetch) VALUES (?1, ?2);",
                params![kind.as_str(), at.to_rfc3339()],
            )?;
            Ok(())
        })
    }
}
