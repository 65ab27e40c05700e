use super::{StorageError, Store};
use crate::model::{Champion, FetchKind};
use rusqlite::{OptionalExtension, params};

/// A champion as stored, for read-back.
#[derive(Clone, Debug, PartialEq)]
pub struct ChampionRow {
    pub champion_id: String,
    pub name: String,
    pub title: String,
    pub tags: String,
    pub champ_type: String,
    pub format: String,
    pub blurb: String,
    pub partype: String,
    pub attack: f64,
    pub defense: f64,
    pub magic: f64,
    pub difficulty: f64,
    pub stats: String,
    pub image_url: String,
}

impl Store {
    /// Insert-or-update keyed by the champion key; every non-key column is
    /// overwritten unconditionally.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the row cannot be written.
    pub fn upsert_champion(&self, champion: &Champion) -> Result<(), StorageError> {
        let tags = serde_json::to_string(&champion.tags)?;
        let stats = serde_json::to_string(&champion.stats)?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO champions(
                    champion_id, name, title, tags, type, format, blurb, partype,
                    attack, defense, magic, difficulty, stats, image_url
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                ON CONFLICT(champion_id) DO UPDATE SET
                    name=excluded.name,
                    title=excluded.title,
                    tags=excluded.tags,
                    type=excluded.type,
                    format=excluded.format,
                    blurb=excluded.blurb,
                    partype=excluded.partype,
                    attack=excluded.attack,
                    defense=excluded.defense,
                    magic=excluded.magic,
                    difficulty=excluded.difficulty,
                    stats=excluded.stats,
                    image_url=excluded.image_url;",
                params![
                    champion.key,
                    champion.name,
                    champion.title,
                    tags,
                    champion.champ_type,
                    champion.format,
                    champion.blurb,
                    champion.partype,
                    champion.info.attack,
                    champion.info.defense,
                    champion.info.magic,
                    champion.info.difficulty,
                    stats,
                    champion.image.full_url(),
                ],
            )?;
            Ok(())
        })
    }

    /// # Errors
    ///
    /// Will return `Err` if the query fails.
    pub fn get_champion(&self, champion_id: &str) -> Result<Option<ChampionRow>, StorageError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT champion_id, name, title, tags, type, format, blurb, partype,
                        attack, defense, magic, difficulty, stats, image_url
                 FROM champions WHERE champion_id = ?1;",
                params![champion_id],
                |row| {
                    Ok(ChampionRow {
                        champion_id: row.get(0)?,
                        name: row.get(1)?,
                        title: row.get(2)?,
                        tags: row.get(3)?,
                        champ_type: row.get(4)?,
                        format: row.get(5)?,
                        blurb: row.get(6)?,
                        partype: row.get(7)?,
                        attack: row.get(8)?,
                        defense: row.get(9)?,
                        magic: row.get(10)?,
                        difficulty: row.get(11)?,
                        stats: row.get(12)?,
                        image_url: row.get(13)?,
                    })
                },
            )
            .optional()
        })
    }

    /// # Errors
    ///
    /// Will return `Err` if the query fails.
    pub fn list_champion_ids(&self) -> Result<Vec<String>, StorageError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT champion_id FROM champions;")?;
            let ids = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(ids)
        })
    }

    /// Deletes every champion row and nulls the CHAMPIONS ledger entry, so
    /// the next refresh is not skipped by the freshness gate.
    ///
    /// # Errors
    ///
    /// Will return `Err` if either statement fails.
    pub fn clear_champion_data(&self) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM champions;", [])?;
            conn.execute(
                "UPDATE fetch SET last_fetch = NULL WHERE fetch_type = ?1;",
                params![FetchKind::Champions.as_str()],
            )?;
            Ok(())
        })
    }
}
