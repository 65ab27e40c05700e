use super::{StorageError, Store};
use crate::model::{FetchKind, Game, ParticipantEntry, TeamEntry};
use rusqlite::{Connection, OptionalExtension, params};

/// A game as stored, for read-back. Timestamps come back as the RFC3339
/// strings they were written as.
#[derive(Clone, Debug, PartialEq)]
pub struct GameRow {
    pub game_id: String,
    pub created_at: String,
    pub game_length: i64,
    pub tier: String,
    pub division: i64,
    pub tier_image_url: String,
    pub border_image_url: String,
    pub is_remake: bool,
    pub meta_version: String,
    pub game_type: String,
    pub is_opscore_active: bool,
    pub is_recorded: bool,
    pub version: String,
    pub first_game_created_at: String,
    pub last_game_created_at: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TeamRow {
    pub team_id: i64,
    pub game_id: String,
    pub key: String,
    pub is_win: bool,
    pub champion_first: bool,
    pub inhibitor_first: bool,
    pub rift_herald_first: bool,
    pub death: i64,
    pub champion_kill: i64,
    pub inhibitor_kill: i64,
    pub dragon_first: bool,
    pub horde_first: bool,
    pub rift_herald_kill: i64,
    pub is_remake: bool,
    pub gold_earned: i64,
    pub kill: i64,
    pub tower_first: bool,
    pub horde_kill: i64,
    pub assist: i64,
    pub dragon_kill: i64,
    pub baron_kill: i64,
    pub baron_first: bool,
    pub tower_kill: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticipantRow {
    pub id: i64,
    pub game_id: String,
    pub participant_id: i64,
    pub summoner_name: String,
    pub champion_id: String,
    pub position: String,
    pub role: String,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub gold_earned: i64,
    pub damage_dealt: i64,
    pub damage_taken: i64,
    pub vision_score: i64,
    pub primary_rune_id: i64,
    pub secondary_rune_page_id: i64,
    pub lane_score: i64,
    pub team_key: String,
    pub result: String,
    pub ward_place: i64,
    pub op_score_rank: i64,
    pub barrack_kill: i64,
    pub total_heal: i64,
    pub game_type: String,
    pub is_remake: bool,
}

impl Store {
    /// Insert-only; a duplicate game id fails and is the caller's to handle.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the row cannot be written.
    pub fn insert_game(&self, game: &Game) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO games(
                    game_id, created_at, game_length, tier, division, tier_image_url,
                    border_image_url, is_remake, meta_version, game_type,
                    is_opscore_active, is_recorded, version,
                    first_game_created_at, last_game_created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
                params![
                    game.id,
                    game.created_at.to_rfc3339(),
                    game.game_length_second,
                    game.average_tier_info.tier,
                    game.average_tier_info.division as i64,
                    game.average_tier_info.tier_image_url,
                    game.average_tier_info.border_image_url,
                    game.is_remake,
                    game.meta_version,
                    game.game_type,
                    game.is_opscore_active,
                    game.is_recorded,
                    game.version,
                    game.first_game_created_at.to_rfc3339(),
                    game.last_game_created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    /// Inserts a team for `game_id` and returns its surrogate id.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the row cannot be written.
    pub fn insert_team(&self, game_id: &str, team: &TeamEntry) -> Result<i64, StorageError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO teams(
                    game_id, key, is_win, champion_first, inhibitor_first,
                    rift_herald_first, death, champion_kill, inhibitor_kill,
                    dragon_first, horde_first, rift_herald_kill, is_remake,
                    gold_earned, kill, tower_first, horde_kill, assist,
                    dragon_kill, baron_kill, baron_first, tower_kill
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                          ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22);",
                params![
                    game_id,
                    team.key,
                    team.game_stat.is_win,
                    team.game_stat.champion_first,
                    team.game_stat.inhibitor_first,
                    team.game_stat.rift_herald_first,
                    team.game_stat.death as i64,
                    team.game_stat.champion_kill as i64,
                    team.game_stat.inhibitor_kill as i64,
                    team.game_stat.dragon_first,
                    team.game_stat.horde_first,
                    team.game_stat.rift_herald_kill as i64,
                    team.game_stat.is_remake,
                    team.game_stat.gold_earned as i64,
                    team.game_stat.kill as i64,
                    team.game_stat.tower_first,
                    team.game_stat.horde_kill as i64,
                    team.game_stat.assist as i64,
                    team.game_stat.dragon_kill as i64,
                    team.game_stat.baron_kill as i64,
                    team.game_stat.baron_first,
                    team.game_stat.tower_kill as i64,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// # Errors
    ///
    /// Will return `Err` if the row cannot be written.
    pub fn insert_team_banned_champion(
        &self,
        team_id: i64,
        banned_champion_id: i64,
    ) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO team_banned_champions(team_id, banned_champion_id)
                 VALUES (?1, ?2);",
                params![team_id, banned_champion_id],
            )?;
            Ok(())
        })
    }

    /// Inserts a participant for `game_id` and returns its surrogate id.
    /// The upstream numeric champion id is stored as a string to land in
    /// the champions table's key domain.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the row cannot be written.
    pub fn insert_participant(
        &self,
        game_id: &str,
        participant: &ParticipantEntry,
    ) -> Result<i64, StorageError> {
        let champion_id = (participant.champion_id as i64).to_string();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO participants(
                    game_id, participant_id, summoner_name, champion_id, position,
                    role, kills, deaths, assists, gold_earned, damage_dealt,
                    damage_taken, vision_score, primary_rune_id,
                    secondary_rune_page_id, lane_score, team_key, result,
                    ward_place, op_score_rank, barrack_kill, total_heal,
                    game_type, is_remake
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                          ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24);",
                params![
                    game_id,
                    participant.participant_id as i64,
                    participant.summoner.name,
                    champion_id,
                    participant.position,
                    participant.role,
                    participant.stats.kill as i64,
                    participant.stats.death as i64,
                    participant.stats.assist as i64,
                    participant.stats.gold_earned as i64,
                    participant.stats.total_damage_dealt_to_champions as i64,
                    participant.stats.total_damage_taken as i64,
                    participant.stats.vision_score as i64,
                    participant.rune.primary_rune_id as i64,
                    participant.rune.secondary_page_id as i64,
                    participant.stats.lane_score as i64,
                    participant.team_key,
                    participant.stats.result,
                    participant.stats.ward_place as i64,
                    participant.stats.op_score_rank as i64,
                    participant.stats.barrack_kill as i64,
                    participant.stats.total_heal as i64,
                    participant.game_type,
                    participant.is_remake,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// # Errors
    ///
    /// Will return `Err` if the row cannot be written.
    pub fn insert_participant_item(
        &self,
        participant_id: i64,
        item_id: i64,
    ) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO participant_items(participant_id, item_id) VALUES (?1, ?2);",
                params![participant_id, item_id],
            )?;
            Ok(())
        })
    }

    /// # Errors
    ///
    /// Will return `Err` if the row cannot be written.
    pub fn insert_participant_spell(
        &self,
        participant_id: i64,
        spell_id: i64,
    ) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO participant_spells(participant_id, spell_id) VALUES (?1, ?2);",
                params![participant_id, spell_id],
            )?;
            Ok(())
        })
    }

    /// # Errors
    ///
    /// Will return `Err` if the query fails.
    pub fn get_game(&self, game_id: &str) -> Result<Option<GameRow>, StorageError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT game_id, created_at, game_length, tier, division,
                        tier_image_url, border_image_url, is_remake, meta_version,
                        game_type, is_opscore_active, is_recorded, version,
                        first_game_created_at, last_game_created_at
                 FROM games WHERE game_id = ?1;",
                params![game_id],
                |row| {
                    Ok(GameRow {
                        game_id: row.get(0)?,
                        created_at: row.get(1)?,
                        game_length: row.get(2)?,
                        tier: row.get(3)?,
                        division: row.get(4)?,
                        tier_image_url: row.get(5)?,
                        border_image_url: row.get(6)?,
                        is_remake: row.get(7)?,
                        meta_version: row.get(8)?,
                        game_type: row.get(9)?,
                        is_opscore_active: row.get(10)?,
                        is_recorded: row.get(11)?,
                        version: row.get(12)?,
                        first_game_created_at: row.get(13)?,
                        last_game_created_at: row.get(14)?,
                    })
                },
            )
            .optional()
        })
    }

    /// # Errors
    ///
    /// Will return `Err` if the query fails.
    pub fn get_teams(&self, game_id: &str) -> Result<Vec<TeamRow>, StorageError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT team_id, game_id, key, is_win, champion_first, inhibitor_first,
                        rift_herald_first, death, champion_kill, inhibitor_kill,
                        dragon_first, horde_first, rift_herald_kill, is_remake,
                        gold_earned, kill, tower_first, horde_kill, assist,
                        dragon_kill, baron_kill, baron_first, tower_kill
                 FROM teams WHERE game_id = ?1 ORDER BY team_id;",
            )?;
            let teams = stmt
                .query_map(params![game_id], |row| {
                    Ok(TeamRow {
                        team_id: row.get(0)?,
                        game_id: row.get(1)?,
                        key: row.get(2)?,
                        is_win: row.get(3)?,
                        champion_first: row.get(4)?,
                        inhibitor_first: row.get(5)?,
                        rift_herald_first: row.get(6)?,
                        death: row.get(7)?,
                        champion_kill: row.get(8)?,
                        inhibitor_kill: row.get(9)?,
                        dragon_first: row.get(10)?,
                        horde_first: row.get(11)?,
                        rift_herald_kill: row.get(12)?,
                        is_remake: row.get(13)?,
                        gold_earned: row.get(14)?,
                        kill: row.get(15)?,
                        tower_first: row.get(16)?,
                        horde_kill: row.get(17)?,
                        assist: row.get(18)?,
                        dragon_kill: row.get(19)?,
                        baron_kill: row.get(20)?,
                        baron_first: row.get(21)?,
                        tower_kill: row.get(22)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(teams)
        })
    }

    /// # Errors
    ///
    /// Will return `Err` if the query fails.
    pub fn get_participants(&self, game_id: &str) -> Result<Vec<ParticipantRow>, StorageError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, game_id, participant_id, summoner_name, champion_id,
                        position, role, kills, deaths, assists, gold_earned,
                        damage_dealt, damage_taken, vision_score, primary_rune_id,
                        secondary_rune_page_id, lane_score, team_key, result,
                        ward_place, op_score_rank, barrack_kill, total_heal,
                        game_type, is_remake
                 FROM participants WHERE game_id = ?1 ORDER BY id;",
            )?;
            let participants = stmt
                .query_map(params![game_id], |row| {
                    Ok(ParticipantRow {
                        id: row.get(0)?,
                        game_id: row.get(1)?,
                        participant_id: row.get(2)?,
                        summoner_name: row.get(3)?,
                        champion_id: row.get(4)?,
                        position: row.get(5)?,
                        role: row.get(6)?,
                        kills: row.get(7)?,
                        deaths: row.get(8)?,
                        assists: row.get(9)?,
                        gold_earned: row.get(10)?,
                        damage_dealt: row.get(11)?,
                        damage_taken: row.get(12)?,
                        vision_score: row.get(13)?,
                        primary_rune_id: row.get(14)?,
                        secondary_rune_page_id: row.get(15)?,
                        lane_score: row.get(16)?,
                        team_key: row.get(17)?,
                        result: row.get(18)?,
                        ward_place: row.get(19)?,
                        op_score_rank: row.get(20)?,
                        barrack_kill: row.get(21)?,
                        total_heal: row.get(22)?,
                        game_type: row.get(23)?,
                        is_remake: row.get(24)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(participants)
        })
    }

    /// # Errors
    ///
    /// Will return `Err` if the query fails.
    pub fn get_participant_items(&self, participant_id: i64) -> Result<Vec<i64>, StorageError> {
        self.with_conn(|conn| {
            Self::child_ids(
                conn,
                "SELECT item_id FROM participant_items WHERE participant_id = ?1 ORDER BY id;",
                participant_id,
            )
        })
    }

    /// # Errors
    ///
    /// Will return `Err` if the query fails.
    pub fn get_participant_spells(&self, participant_id: i64) -> Result<Vec<i64>, StorageError> {
        self.with_conn(|conn| {
            Self::child_ids(
                conn,
                "SELECT spell_id FROM participant_spells WHERE participant_id = ?1 ORDER BY id;",
                participant_id,
            )
        })
    }

    /// # Errors
    ///
    /// Will return `Err` if the query fails.
    pub fn get_team_banned_champions(&self, team_id: i64) -> Result<Vec<i64>, StorageError> {
        self.with_conn(|conn| {
            Self::child_ids(
                conn,
                "SELECT banned_champion_id FROM team_banned_champions WHERE team_id = ?1 ORDER BY id;",
                team_id,
            )
        })
    }

    fn child_ids(conn: &Connection, sql: &str, parent_id: i64) -> Result<Vec<i64>, rusqlite::Error> {
        let mut stmt = conn.prepare(sql)?;
        stmt.query_map(params![parent_id], |row| row.get(0))?
            .collect()
    }

    /// Deletes every row in the game table family (children first, foreign
    /// keys are on) and nulls the GAMES ledger entry.
    ///
    /// # Errors
    ///
    /// Will return `Err` if any statement fails.
    pub fn clear_game_data(&self) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            for table in [
                "participant_items",
                "participant_spells",
                "team_banned_champions",
                "participants",
                "teams",
                "games",
            ] {
                conn.execute(&format!("DELETE FROM {table};"), [])?;
            }
            conn.execute(
                "UPDATE fetch SET last_fetch = NULL WHERE fetch_type = ?1;",
                params![FetchKind::Games.as_str()],
            )?;
            Ok(())
        })
    }
}
