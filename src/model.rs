use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The two kinds of upstream data tracked by the fetch ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchKind {
    Champions,
    Games,
}

impl FetchKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FetchKind::Champions => "CHAMPIONS",
            FetchKind::Games => "GAMES",
        }
    }
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Champion catalog response: a map from champion key to champion record.
#[derive(Deserialize, Clone, Debug)]
pub struct ChampionCatalog {
    #[serde(default, rename = "type")]
    pub catalog_type: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub version: String,
    pub data: HashMap<String, Champion>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Champion {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub blurb: String,
    #[serde(default)]
    pub partype: String,
    #[serde(default)]
    pub info: ChampionInfo,
    #[serde(default)]
    pub stats: HashMap<String, f64>,
    #[serde(default)]
    pub image: ChampionImage,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "type")]
    pub champ_type: String,
    #[serde(default)]
    pub format: String,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ChampionInfo {
    #[serde(default)]
    pub attack: f64,
    #[serde(default)]
    pub defense: f64,
    #[serde(default)]
    pub magic: f64,
    #[serde(default)]
    pub difficulty: f64,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ChampionImage {
    #[serde(default)]
    pub full: String,
    #[serde(default)]
    pub sprite: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub w: f64,
    #[serde(default)]
    pub h: f64,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl ChampionImage {
    /// Full image URL for the champion portrait.
    #[must_use]
    pub fn full_url(&self) -> String {
        format!(
            "https://ddragon.leagueoflegends.com/cdn/{}/img/champion/{}",
            self.version, self.full
        )
    }
}

/// Match-history batch response.
#[derive(Deserialize, Clone, Debug)]
pub struct GameBatch {
    #[serde(default)]
    pub meta: GameBatchMeta,
    pub data: Vec<GameEntry>,
}

/// First/last game timestamps of the fetched batch, as RFC3339 strings.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct GameBatchMeta {
    #[serde(default)]
    pub first_game_created_at: String,
    #[serde(default)]
    pub last_game_created_at: String,
}

/// One game as it arrives from upstream. Numeric fields are real numbers
/// regardless of whether upstream sends integers, and `is_recorded` is a
/// nullable number. Free-form fields (memo, record_info, myData, score
/// timelines) are not declared and therefore ignored.
#[derive(Deserialize, Clone, Debug)]
pub struct GameEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub game_length_second: f64,
    #[serde(default)]
    pub average_tier_info: TierInfo,
    #[serde(default)]
    pub is_remake: bool,
    #[serde(default)]
    pub meta_version: String,
    #[serde(default)]
    pub game_type: String,
    #[serde(default)]
    pub is_opscore_active: bool,
    #[serde(default)]
    pub is_recorded: Option<f64>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub teams: Vec<TeamEntry>,
    #[serde(default)]
    pub participants: Vec<ParticipantEntry>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct TierInfo {
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub division: f64,
    #[serde(default)]
    pub tier_image_url: String,
    #[serde(default)]
    pub border_image_url: String,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct TeamEntry {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub game_stat: TeamStat,
    /// Raw numeric champion ids; upstream sends null for a skipped ban.
    #[serde(default)]
    pub banned_champions: Vec<Option<f64>>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct TeamStat {
    #[serde(default)]
    pub is_win: bool,
    #[serde(default)]
    pub champion_first: bool,
    #[serde(default)]
    pub inhibitor_first: bool,
    #[serde(default)]
    pub rift_herald_first: bool,
    #[serde(default)]
    pub death: f64,
    #[serde(default)]
    pub champion_kill: f64,
    #[serde(default)]
    pub inhibitor_kill: f64,
    #[serde(default)]
    pub dragon_first: bool,
    #[serde(default)]
    pub horde_first: bool,
    #[serde(default)]
    pub rift_herald_kill: f64,
    #[serde(default)]
    pub is_remake: bool,
    #[serde(default)]
    pub gold_earned: f64,
    #[serde(default)]
    pub kill: f64,
    #[serde(default)]
    pub tower_first: bool,
    #[serde(default)]
    pub horde_kill: f64,
    #[serde(default)]
    pub assist: f64,
    #[serde(default)]
    pub dragon_kill: f64,
    #[serde(default)]
    pub baron_kill: f64,
    #[serde(default)]
    pub baron_first: bool,
    #[serde(default)]
    pub tower_kill: f64,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ParticipantEntry {
    #[serde(default)]
    pub participant_id: f64,
    #[serde(default)]
    pub champion_id: f64,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub summoner: SummonerInfo,
    #[serde(default)]
    pub rune: RuneSelection,
    #[serde(default)]
    pub stats: ParticipantStats,
    #[serde(default)]
    pub team_key: String,
    #[serde(default)]
    pub game_type: String,
    #[serde(default)]
    pub is_remake: bool,
    #[serde(default)]
    pub items: Vec<f64>,
    #[serde(default)]
    pub spells: Vec<f64>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct SummonerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub tagline: String,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct RuneSelection {
    #[serde(default)]
    pub primary_page_id: f64,
    #[serde(default)]
    pub primary_rune_id: f64,
    #[serde(default)]
    pub secondary_page_id: f64,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ParticipantStats {
    #[serde(default)]
    pub kill: f64,
    #[serde(default)]
    pub death: f64,
    #[serde(default)]
    pub assist: f64,
    #[serde(default)]
    pub gold_earned: f64,
    #[serde(default)]
    pub total_damage_dealt_to_champions: f64,
    #[serde(default)]
    pub total_damage_taken: f64,
    #[serde(default)]
    pub vision_score: f64,
    #[serde(default)]
    pub lane_score: f64,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub ward_place: f64,
    #[serde(default)]
    pub op_score_rank: f64,
    #[serde(default)]
    pub barrack_kill: f64,
    #[serde(default)]
    pub total_heal: f64,
}

/// A game with its timestamps resolved and its nullable flags coerced,
/// ready for the store. The batch meta timestamps are denormalized onto
/// every game of the batch.
#[derive(Clone, Debug)]
pub struct Game {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub game_length_second: i64,
    pub average_tier_info: TierInfo,
    pub is_remake: bool,
    pub meta_version: String,
    pub game_type: String,
    pub is_opscore_active: bool,
    pub is_recorded: bool,
    pub version: String,
    pub first_game_created_at: DateTime<Utc>,
    pub last_game_created_at: DateTime<Utc>,
}

impl Game {
    /// Resolves one batch entry into a storable game. `is_recorded` is true
    /// iff the upstream value is present and non-zero.
    ///
    /// # Errors
    ///
    /// Will return `Err` if `created_at` or either batch meta timestamp is
    /// not valid RFC3339.
    pub fn from_entry(entry: &GameEntry, meta: &GameBatchMeta) -> Result<Self, chrono::ParseError> {
        let created_at = DateTime::parse_from_rfc3339(&entry.created_at)?.with_timezone(&Utc);
        let first_game_created_at =
            DateTime::parse_from_rfc3339(&meta.first_game_created_at)?.with_timezone(&Utc);
        let last_game_created_at =
            DateTime::parse_from_rfc3339(&meta.last_game_created_at)?.with_timezone(&Utc);

        Ok(Self {
            id: entry.id.clone(),
            created_at,
            game_length_second: entry.game_length_second as i64,
            average_tier_info: entry.average_tier_info.clone(),
            is_remake: entry.is_remake,
            meta_version: entry.meta_version.clone(),
            game_type: entry.game_type.clone(),
            is_opscore_active: entry.is_opscore_active,
            is_recorded: entry.is_recorded.is_some_and(|v| v != 0.0),
            version: entry.version.clone(),
            first_game_created_at,
            last_game_created_at,
        })
    }
}
