use crate::client::{CHAMPION_VERSIONS_URL, UpstreamClient, champion_catalog_url, match_history_url};
use crate::error::CoreError;
use crate::model::{ChampionCatalog, FetchKind, Game, GameBatch};
use crate::storage::{Store, StorageError};
use chrono::{DateTime, Duration, Utc};

/// Data younger than this is considered fresh and is not refetched.
pub const REFRESH_INTERVAL: Duration = Duration::hours(24);

/// What a refresh run did.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// The ledger said the data was fresh; nothing was fetched or written.
    Skipped,
    Completed(PersistReport),
}

/// Best-effort persistence tally for one batch: how many rows went in, and
/// which entities were skipped.
#[derive(Debug, Default)]
pub struct PersistReport {
    pub inserted: usize,
    pub failures: Vec<PersistFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistFailure {
    pub entity: String,
    pub reason: String,
}

impl PersistReport {
    fn skip(&mut self, entity: String, reason: impl ToString) {
        self.failures.push(PersistFailure {
            entity,
            reason: reason.to_string(),
        });
    }
}

/// Whether `kind` is due for a refresh. A missing ledger row always means
/// stale; a ledger read failure is logged and treated as stale so a broken
/// ledger cannot wedge refreshes shut.
pub fn is_stale(store: &Store, kind: FetchKind, now: DateTime<Utc>, interval: Duration) -> bool {
    match store.get_last_fetch(kind) {
        Ok(last) => now.signed_duration_since(last) >= interval,
        Err(StorageError::NotFound(_)) => true,
        Err(e) => {
            log::warn!("error reading last fetch time for {kind}: {e}");
            true
        }
    }
}

/// Fetches the latest champion catalog and upserts every champion, then
/// advances the CHAMPIONS ledger. A single bad champion record is skipped,
/// not fatal; transport and decode failures abort the run with the ledger
/// untouched.
///
/// # Errors
///
/// Will return `Err` on transport or decode failure, or if the ledger
/// cannot be advanced (already-persisted champions stay).
pub async fn refresh_champions(
    client: &dyn UpstreamClient,
    store: &Store,
    now: DateTime<Utc>,
) -> Result<RefreshOutcome, CoreError> {
    if !is_stale(store, FetchKind::Champions, now, REFRESH_INTERVAL) {
        log::info!("champion data is up to date");
        return Ok(RefreshOutcome::Skipped);
    }

    let versions_bytes = client.fetch(CHAMPION_VERSIONS_URL).await?;
    let versions: Vec<String> = serde_json::from_slice(&versions_bytes)?;
    let latest = versions
        .first()
        .ok_or_else(|| CoreError::Decode("empty champion version list".to_string()))?;
    log::info!("latest champion data version: {latest}");

    let catalog_bytes = client.fetch(&champion_catalog_url(latest)).await?;
    let catalog: ChampionCatalog = serde_json::from_slice(&catalog_bytes)?;
    log::info!("fetched {} champions", catalog.data.len());

    let mut report = PersistReport::default();
    for champion in catalog.data.values() {
        match store.upsert_champion(champion) {
            Ok(()) => report.inserted += 1,
            Err(e) => {
                log::error!("error upserting champion {}: {e}", champion.name);
                report.skip(format!("champion {}", champion.key), e);
            }
        }
    }

    match store.list_champion_ids() {
        Ok(ids) => log::info!("total champions in database: {}", ids.len()),
        Err(e) => log::warn!("error listing champion ids: {e}"),
    }

    store.set_last_fetch(FetchKind::Champions, now)?;
    Ok(RefreshOutcome::Completed(report))
}

/// Fetches the summoner's match history and persists each game with its
/// teams, participants, and their child rows, then advances the GAMES
/// ledger. Per-entity failures are collected in the report; child-row
/// failures never abort their parent.
///
/// # Errors
///
/// Will return `Err` on transport or decode failure, or if the ledger
/// cannot be advanced (already-persisted games stay).
pub async fn refresh_games(
    client: &dyn UpstreamClient,
    store: &Store,
    summoner_id: &str,
    now: DateTime<Utc>,
) -> Result<RefreshOutcome, CoreError> {
    if !is_stale(store, FetchKind::Games, now, REFRESH_INTERVAL) {
        log::info!("game data is up to date");
        return Ok(RefreshOutcome::Skipped);
    }

    let batch_bytes = client.fetch(&match_history_url(summoner_id)).await?;
    let batch: GameBatch = serde_json::from_slice(&batch_bytes)?;
    log::info!("fetched {} games", batch.data.len());

    let mut report = PersistReport::default();
    for entry in &batch.data {
        // A bad timestamp invalidates this entry only; siblings continue.
        let game = match Game::from_entry(entry, &batch.meta) {
            Ok(game) => game,
            Err(e) => {
                log::error!("error parsing timestamps for game {}: {e}", entry.id);
                report.skip(format!("game {}", entry.id), e);
                continue;
            }
        };

        if let Err(e) = store.insert_game(&game) {
            log::error!("error inserting game {}: {e}", game.id);
            report.skip(format!("game {}", game.id), e);
            continue;
        }
        report.inserted += 1;

        for team in &entry.teams {
            let team_id = match store.insert_team(&game.id, team) {
                Ok(team_id) => team_id,
                Err(e) => {
                    log::error!("error inserting team for game {}: {e}", game.id);
                    report.skip(format!("team {} of game {}", team.key, game.id), e);
                    continue;
                }
            };
            report.inserted += 1;

            // Nulls in the ban list are skipped bans, not rows.
            for banned in team.banned_champions.iter().filter_map(|b| *b) {
                match store.insert_team_banned_champion(team_id, banned as i64) {
                    Ok(()) => report.inserted += 1,
                    Err(e) => {
                        log::error!("error inserting banned champion for team {team_id}: {e}");
                        report.skip(format!("ban {banned} of team {team_id}"), e);
                    }
                }
            }
        }

        for participant in &entry.participants {
            let participant_db_id = match store.insert_participant(&game.id, participant) {
                Ok(id) => id,
                Err(e) => {
                    log::error!("error inserting participant for game {}: {e}", game.id);
                    report.skip(
                        format!(
                            "participant {} of game {}",
                            participant.participant_id as i64, game.id
                        ),
                        e,
                    );
                    continue;
                }
            };
            report.inserted += 1;

            for item in &participant.items {
                match store.insert_participant_item(participant_db_id, *item as i64) {
                    Ok(()) => report.inserted += 1,
                    Err(e) => {
                        log::error!(
                            "error inserting item {item} for participant {participant_db_id}: {e}"
                        );
                        report.skip(format!("item {item} of participant {participant_db_id}"), e);
                    }
                }
            }

            for spell in &participant.spells {
                match store.insert_participant_spell(participant_db_id, *spell as i64) {
                    Ok(()) => report.inserted += 1,
                    Err(e) => {
                        log::error!(
                            "error inserting spell {spell} for participant {participant_db_id}: {e}"
                        );
                        report.skip(
                            format!("spell {spell} of participant {participant_db_id}"),
                            e,
                        );
                    }
                }
            }
        }
    }

    store.set_last_fetch(FetchKind::Games, now)?;
    Ok(RefreshOutcome::Completed(report))
}
