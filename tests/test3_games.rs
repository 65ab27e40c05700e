mod common;

use crate::common::StubUpstream;
use chrono::Utc;
use rusty_rift::client::match_history_url;
use rusty_rift::controller::refresh::{RefreshOutcome, refresh_games};
use rusty_rift::error::CoreError;
use rusty_rift::model::{Champion, FetchKind};
use rusty_rift::storage::Store;
use serde_json::{Value, json};

const SUMMONER: &str = "summoner-1";

/// Store with champion 64 already present. Participant rows reference the
/// champions table, and the real flow loads champions before games.
fn seeded_store() -> Store {
    let champion: Champion = serde_json::from_value(json!({
        "id": "LeeSin",
        "key": "64",
        "name": "Lee Sin",
        "title": "the Blind Monk",
        "blurb": "As a young teen, Lee Sin was intent on becoming a summoner.",
        "partype": "Energy",
        "info": { "attack": 8.0, "defense": 5.0, "magic": 3.0, "difficulty": 6.0 },
        "stats": { "hp": 645.0, "movespeed": 345.0 },
        "image": { "full": "LeeSin.png", "sprite": "champion2.png", "group": "champion", "version": "15.1.1" },
        "tags": ["Fighter", "Assassin"]
    }))
    .expect("champion fixture");

    let store = Store::open_in_memory().unwrap();
    store.upsert_champion(&champion).unwrap();
    store
}

fn entry(id: &str, created_at: &str, is_recorded: Value) -> Value {
    json!({
        "id": id,
        "created_at": created_at,
        "game_length_second": 1890.9,
        "average_tier_info": {
            "tier": "PLATINUM",
            "division": 4,
            "tier_image_url": "https://example.com/plat.png",
            "border_image_url": "https://example.com/plat-border.png"
        },
        "is_remake": false,
        "meta_version": "1",
        "game_type": "SOLORANKED",
        "is_opscore_active": true,
        "is_recorded": is_recorded,
        "version": "15.1.1.123",
        "memo": null,
        "record_info": { "ignored": true },
        "teams": [{
            "key": "RED",
            "game_stat": {
                "is_win": false,
                "champion_first": false,
                "inhibitor_first": false,
                "rift_herald_first": false,
                "death": 34,
                "champion_kill": 21,
                "inhibitor_kill": 0,
                "dragon_first": true,
                "horde_first": false,
                "rift_herald_kill": 0,
                "is_remake": false,
                "gold_earned": 54321,
                "kill": 21,
                "tower_first": false,
                "horde_kill": 2,
                "assist": 25,
                "dragon_kill": 2,
                "baron_kill": 0,
                "baron_first": false,
                "tower_kill": 3
            },
            "banned_champions": [null, 64.0, 157.0]
        }],
        "participants": [{
            "participant_id": 6,
            "champion_id": 64,
            "position": "JUNGLE",
            "role": "NONE",
            "summoner": { "name": "JungleDiff" },
            "rune": { "primary_page_id": 8000.0, "primary_rune_id": 8010.0, "secondary_page_id": 8400.0 },
            "stats": {
                "kill": 3,
                "death": 7,
                "assist": 9,
                "gold_earned": 10456.2,
                "total_damage_dealt_to_champions": 15000,
                "total_damage_taken": 30123,
                "vision_score": 31,
                "lane_score": 55,
                "result": "LOSE",
                "ward_place": 11,
                "op_score_rank": 6,
                "barrack_kill": 0,
                "total_heal": 9800
            },
            "team_key": "RED",
            "game_type": "SOLORANKED",
            "is_remake": false,
            "items": [6630.0, 3047.0, 1031.0],
            "spells": [11.0, 4.0]
        }]
    })
}

fn batch_body(entries: Vec<Value>) -> Vec<u8> {
    json!({
        "meta": {
            "first_game_created_at": "2026-01-02T03:04:05+00:00",
            "last_game_created_at": "2026-01-09T03:04:05+00:00"
        },
        "data": entries
    })
    .to_string()
    .into_bytes()
}

fn stub_with(entries: Vec<Value>) -> StubUpstream {
    StubUpstream::new().with(match_history_url(SUMMONER), batch_body(entries))
}

#[tokio::test]
async fn test3_fresh_ledger_skips_game_refresh() {
    let store = Store::open_in_memory().unwrap();
    let now = Utc::now();
    store.set_last_fetch(FetchKind::Games, now).unwrap();

    let stub = StubUpstream::new();
    let outcome = refresh_games(&stub, &store, SUMMONER, now).await.unwrap();

    assert!(matches!(outcome, RefreshOutcome::Skipped));
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test3_bad_created_at_skips_only_that_entry() {
    let store = seeded_store();
    let stub = stub_with(vec![
        entry("g1", "not-a-timestamp", json!(1)),
        entry("g2", "2026-01-05T10:20:30+00:00", json!(1)),
    ]);

    let outcome = refresh_games(&stub, &store, SUMMONER, Utc::now())
        .await
        .unwrap();

    let RefreshOutcome::Completed(report) = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].entity, "game g1");

    // g1 left no rows behind, not even children.
    assert!(store.get_game("g1").unwrap().is_none());
    assert!(store.get_teams("g1").unwrap().is_empty());
    assert!(store.get_participants("g1").unwrap().is_empty());

    // Its sibling persisted in full.
    assert!(store.get_game("g2").unwrap().is_some());
    assert_eq!(store.get_teams("g2").unwrap().len(), 1);
    assert_eq!(store.get_participants("g2").unwrap().len(), 1);

    // The run still counts as a success and advances the ledger.
    assert!(store.get_last_fetch(FetchKind::Games).is_ok());
}

#[tokio::test]
async fn test3_is_recorded_coercion() {
    let store = seeded_store();
    let stub = stub_with(vec![
        entry("g-null", "2026-01-05T10:20:30+00:00", Value::Null),
        entry("g-zero", "2026-01-05T11:20:30+00:00", json!(0)),
        entry("g-one", "2026-01-05T12:20:30+00:00", json!(1)),
        entry("g-frac", "2026-01-05T13:20:30+00:00", json!(2.5)),
    ]);

    refresh_games(&stub, &store, SUMMONER, Utc::now())
        .await
        .unwrap();

    assert!(!store.get_game("g-null").unwrap().unwrap().is_recorded);
    assert!(!store.get_game("g-zero").unwrap().unwrap().is_recorded);
    assert!(store.get_game("g-one").unwrap().unwrap().is_recorded);
    assert!(store.get_game("g-frac").unwrap().unwrap().is_recorded);
}

#[tokio::test]
async fn test3_persists_children_and_skips_null_bans() {
    let store = seeded_store();
    let stub = stub_with(vec![entry("g1", "2026-01-05T10:20:30+00:00", json!(1))]);

    let outcome = refresh_games(&stub, &store, SUMMONER, Utc::now())
        .await
        .unwrap();

    let RefreshOutcome::Completed(report) = outcome else {
        panic!("expected a completed run");
    };
    assert!(report.failures.is_empty());
    // game + team + 2 bans + participant + 3 items + 2 spells
    assert_eq!(report.inserted, 10);

    let game = store.get_game("g1").unwrap().expect("game row");
    assert_eq!(game.game_length, 1890); // documented truncation
    assert_eq!(game.first_game_created_at, "2026-01-02T03:04:05+00:00");
    assert_eq!(game.last_game_created_at, "2026-01-09T03:04:05+00:00");

    let teams = store.get_teams("g1").unwrap();
    assert_eq!(teams.len(), 1);
    assert_eq!(
        store.get_team_banned_champions(teams[0].team_id).unwrap(),
        vec![64, 157]
    );

    let participants = store.get_participants("g1").unwrap();
    assert_eq!(participants.len(), 1);
    let p = &participants[0];
    assert_eq!(p.champion_id, "64");
    assert_eq!(p.gold_earned, 10456);
    assert_eq!(
        store.get_participant_items(p.id).unwrap(),
        vec![6630, 3047, 1031]
    );
    assert_eq!(store.get_participant_spells(p.id).unwrap(), vec![11, 4]);
}

#[tokio::test]
async fn test3_transport_failure_leaves_ledger_untouched() {
    let store = Store::open_in_memory().unwrap();
    let stub = StubUpstream::new();

    let result = refresh_games(&stub, &store, SUMMONER, Utc::now()).await;

    assert!(matches!(result, Err(CoreError::Transport(_))));
    assert!(store.get_last_fetch(FetchKind::Games).is_err());
}

#[tokio::test]
async fn test3_structurally_invalid_batch_is_a_decode_error() {
    let store = Store::open_in_memory().unwrap();
    let stub =
        StubUpstream::new().with(match_history_url(SUMMONER), br#"{"meta":{}}"#.to_vec());

    let result = refresh_games(&stub, &store, SUMMONER, Utc::now()).await;

    assert!(matches!(result, Err(CoreError::Decode(_))));
    assert!(store.get_game("g1").unwrap().is_none());
}
