use chrono::NaiveDate;
use tempfile::TempDir;

use teamlog::{
    core::store::TeamStore,
    persist::{TeamDocs, sqlite::SqliteTeamDocs},
    player::PlayerDraft,
    types::{PlayerId, Position, Session, SetNumber},
};

fn draft(name: &str, jersey: u8) -> PlayerDraft {
    PlayerDraft {
        name: name.to_string(),
        jersey,
        position: Position::MiddleBlocker,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Store with a completed week (line-up plus one substitution) and a
/// pending draft week.
fn seeded_store() -> TeamStore {
    let mut store = TeamStore::new();
    let ids: Vec<PlayerId> = (0..7u8)
        .map(|i| store.add_player(draft(&format!("P{i}"), i + 1)).unwrap())
        .collect();

    let week1 = store.create_game_day(date(2026, 3, 2)).unwrap();
    for id in &ids {
        store
            .set_attendance(week1, Session::Saturday, *id, true)
            .unwrap();
    }
    store
        .set_attendance(week1, Session::Monday, ids[0], true)
        .unwrap();
    for id in &ids[..6] {
        store.assign_to_set(week1, SetNumber::One, *id).unwrap();
    }
    store
        .record_substitution(week1, SetNumber::One, ids[0], ids[6], "12'5")
        .unwrap();
    store.complete_game_day(week1).unwrap();

    let week2 = store.create_game_day(date(2026, 3, 9)).unwrap();
    store
        .set_attendance(week2, Session::Wednesday, ids[1], true)
        .unwrap();

    store
}

#[test]
fn document_round_trip_preserves_collections() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("team.db");

    let store = seeded_store();
    let mut sink = SqliteTeamDocs::open(&db_path).expect("open sqlite");
    sink.save_roster(&store.export_roster()).expect("save roster");
    sink.save_game_days(&store.export_game_days())
        .expect("save game days");

    drop(sink);

    let reopened = SqliteTeamDocs::open(&db_path).expect("reopen");
    let replayed = reopened.load_store().expect("load");

    assert_eq!(replayed.export_roster(), store.export_roster());
    assert_eq!(replayed.export_game_days(), store.export_game_days());
}

#[test]
fn resave_overwrites_and_id_allocation_resumes() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("team.db");

    let mut store = TeamStore::new();
    store.add_player(draft("Ana", 4)).expect("add");

    let mut sink = SqliteTeamDocs::open(&db_path).expect("open sqlite");
    sink.save_roster(&store.export_roster()).expect("save");

    store.add_player(draft("Bea", 7)).expect("add");
    sink.save_roster(&store.export_roster()).expect("resave");

    drop(sink);

    let reopened = SqliteTeamDocs::open(&db_path).expect("reopen");
    let mut replayed = reopened.load_store().expect("load");
    assert_eq!(replayed.export_roster().len(), 2);

    let next = replayed.add_player(draft("Cleo", 9)).expect("add after load");
    assert_eq!(next, 3);
}

#[test]
fn empty_database_loads_an_empty_store() {
    let docs = SqliteTeamDocs::open_in_memory().expect("open in memory");
    let mut store = docs.load_store().expect("load");

    assert!(store.export_roster().is_empty());
    assert!(store.export_game_days().is_empty());
    assert_eq!(store.add_player(draft("Ana", 4)).expect("add"), 1);
}
