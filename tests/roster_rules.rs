use chrono::NaiveDate;

use teamlog::{
    core::store::{StoreError, TeamStore},
    player::{PlayerDraft, PlayerPatch},
    types::{Position, Session, SetNumber},
};

fn draft(name: &str, jersey: u8) -> PlayerDraft {
    PlayerDraft {
        name: name.to_string(),
        jersey,
        position: Position::GenericPlayer,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn add_player_yields_monotonic_ids() {
    let mut store = TeamStore::new();
    let id1 = store.add_player(draft("Ana", 4)).unwrap();
    let id2 = store.add_player(draft("Bea", 7)).unwrap();
    let id3 = store.add_player(draft("Cleo", 12)).unwrap();

    assert_eq!((id1, id2, id3), (1, 2, 3));
}

#[test]
fn duplicate_jersey_rejected_and_roster_unchanged() {
    let mut store = TeamStore::new();
    let holder = store.add_player(draft("Ana", 4)).unwrap();

    let err = store.add_player(draft("Bea", 4)).unwrap_err();
    assert_eq!(err, StoreError::JerseyTaken { jersey: 4, holder });
    assert_eq!(store.roster().len(), 1);
}

#[test]
fn jersey_out_of_range_rejected() {
    let mut store = TeamStore::new();

    assert_eq!(
        store.add_player(draft("Ana", 0)).unwrap_err(),
        StoreError::JerseyOutOfRange(0)
    );
    assert_eq!(
        store.add_player(draft("Bea", 100)).unwrap_err(),
        StoreError::JerseyOutOfRange(100)
    );
    assert!(store.roster().is_empty());
}

#[test]
fn patch_revalidates_jersey_and_moves_index() {
    let mut store = TeamStore::new();
    let ana = store.add_player(draft("Ana", 4)).unwrap();
    let bea = store.add_player(draft("Bea", 7)).unwrap();

    let err = store
        .patch_player(
            bea,
            PlayerPatch {
                jersey: Some(4),
                ..PlayerPatch::default()
            },
        )
        .unwrap_err();
    assert_eq!(err, StoreError::JerseyTaken { jersey: 4, holder: ana });

    store
        .patch_player(
            bea,
            PlayerPatch {
                jersey: Some(9),
                name: Some("Beatriz".to_string()),
                ..PlayerPatch::default()
            },
        )
        .unwrap();

    assert_eq!(store.player_by_jersey(9).map(|p| p.id), Some(bea));
    assert!(store.player_by_jersey(7).is_none());
    assert_eq!(store.get_player(bea).unwrap().name, "Beatriz");
}

#[test]
fn patch_unknown_player_is_not_found() {
    let mut store = TeamStore::new();
    assert_eq!(
        store.patch_player(42, PlayerPatch::default()).unwrap_err(),
        StoreError::MissingPlayer(42)
    );
}

#[test]
fn remove_player_frees_jersey_and_scrubs_pending_drafts() {
    let mut store = TeamStore::new();
    let ana = store.add_player(draft("Ana", 4)).unwrap();
    let bea = store.add_player(draft("Bea", 7)).unwrap();

    let day = store.create_game_day(date(2026, 3, 2)).unwrap();
    store
        .set_attendance(day, Session::Saturday, ana, true)
        .unwrap();
    store
        .set_attendance(day, Session::Saturday, bea, true)
        .unwrap();
    store.assign_to_set(day, SetNumber::One, ana).unwrap();
    store
        .record_substitution(day, SetNumber::One, ana, bea, "10")
        .unwrap();

    store.remove_player(bea).unwrap();

    let pending = store.get_game_day(day).unwrap();
    assert!(!pending.attendance(Session::Saturday).contains(&bea));
    assert!(pending.substitutions.set1.is_empty());
    assert!(pending.lineup.contains(SetNumber::One, ana));

    // the freed jersey can be reused
    let cleo = store.add_player(draft("Cleo", 7)).unwrap();
    assert_eq!(store.player_by_jersey(7).map(|p| p.id), Some(cleo));
}

#[test]
fn game_day_anchors_on_week_monday_and_is_unique_per_week() {
    let mut store = TeamStore::new();

    // Wednesday 2026-08-05 belongs to the week of Monday 2026-08-03.
    let id = store.create_game_day(date(2026, 8, 5)).unwrap();
    assert_eq!(store.get_game_day(id).unwrap().monday, date(2026, 8, 3));

    let err = store.create_game_day(date(2026, 8, 8)).unwrap_err();
    assert_eq!(err, StoreError::MondayTaken(date(2026, 8, 3)));

    let next = store.create_game_day(date(2026, 8, 10)).unwrap();
    assert_eq!(store.get_game_day(next).unwrap().monday, date(2026, 8, 10));
    assert_eq!(store.game_days().len(), 2);
}

#[test]
fn pending_game_day_is_first_incomplete() {
    let mut store = TeamStore::new();
    let first = store.create_game_day(date(2026, 8, 3)).unwrap();
    let second = store.create_game_day(date(2026, 8, 10)).unwrap();

    assert_eq!(store.pending_game_day().map(|d| d.id), Some(first));

    store.remove_game_day(first).unwrap();
    assert_eq!(store.pending_game_day().map(|d| d.id), Some(second));

    store.remove_game_day(second).unwrap();
    assert!(store.pending_game_day().is_none());
}

#[test]
fn game_day_lookup_by_monday_normalizes_the_date() {
    let mut store = TeamStore::new();
    let id = store.create_game_day(date(2026, 8, 3)).unwrap();

    assert_eq!(store.game_day_by_monday(date(2026, 8, 7)).map(|d| d.id), Some(id));
    assert!(store.game_day_by_monday(date(2026, 8, 10)).is_none());
}
