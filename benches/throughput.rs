use chrono::{Duration, NaiveDate};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use teamlog::{
    core::store::TeamStore,
    player::PlayerDraft,
    types::{PlayerId, Position, Session, SetNumber},
};

fn draft(jersey: u8) -> PlayerDraft {
    PlayerDraft {
        name: format!("Player {jersey}"),
        jersey,
        position: Position::GenericPlayer,
    }
}

fn seeded_season(weeks: i64) -> TeamStore {
    let mut store = TeamStore::new();
    let ids: Vec<PlayerId> = (1..=12u8)
        .map(|i| store.add_player(draft(i)).expect("add"))
        .collect();

    let base = NaiveDate::from_ymd_opt(2025, 1, 6).expect("date");
    for week in 0..weeks {
        let day = store
            .create_game_day(base + Duration::weeks(week))
            .expect("create");
        for id in &ids {
            store
                .set_attendance(day, Session::Saturday, *id, true)
                .expect("attend");
        }
        for id in &ids[..6] {
            store.assign_to_set(day, SetNumber::One, *id).expect("assign");
        }
        for id in &ids[6..] {
            store.assign_to_set(day, SetNumber::Two, *id).expect("assign");
        }
        store
            .record_substitution(day, SetNumber::One, ids[0], ids[6], "12'5")
            .expect("sub");
        store.complete_game_day(day).expect("complete");
    }

    store
}

fn bench_roster_inserts(c: &mut Criterion) {
    c.bench_function("store_add_full_roster", |b| {
        b.iter(|| {
            let mut store = TeamStore::new();
            for jersey in 1..=99u8 {
                let _ = store.add_player(draft(jersey)).expect("add");
            }
        });
    });
}

fn bench_recompute_season(c: &mut Criterion) {
    let mut store = seeded_season(104);
    c.bench_function("recompute_two_seasons", |b| {
        b.iter(|| {
            store.recompute_stats();
        });
    });
}

fn bench_suggested_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("suggested_order");

    for weeks in [13i64, 26, 52] {
        let store = seeded_season(weeks);
        let last = store.game_days().last().map(|d| d.id).expect("day");
        group.bench_with_input(BenchmarkId::from_parameter(weeks), &weeks, |b, _| {
            b.iter(|| {
                let _ = store.suggested_order(last).expect("order");
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_roster_inserts,
    bench_recompute_season,
    bench_suggested_order
);
criterion_main!(benches);
