use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use teamlog::{
    core::store::TeamStore,
    gameday::SetPoint,
    player::PlayerDraft,
    types::{GameDayId, PlayerId, Position, Session, SetNumber},
};

const ROSTER_SIZE: u8 = 10;

#[derive(Debug, Clone)]
enum Action {
    NewWeek { week: u8 },
    Attend { day: u8, session: u8, player: u8, present: bool },
    Assign { day: u8, second_set: bool, player: u8 },
    Unassign { day: u8, second_set: bool, player: u8 },
    Substitute { day: u8, second_set: bool, outgoing: u8, incoming: u8, half_points: u8 },
    Complete { day: u8 },
    Delete { day: u8 },
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0u8..26).prop_map(|week| Action::NewWeek { week }),
        (0u8..8, 0u8..3, 0u8..ROSTER_SIZE, any::<bool>()).prop_map(
            |(day, session, player, present)| Action::Attend {
                day,
                session,
                player,
                present,
            }
        ),
        (0u8..8, any::<bool>(), 0u8..ROSTER_SIZE).prop_map(|(day, second_set, player)| {
            Action::Assign {
                day,
                second_set,
                player,
            }
        }),
        (0u8..8, any::<bool>(), 0u8..ROSTER_SIZE).prop_map(|(day, second_set, player)| {
            Action::Unassign {
                day,
                second_set,
                player,
            }
        }),
        (0u8..8, any::<bool>(), 0u8..ROSTER_SIZE, 0u8..ROSTER_SIZE, 0u8..=50).prop_map(
            |(day, second_set, outgoing, incoming, half_points)| Action::Substitute {
                day,
                second_set,
                outgoing,
                incoming,
                half_points,
            }
        ),
        (0u8..8).prop_map(|day| Action::Complete { day }),
        (0u8..8).prop_map(|day| Action::Delete { day }),
    ]
}

fn seeded_store() -> (TeamStore, Vec<PlayerId>) {
    let mut store = TeamStore::new();
    let ids = (0..ROSTER_SIZE)
        .map(|i| {
            store
                .add_player(PlayerDraft {
                    name: format!("P{i}"),
                    jersey: i + 1,
                    position: Position::GenericPlayer,
                })
                .unwrap()
        })
        .collect();
    (store, ids)
}

fn session_from(idx: u8) -> Session {
    match idx % 3 {
        0 => Session::Monday,
        1 => Session::Wednesday,
        _ => Session::Saturday,
    }
}

fn set_from(second: bool) -> SetNumber {
    if second { SetNumber::Two } else { SetNumber::One }
}

fn half_point_string(half_points: u8) -> String {
    if half_points % 2 == 0 {
        format!("{}", half_points / 2)
    } else {
        format!("{}'5", half_points / 2)
    }
}

fn day_at(store: &TeamStore, idx: u8) -> Option<GameDayId> {
    let days = store.game_days();
    if days.is_empty() {
        None
    } else {
        Some(days[usize::from(idx) % days.len()].id)
    }
}

fn stat_rows(store: &TeamStore) -> Vec<(PlayerId, f64, u32, u32)> {
    store
        .roster()
        .iter()
        .map(|p| (p.id, p.points_played, p.matches_played, p.trainings_attended))
        .collect()
}

proptest! {
    #[test]
    fn point_split_conserves_the_set_value(half_points in 0u8..=50) {
        let point = SetPoint::parse(&half_point_string(half_points)).unwrap();
        let split = point.split();

        prop_assert_eq!(split.outgoing + split.incoming, 25.0);
        prop_assert_eq!(split.outgoing, f64::from(half_points) / 2.0);
    }

    #[test]
    fn recompute_is_canonical_after_random_plans(
        actions in prop::collection::vec(action_strategy(), 1..150)
    ) {
        let (mut store, ids) = seeded_store();
        let base = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();

        for action in actions {
            match action {
                Action::NewWeek { week } => {
                    let _ = store.create_game_day(base + Duration::weeks(i64::from(week)));
                }
                Action::Attend { day, session, player, present } => {
                    if let Some(day) = day_at(&store, day) {
                        let _ = store.set_attendance(
                            day,
                            session_from(session),
                            ids[usize::from(player)],
                            present,
                        );
                    }
                }
                Action::Assign { day, second_set, player } => {
                    if let Some(day) = day_at(&store, day) {
                        let _ = store.assign_to_set(day, set_from(second_set), ids[usize::from(player)]);
                    }
                }
                Action::Unassign { day, second_set, player } => {
                    if let Some(day) = day_at(&store, day) {
                        let _ = store.remove_from_set(day, set_from(second_set), ids[usize::from(player)]);
                    }
                }
                Action::Substitute { day, second_set, outgoing, incoming, half_points } => {
                    if let Some(day) = day_at(&store, day) {
                        let _ = store.record_substitution(
                            day,
                            set_from(second_set),
                            ids[usize::from(outgoing)],
                            ids[usize::from(incoming)],
                            &half_point_string(half_points),
                        );
                    }
                }
                Action::Complete { day } => {
                    if let Some(day) = day_at(&store, day) {
                        let _ = store.complete_game_day(day);
                    }
                }
                Action::Delete { day } => {
                    if let Some(day) = day_at(&store, day) {
                        let _ = store.remove_game_day(day);
                    }
                }
            }
        }

        store.recompute_stats();
        let once = stat_rows(&store);

        store.recompute_stats();
        prop_assert_eq!(stat_rows(&store), once.clone());

        // a store rebuilt from the exported documents derives identical stats
        let mut rebuilt = TeamStore::from_collections(store.export_roster(), store.export_game_days());
        rebuilt.recompute_stats();
        prop_assert_eq!(stat_rows(&rebuilt), once);

        for player in store.roster() {
            prop_assert_eq!(store.player_by_jersey(player.jersey).map(|p| p.id), Some(player.id));
        }
    }
}
