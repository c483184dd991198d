use hashbrown::HashMap;

use crate::{
    gameday::{GameDay, LineupEntry, SET_POINTS, Substitution},
    player::Player,
    types::{PlayerId, Session, SetNumber},
};

fn add_set_points(entries: &[LineupEntry], subs: &[Substitution], out: &mut HashMap<PlayerId, f64>) {
    for entry in entries {
        let points = match subs.iter().find(|s| s.outgoing == entry.player_id) {
            Some(sub) => sub.set_point.split().outgoing,
            None => SET_POINTS,
        };
        *out.entry(entry.player_id).or_insert(0.0) += points;
    }
    for sub in subs {
        *out.entry(sub.incoming).or_insert(0.0) += sub.set_point.split().incoming;
    }
}

/// Playing-time points per player for one game day across both sets.
///
/// A starter substituted out at point `p` earns `p`, the incoming
/// substitute earns `25 - p`, and an unsubstituted starter earns the full
/// 25. Players whose shares work out to zero still appear in the map.
pub fn game_day_points(day: &GameDay) -> HashMap<PlayerId, f64> {
    let mut points = HashMap::new();
    for set in [SetNumber::One, SetNumber::Two] {
        add_set_points(day.lineup.set(set), day.substitutions.set(set), &mut points);
    }
    points
}

/// Applies one completed game day's contribution to the roster.
///
/// Trainings count one per Monday/Wednesday attendance entry; point totals
/// add to `points_played`; each player with a non-zero point total gains
/// exactly one `matches_played`, regardless of how many sets they played.
/// Ids no longer on the roster are skipped. Must run exactly once per
/// completion; edits to completed days go through [`recompute_all`] instead
/// of delta reversal.
pub fn apply_completion(players: &mut HashMap<PlayerId, Player>, day: &GameDay) {
    for session in [Session::Monday, Session::Wednesday] {
        for id in day.attendance(session) {
            if let Some(player) = players.get_mut(id) {
                player.trainings_attended += 1;
            }
        }
    }

    for (id, points) in game_day_points(day) {
        if points == 0.0 {
            continue;
        }
        if let Some(player) = players.get_mut(&id) {
            player.points_played += points;
            player.matches_played += 1;
        }
    }
}

/// Rebuilds every player's statistics from the completed game days.
///
/// The canonical source of truth: resets all stat fields, then folds each
/// completed game day in any order (contributions are commutative).
/// Idempotent, and always safe to re-run wholesale after edits or
/// deletions.
pub fn recompute_all<'a, I>(players: &mut HashMap<PlayerId, Player>, days: I)
where
    I: IntoIterator<Item = &'a GameDay>,
{
    for player in players.values_mut() {
        player.reset_stats();
    }

    for day in days {
        if !day.completed {
            continue;
        }
        apply_completion(players, day);
    }
}
