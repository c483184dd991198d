use hashbrown::{HashMap, HashSet};

use crate::{
    gameday::{
        GameDay, LineupEntry, MIN_SATURDAY_ATTENDANCE, PointSplit, SET_CAPACITY, SetPoint,
        Substitution,
    },
    player::Player,
    types::{PlayerId, Session, SetNumber},
};

#[derive(Debug, Clone, PartialEq)]
pub enum LineupError {
    SetFull(SetNumber),
    AlreadyInSet { player: PlayerId, set: SetNumber },
    NotAttendingSaturday(PlayerId),
    NotInLineup { player: PlayerId, set: SetNumber },
    NoSubstitution { player: PlayerId, set: SetNumber },
    BadSetPoint(String),
    AlreadySubstituted { player: PlayerId, set: SetNumber },
    Uncovered(Vec<PlayerId>),
    NotEnoughAttendees { attending: usize, required: usize },
    GameDayCompleted,
}

/// Appends `player` to a set's line-up.
///
/// A player may be a member of both sets, but only once per set, and the
/// set holds at most six players.
pub fn assign_to_set(day: &mut GameDay, player: &Player, set: SetNumber) -> Result<(), LineupError> {
    if day.completed {
        return Err(LineupError::GameDayCompleted);
    }
    if !day.attends(Session::Saturday, player.id) {
        return Err(LineupError::NotAttendingSaturday(player.id));
    }
    if day.lineup.contains(set, player.id) {
        return Err(LineupError::AlreadyInSet {
            player: player.id,
            set,
        });
    }
    if day.lineup.set(set).len() >= SET_CAPACITY {
        return Err(LineupError::SetFull(set));
    }

    day.lineup.set_mut(set).push(LineupEntry::capture(player));
    Ok(())
}

/// Removes `player` from a set's line-up.
///
/// Substitutions whose outgoing party is the removed player are dropped
/// with it: a substitution cannot reference a starter no longer in the
/// line-up.
pub fn remove_from_set(day: &mut GameDay, set: SetNumber, player: PlayerId) -> Result<(), LineupError> {
    if day.completed {
        return Err(LineupError::GameDayCompleted);
    }

    day.lineup.set_mut(set).retain(|e| e.player_id != player);
    day.substitutions.set_mut(set).retain(|s| s.outgoing != player);
    Ok(())
}

/// Records a substitution and returns the resulting point split.
///
/// `raw_point` uses the apostrophe decimal format; `"0"` and `"25"` are
/// legal edge values, not errors.
pub fn record_substitution(
    day: &mut GameDay,
    set: SetNumber,
    outgoing: PlayerId,
    incoming: PlayerId,
    raw_point: &str,
) -> Result<PointSplit, LineupError> {
    if day.completed {
        return Err(LineupError::GameDayCompleted);
    }
    for player in [outgoing, incoming] {
        if !day.attends(Session::Saturday, player) {
            return Err(LineupError::NotAttendingSaturday(player));
        }
    }
    if !day.lineup.contains(set, outgoing) {
        return Err(LineupError::NotInLineup {
            player: outgoing,
            set,
        });
    }
    if day.substitutions.set(set).iter().any(|s| s.outgoing == outgoing) {
        return Err(LineupError::AlreadySubstituted {
            player: outgoing,
            set,
        });
    }

    let set_point = SetPoint::parse(raw_point).map_err(|err| LineupError::BadSetPoint(err.0))?;
    let split = set_point.split();
    day.substitutions.set_mut(set).push(Substitution {
        outgoing,
        incoming,
        set_point,
    });
    Ok(split)
}

/// Drops a recorded substitution identified by its outgoing party.
pub fn remove_substitution(
    day: &mut GameDay,
    set: SetNumber,
    outgoing: PlayerId,
) -> Result<(), LineupError> {
    if day.completed {
        return Err(LineupError::GameDayCompleted);
    }

    let subs = day.substitutions.set_mut(set);
    match subs.iter().position(|s| s.outgoing == outgoing) {
        Some(pos) => {
            subs.remove(pos);
            Ok(())
        }
        None => Err(LineupError::NoSubstitution {
            player: outgoing,
            set,
        }),
    }
}

/// Saturday attendees reachable neither through a line-up spot nor as an
/// incoming substitute.
pub fn uncovered(day: &GameDay) -> Vec<PlayerId> {
    let mut covered: HashSet<PlayerId> = HashSet::new();
    for set in [SetNumber::One, SetNumber::Two] {
        covered.extend(day.lineup.set(set).iter().map(|e| e.player_id));
        covered.extend(day.substitutions.set(set).iter().map(|s| s.incoming));
    }

    day.attendance(Session::Saturday)
        .iter()
        .copied()
        .filter(|id| !covered.contains(id))
        .collect()
}

/// Returns true when the game day satisfies both completion gates.
pub fn can_complete(day: &GameDay) -> bool {
    day.attendance(Session::Saturday).len() >= MIN_SATURDAY_ATTENDANCE && uncovered(day).is_empty()
}

/// Locks the game day once every attendee is covered and enough players
/// showed up for Saturday.
pub fn complete(day: &mut GameDay) -> Result<(), LineupError> {
    if day.completed {
        return Err(LineupError::GameDayCompleted);
    }

    let attending = day.attendance(Session::Saturday).len();
    if attending < MIN_SATURDAY_ATTENDANCE {
        return Err(LineupError::NotEnoughAttendees {
            attending,
            required: MIN_SATURDAY_ATTENDANCE,
        });
    }

    let missing = uncovered(day);
    if !missing.is_empty() {
        return Err(LineupError::Uncovered(missing));
    }

    day.completed = true;
    Ok(())
}

/// Advisory assignment order for Saturday attendees: most trainings this
/// week first, then the least played by points, matches, and finally jersey
/// number. Never used to auto-assign.
pub fn suggested_order(day: &GameDay, players: &HashMap<PlayerId, Player>) -> Vec<PlayerId> {
    let mut ranked: Vec<&Player> = day
        .attendance(Session::Saturday)
        .iter()
        .filter_map(|id| players.get(id))
        .collect();

    ranked.sort_by(|a, b| {
        trainings_this_week(day, b.id)
            .cmp(&trainings_this_week(day, a.id))
            .then_with(|| a.points_played.total_cmp(&b.points_played))
            .then_with(|| a.matches_played.cmp(&b.matches_played))
            .then_with(|| a.jersey.cmp(&b.jersey))
    });

    ranked.into_iter().map(|p| p.id).collect()
}

fn trainings_this_week(day: &GameDay, player: PlayerId) -> u8 {
    u8::from(day.attends(Session::Monday, player))
        + u8::from(day.attends(Session::Wednesday, player))
}
