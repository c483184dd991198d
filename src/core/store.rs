use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use hashbrown::HashMap;

use crate::{
    engine::{
        planner::{self, LineupError},
        stats,
    },
    gameday::{GameDay, PointSplit, week_monday},
    player::{JERSEY_MAX, JERSEY_MIN, Player, PlayerDraft, PlayerPatch},
    types::{GameDayId, PlayerId, Revision, Session, SetNumber},
};

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    MissingPlayer(PlayerId),
    MissingGameDay(GameDayId),
    JerseyOutOfRange(u8),
    JerseyTaken { jersey: u8, holder: PlayerId },
    MondayTaken(NaiveDate),
    Lineup(LineupError),
}

impl From<LineupError> for StoreError {
    fn from(value: LineupError) -> Self {
        Self::Lineup(value)
    }
}

/// Collections that changed since the last drain, one flag per document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyDocs {
    pub roster: bool,
    pub game_days: bool,
}

impl DirtyDocs {
    pub fn any(self) -> bool {
        self.roster || self.game_days
    }
}

#[derive(Debug, Default)]
pub struct TeamStore {
    players: HashMap<PlayerId, Player>,
    player_order: Vec<PlayerId>,
    by_jersey: HashMap<u8, PlayerId>,
    game_days: HashMap<GameDayId, GameDay>,
    game_day_order: Vec<GameDayId>,
    by_monday: HashMap<NaiveDate, GameDayId>,
    dirty: DirtyDocs,
    revision: Revision,
    next_player_id: PlayerId,
    next_game_day_id: GameDayId,
}

impl TeamStore {
    pub fn new() -> Self {
        Self {
            next_player_id: 1,
            next_game_day_id: 1,
            ..Self::default()
        }
    }

    /// Rebuilds a store from persisted collections, restoring indices and
    /// id allocation.
    pub fn from_collections(players: Vec<Player>, game_days: Vec<GameDay>) -> Self {
        let mut store = Self::new();

        for player in players {
            store.next_player_id = store.next_player_id.max(player.id.saturating_add(1));
            store.by_jersey.insert(player.jersey, player.id);
            store.player_order.push(player.id);
            store.players.insert(player.id, player);
        }

        for day in game_days {
            store.next_game_day_id = store.next_game_day_id.max(day.id.saturating_add(1));
            store.by_monday.insert(day.monday, day.id);
            store.game_day_order.push(day.id);
            store.game_days.insert(day.id, day);
        }

        store
    }

    pub fn export_roster(&self) -> Vec<Player> {
        self.player_order
            .iter()
            .filter_map(|id| self.players.get(id).cloned())
            .collect()
    }

    pub fn export_game_days(&self) -> Vec<GameDay> {
        self.game_day_order
            .iter()
            .filter_map(|id| self.game_days.get(id).cloned())
            .collect()
    }

    pub fn add_player(&mut self, draft: PlayerDraft) -> Result<PlayerId, StoreError> {
        self.check_jersey_free(draft.jersey, None)?;

        let id = self.next_player_id;
        self.next_player_id += 1;

        let player = Player {
            id,
            name: draft.name,
            jersey: draft.jersey,
            position: draft.position,
            points_played: 0.0,
            matches_played: 0,
            trainings_attended: 0,
            created_ts_ms: now_ms(),
        };

        self.by_jersey.insert(player.jersey, id);
        self.player_order.push(id);
        self.players.insert(id, player);
        self.touch_roster();
        Ok(id)
    }

    pub fn patch_player(&mut self, id: PlayerId, patch: PlayerPatch) -> Result<(), StoreError> {
        if !self.players.contains_key(&id) {
            return Err(StoreError::MissingPlayer(id));
        }
        if let Some(jersey) = patch.jersey {
            self.check_jersey_free(jersey, Some(id))?;
        }

        let rec = self.players.get_mut(&id).ok_or(StoreError::MissingPlayer(id))?;
        let old_jersey = rec.jersey;
        patch.apply_to(rec);
        let new_jersey = rec.jersey;

        if new_jersey != old_jersey {
            self.by_jersey.remove(&old_jersey);
            self.by_jersey.insert(new_jersey, id);
        }

        self.touch_roster();
        Ok(())
    }

    /// Removes a player from the roster and scrubs them from pending drafts.
    ///
    /// Completed game days keep their historical references; the statistics
    /// engine skips ids no longer on the roster.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, StoreError> {
        let player = self.players.remove(&id).ok_or(StoreError::MissingPlayer(id))?;
        self.by_jersey.remove(&player.jersey);
        Self::remove_from_vec(&mut self.player_order, id);

        let mut days_changed = false;
        for day in self.game_days.values_mut() {
            if day.completed {
                continue;
            }
            let mut changed = false;
            for session in [Session::Monday, Session::Wednesday, Session::Saturday] {
                let list = day.attendance_mut(session);
                let before = list.len();
                list.retain(|x| *x != id);
                changed |= list.len() != before;
            }
            for set in [SetNumber::One, SetNumber::Two] {
                let entries = day.lineup.set_mut(set);
                let before = entries.len();
                entries.retain(|e| e.player_id != id);
                changed |= entries.len() != before;

                let subs = day.substitutions.set_mut(set);
                let before = subs.len();
                subs.retain(|s| s.outgoing != id && s.incoming != id);
                changed |= subs.len() != before;
            }
            days_changed |= changed;
        }

        self.touch_roster();
        if days_changed {
            self.touch_game_days();
        }
        Ok(player)
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_by_jersey(&self, jersey: u8) -> Option<&Player> {
        self.by_jersey.get(&jersey).and_then(|id| self.players.get(id))
    }

    pub fn roster(&self) -> Vec<&Player> {
        self.player_order
            .iter()
            .filter_map(|id| self.players.get(id))
            .collect()
    }

    pub fn roster_cloned(&self) -> Vec<Player> {
        self.export_roster()
    }

    pub fn create_game_day(&mut self, date: NaiveDate) -> Result<GameDayId, StoreError> {
        let monday = week_monday(date);
        if self.by_monday.contains_key(&monday) {
            return Err(StoreError::MondayTaken(monday));
        }

        let id = self.next_game_day_id;
        self.next_game_day_id += 1;

        self.by_monday.insert(monday, id);
        self.game_day_order.push(id);
        self.game_days.insert(id, GameDay::new(id, monday, now_ms()));
        self.touch_game_days();
        Ok(id)
    }

    /// Removes a game day; deleting a completed one rebuilds every player's
    /// statistics from the surviving records.
    pub fn remove_game_day(&mut self, id: GameDayId) -> Result<GameDay, StoreError> {
        let day = self.game_days.remove(&id).ok_or(StoreError::MissingGameDay(id))?;
        self.by_monday.remove(&day.monday);
        Self::remove_from_vec(&mut self.game_day_order, id);
        self.touch_game_days();

        if day.completed {
            self.recompute_stats();
        }
        Ok(day)
    }

    pub fn get_game_day(&self, id: GameDayId) -> Option<&GameDay> {
        self.game_days.get(&id)
    }

    pub fn game_day_by_monday(&self, date: NaiveDate) -> Option<&GameDay> {
        self.by_monday
            .get(&week_monday(date))
            .and_then(|id| self.game_days.get(id))
    }

    pub fn game_days(&self) -> Vec<&GameDay> {
        self.game_day_order
            .iter()
            .filter_map(|id| self.game_days.get(id))
            .collect()
    }

    pub fn game_days_cloned(&self) -> Vec<GameDay> {
        self.export_game_days()
    }

    /// First game day still in planning, for the pending-game-day notice.
    pub fn pending_game_day(&self) -> Option<&GameDay> {
        self.game_day_order
            .iter()
            .filter_map(|id| self.game_days.get(id))
            .find(|day| !day.completed)
    }

    pub fn set_attendance(
        &mut self,
        day_id: GameDayId,
        session: Session,
        player: PlayerId,
        present: bool,
    ) -> Result<(), StoreError> {
        if !self.players.contains_key(&player) {
            return Err(StoreError::MissingPlayer(player));
        }
        let day = self
            .game_days
            .get_mut(&day_id)
            .ok_or(StoreError::MissingGameDay(day_id))?;
        if day.completed {
            return Err(LineupError::GameDayCompleted.into());
        }

        let list = day.attendance_mut(session);
        let pos = list.iter().position(|x| *x == player);
        match (present, pos) {
            (true, None) => list.push(player),
            (false, Some(idx)) => {
                list.remove(idx);
            }
            _ => return Ok(()),
        }

        self.touch_game_days();
        Ok(())
    }

    pub fn assign_to_set(
        &mut self,
        day_id: GameDayId,
        set: SetNumber,
        player_id: PlayerId,
    ) -> Result<(), StoreError> {
        let player = self
            .players
            .get(&player_id)
            .ok_or(StoreError::MissingPlayer(player_id))?;
        let day = self
            .game_days
            .get_mut(&day_id)
            .ok_or(StoreError::MissingGameDay(day_id))?;
        planner::assign_to_set(day, player, set)?;
        self.touch_game_days();
        Ok(())
    }

    pub fn remove_from_set(
        &mut self,
        day_id: GameDayId,
        set: SetNumber,
        player_id: PlayerId,
    ) -> Result<(), StoreError> {
        let day = self
            .game_days
            .get_mut(&day_id)
            .ok_or(StoreError::MissingGameDay(day_id))?;
        planner::remove_from_set(day, set, player_id)?;
        self.touch_game_days();
        Ok(())
    }

    pub fn record_substitution(
        &mut self,
        day_id: GameDayId,
        set: SetNumber,
        outgoing: PlayerId,
        incoming: PlayerId,
        raw_point: &str,
    ) -> Result<PointSplit, StoreError> {
        let day = self
            .game_days
            .get_mut(&day_id)
            .ok_or(StoreError::MissingGameDay(day_id))?;
        let split = planner::record_substitution(day, set, outgoing, incoming, raw_point)?;
        self.touch_game_days();
        Ok(split)
    }

    pub fn remove_substitution(
        &mut self,
        day_id: GameDayId,
        set: SetNumber,
        outgoing: PlayerId,
    ) -> Result<(), StoreError> {
        let day = self
            .game_days
            .get_mut(&day_id)
            .ok_or(StoreError::MissingGameDay(day_id))?;
        planner::remove_substitution(day, set, outgoing)?;
        self.touch_game_days();
        Ok(())
    }

    pub fn uncovered(&self, day_id: GameDayId) -> Result<Vec<PlayerId>, StoreError> {
        let day = self
            .game_days
            .get(&day_id)
            .ok_or(StoreError::MissingGameDay(day_id))?;
        Ok(planner::uncovered(day))
    }

    pub fn suggested_order(&self, day_id: GameDayId) -> Result<Vec<PlayerId>, StoreError> {
        let day = self
            .game_days
            .get(&day_id)
            .ok_or(StoreError::MissingGameDay(day_id))?;
        Ok(planner::suggested_order(day, &self.players))
    }

    /// Validates coverage, locks the game day, and applies its statistics
    /// delta exactly once.
    pub fn complete_game_day(&mut self, day_id: GameDayId) -> Result<(), StoreError> {
        let day = self
            .game_days
            .get_mut(&day_id)
            .ok_or(StoreError::MissingGameDay(day_id))?;
        planner::complete(day)?;

        if let Some(day) = self.game_days.get(&day_id) {
            stats::apply_completion(&mut self.players, day);
        }

        self.touch_game_days();
        self.touch_roster();
        Ok(())
    }

    /// Rebuilds every player's statistics from the surviving completed game
    /// days. Idempotent and safe to run wholesale.
    pub fn recompute_stats(&mut self) {
        let days = &self.game_days;
        let order = &self.game_day_order;
        stats::recompute_all(
            &mut self.players,
            order.iter().filter_map(|id| days.get(id)),
        );
        self.touch_roster();
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn drain_dirty(&mut self) -> DirtyDocs {
        std::mem::take(&mut self.dirty)
    }

    fn check_jersey_free(&self, jersey: u8, exempt: Option<PlayerId>) -> Result<(), StoreError> {
        if !(JERSEY_MIN..=JERSEY_MAX).contains(&jersey) {
            return Err(StoreError::JerseyOutOfRange(jersey));
        }
        match self.by_jersey.get(&jersey) {
            Some(holder) if Some(*holder) != exempt => Err(StoreError::JerseyTaken {
                jersey,
                holder: *holder,
            }),
            _ => Ok(()),
        }
    }

    fn remove_from_vec<T: PartialEq>(v: &mut Vec<T>, item: T) {
        if let Some(pos) = v.iter().position(|x| *x == item) {
            v.remove(pos);
        }
    }

    fn touch_roster(&mut self) {
        self.dirty.roster = true;
        self.revision += 1;
    }

    fn touch_game_days(&mut self) {
        self.dirty.game_days = true;
        self.revision += 1;
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
