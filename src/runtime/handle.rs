use std::sync::Arc;

use chrono::NaiveDate;
use tokio::{
    sync::{Mutex, broadcast, mpsc, oneshot},
    time::{Duration, Instant},
};

use crate::{
    core::store::{StoreError, TeamStore},
    gameday::{GameDay, PointSplit},
    persist::{PersistError, TeamDocs},
    player::{Player, PlayerDraft, PlayerPatch},
    types::{GameDayId, PlayerId, Revision, Session, SetNumber},
};

use super::events::TeamEvent;

#[derive(Debug)]
pub enum RuntimeError {
    Store(StoreError),
    Persist(PersistError),
    ChannelClosed,
}

impl From<StoreError> for RuntimeError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<PersistError> for RuntimeError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub save_on_mutate: bool,
    pub save_max_latency_ms: u64,
    pub persist_queue_bound: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            save_on_mutate: true,
            save_max_latency_ms: 75,
            persist_queue_bound: 64,
        }
    }
}

pub struct TeamlogHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<TeamEvent>,
}

impl Clone for TeamlogHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    AddPlayer {
        draft: PlayerDraft,
        resp: oneshot::Sender<Result<PlayerId, RuntimeError>>,
    },
    PatchPlayer {
        id: PlayerId,
        patch: PlayerPatch,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    RemovePlayer {
        id: PlayerId,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    GetPlayer {
        id: PlayerId,
        resp: oneshot::Sender<Option<Player>>,
    },
    Roster {
        resp: oneshot::Sender<Vec<Player>>,
    },
    CreateGameDay {
        date: NaiveDate,
        resp: oneshot::Sender<Result<GameDayId, RuntimeError>>,
    },
    RemoveGameDay {
        id: GameDayId,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    GetGameDay {
        id: GameDayId,
        resp: oneshot::Sender<Option<GameDay>>,
    },
    GameDays {
        resp: oneshot::Sender<Vec<GameDay>>,
    },
    PendingGameDay {
        resp: oneshot::Sender<Option<GameDay>>,
    },
    SetAttendance {
        day: GameDayId,
        session: Session,
        player: PlayerId,
        present: bool,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    AssignToSet {
        day: GameDayId,
        set: SetNumber,
        player: PlayerId,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    RemoveFromSet {
        day: GameDayId,
        set: SetNumber,
        player: PlayerId,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    RecordSubstitution {
        day: GameDayId,
        set: SetNumber,
        outgoing: PlayerId,
        incoming: PlayerId,
        set_point: String,
        resp: oneshot::Sender<Result<PointSplit, RuntimeError>>,
    },
    RemoveSubstitution {
        day: GameDayId,
        set: SetNumber,
        outgoing: PlayerId,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    CompleteGameDay {
        day: GameDayId,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    SuggestedOrder {
        day: GameDayId,
        resp: oneshot::Sender<Result<Vec<PlayerId>, RuntimeError>>,
    },
    RecomputeStats {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Flush {
        resp: oneshot::Sender<Result<Revision, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

struct SaveBatch {
    roster: Option<Vec<Player>>,
    game_days: Option<Vec<GameDay>>,
    revision: Revision,
}

impl SaveBatch {
    fn merge(&mut self, other: SaveBatch) {
        if other.roster.is_some() {
            self.roster = other.roster;
        }
        if other.game_days.is_some() {
            self.game_days = other.game_days;
        }
        self.revision = self.revision.max(other.revision);
    }
}

enum PersistMsg {
    Save(SaveBatch),
    Flush {
        resp: oneshot::Sender<Result<Revision, PersistError>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

pub fn spawn_teamlog(
    store: TeamStore,
    sink: Option<Box<dyn TeamDocs>>,
    config: RuntimeConfig,
) -> TeamlogHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(256);
    let (events_tx, _) = broadcast::channel::<TeamEvent>(1024);

    let (persist_tx_opt, mut durable_rx) = if let Some(sink) = sink {
        let (persist_tx, persist_rx) = mpsc::channel::<PersistMsg>(config.persist_queue_bound);
        let (durable_tx, durable_rx) = mpsc::unbounded_channel::<Result<Revision, PersistError>>();
        spawn_persistence_worker(sink, persist_rx, durable_tx, config.clone());
        (Some(persist_tx), Some(durable_rx))
    } else {
        (None, None)
    };

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut store = store;

        loop {
            if let Some(rx) = durable_rx.as_mut() {
                tokio::select! {
                    cmd = cmd_rx.recv() => {
                        let Some(cmd) = cmd else { break; };
                        let done = handle_command(
                            cmd,
                            &mut store,
                            &events_tx_loop,
                            persist_tx_opt.as_ref(),
                        ).await;

                        if done {
                            break;
                        }
                    }
                    durable = rx.recv() => {
                        if let Some(Ok(revision)) = durable {
                            let _ = events_tx_loop.send(TeamEvent::DurableUpTo { revision });
                        }
                    }
                }
            } else {
                let Some(cmd) = cmd_rx.recv().await else { break; };
                let done = handle_command(
                    cmd,
                    &mut store,
                    &events_tx_loop,
                    persist_tx_opt.as_ref(),
                ).await;
                if done {
                    break;
                }
            }
        }
    });

    TeamlogHandle { cmd_tx, events_tx }
}

impl TeamlogHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<TeamEvent> {
        self.events_tx.subscribe()
    }

    pub async fn add_player(&self, draft: PlayerDraft) -> Result<PlayerId, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::AddPlayer { draft, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn patch_player(&self, id: PlayerId, patch: PlayerPatch) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::PatchPlayer { id, patch, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn remove_player(&self, id: PlayerId) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::RemovePlayer { id, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::GetPlayer { id, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn roster(&self) -> Result<Vec<Player>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Roster { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn create_game_day(&self, date: NaiveDate) -> Result<GameDayId, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::CreateGameDay { date, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn remove_game_day(&self, id: GameDayId) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::RemoveGameDay { id, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn get_game_day(&self, id: GameDayId) -> Result<Option<GameDay>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::GetGameDay { id, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn game_days(&self) -> Result<Vec<GameDay>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::GameDays { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn pending_game_day(&self) -> Result<Option<GameDay>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::PendingGameDay { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn set_attendance(
        &self,
        day: GameDayId,
        session: Session,
        player: PlayerId,
        present: bool,
    ) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::SetAttendance {
                day,
                session,
                player,
                present,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn assign_to_set(
        &self,
        day: GameDayId,
        set: SetNumber,
        player: PlayerId,
    ) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::AssignToSet {
                day,
                set,
                player,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn remove_from_set(
        &self,
        day: GameDayId,
        set: SetNumber,
        player: PlayerId,
    ) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::RemoveFromSet {
                day,
                set,
                player,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn record_substitution(
        &self,
        day: GameDayId,
        set: SetNumber,
        outgoing: PlayerId,
        incoming: PlayerId,
        set_point: impl Into<String>,
    ) -> Result<PointSplit, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::RecordSubstitution {
                day,
                set,
                outgoing,
                incoming,
                set_point: set_point.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn remove_substitution(
        &self,
        day: GameDayId,
        set: SetNumber,
        outgoing: PlayerId,
    ) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::RemoveSubstitution {
                day,
                set,
                outgoing,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn complete_game_day(&self, day: GameDayId) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::CompleteGameDay { day, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn suggested_order(&self, day: GameDayId) -> Result<Vec<PlayerId>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::SuggestedOrder { day, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn recompute_stats(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::RecomputeStats { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn flush(&self) -> Result<Revision, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Flush { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }
}

async fn handle_command(
    cmd: Command,
    store: &mut TeamStore,
    events_tx: &broadcast::Sender<TeamEvent>,
    persist_tx: Option<&mpsc::Sender<PersistMsg>>,
) -> bool {
    match cmd {
        Command::AddPlayer { draft, resp } => {
            let res = store
                .add_player(draft)
                .map_err(RuntimeError::from)
                .and_then(|id| {
                    persist_dirty(store, persist_tx, events_tx)?;
                    let _ = events_tx.send(TeamEvent::PlayerAdded { id });
                    Ok(id)
                });
            let _ = resp.send(res);
        }
        Command::PatchPlayer { id, patch, resp } => {
            let res = store
                .patch_player(id, patch)
                .map_err(RuntimeError::from)
                .and_then(|()| {
                    persist_dirty(store, persist_tx, events_tx)?;
                    let _ = events_tx.send(TeamEvent::PlayerUpdated { id });
                    Ok(())
                });
            let _ = resp.send(res);
        }
        Command::RemovePlayer { id, resp } => {
            let res = store
                .remove_player(id)
                .map_err(RuntimeError::from)
                .and_then(|_| {
                    persist_dirty(store, persist_tx, events_tx)?;
                    let _ = events_tx.send(TeamEvent::PlayerRemoved { id });
                    Ok(())
                });
            let _ = resp.send(res);
        }
        Command::GetPlayer { id, resp } => {
            let _ = resp.send(store.get_player(id).cloned());
        }
        Command::Roster { resp } => {
            let _ = resp.send(store.roster_cloned());
        }
        Command::CreateGameDay { date, resp } => {
            let res = store
                .create_game_day(date)
                .map_err(RuntimeError::from)
                .and_then(|id| {
                    persist_dirty(store, persist_tx, events_tx)?;
                    let _ = events_tx.send(TeamEvent::GameDayCreated { id });
                    Ok(id)
                });
            let _ = resp.send(res);
        }
        Command::RemoveGameDay { id, resp } => {
            let res = store
                .remove_game_day(id)
                .map_err(RuntimeError::from)
                .and_then(|_| {
                    persist_dirty(store, persist_tx, events_tx)?;
                    let _ = events_tx.send(TeamEvent::GameDayRemoved { id });
                    Ok(())
                });
            let _ = resp.send(res);
        }
        Command::GetGameDay { id, resp } => {
            let _ = resp.send(store.get_game_day(id).cloned());
        }
        Command::GameDays { resp } => {
            let _ = resp.send(store.game_days_cloned());
        }
        Command::PendingGameDay { resp } => {
            let _ = resp.send(store.pending_game_day().cloned());
        }
        Command::SetAttendance {
            day,
            session,
            player,
            present,
            resp,
        } => {
            let res = store
                .set_attendance(day, session, player, present)
                .map_err(RuntimeError::from)
                .and_then(|()| {
                    persist_dirty(store, persist_tx, events_tx)?;
                    let _ = events_tx.send(TeamEvent::GameDayUpdated { id: day });
                    Ok(())
                });
            let _ = resp.send(res);
        }
        Command::AssignToSet {
            day,
            set,
            player,
            resp,
        } => {
            let res = store
                .assign_to_set(day, set, player)
                .map_err(RuntimeError::from)
                .and_then(|()| {
                    persist_dirty(store, persist_tx, events_tx)?;
                    let _ = events_tx.send(TeamEvent::GameDayUpdated { id: day });
                    Ok(())
                });
            let _ = resp.send(res);
        }
        Command::RemoveFromSet {
            day,
            set,
            player,
            resp,
        } => {
            let res = store
                .remove_from_set(day, set, player)
                .map_err(RuntimeError::from)
                .and_then(|()| {
                    persist_dirty(store, persist_tx, events_tx)?;
                    let _ = events_tx.send(TeamEvent::GameDayUpdated { id: day });
                    Ok(())
                });
            let _ = resp.send(res);
        }
        Command::RecordSubstitution {
            day,
            set,
            outgoing,
            incoming,
            set_point,
            resp,
        } => {
            let res = store
                .record_substitution(day, set, outgoing, incoming, &set_point)
                .map_err(RuntimeError::from)
                .and_then(|split| {
                    persist_dirty(store, persist_tx, events_tx)?;
                    let _ = events_tx.send(TeamEvent::GameDayUpdated { id: day });
                    Ok(split)
                });
            let _ = resp.send(res);
        }
        Command::RemoveSubstitution {
            day,
            set,
            outgoing,
            resp,
        } => {
            let res = store
                .remove_substitution(day, set, outgoing)
                .map_err(RuntimeError::from)
                .and_then(|()| {
                    persist_dirty(store, persist_tx, events_tx)?;
                    let _ = events_tx.send(TeamEvent::GameDayUpdated { id: day });
                    Ok(())
                });
            let _ = resp.send(res);
        }
        Command::CompleteGameDay { day, resp } => {
            let res = store
                .complete_game_day(day)
                .map_err(RuntimeError::from)
                .and_then(|()| {
                    persist_dirty(store, persist_tx, events_tx)?;
                    let _ = events_tx.send(TeamEvent::GameDayCompleted { id: day });
                    Ok(())
                });
            let _ = resp.send(res);
        }
        Command::SuggestedOrder { day, resp } => {
            let _ = resp.send(store.suggested_order(day).map_err(RuntimeError::from));
        }
        Command::RecomputeStats { resp } => {
            store.recompute_stats();
            let res = persist_dirty(store, persist_tx, events_tx).map(|()| {
                let _ = events_tx.send(TeamEvent::StatsRecomputed);
            });
            let _ = resp.send(res);
        }
        Command::Flush { resp } => {
            let out = if let Some(tx) = persist_tx {
                let (flush_tx, flush_rx) = oneshot::channel();
                if tx.send(PersistMsg::Flush { resp: flush_tx }).await.is_err() {
                    Err(RuntimeError::ChannelClosed)
                } else {
                    flush_rx
                        .await
                        .map_err(|_| RuntimeError::ChannelClosed)
                        .and_then(|r| r.map_err(RuntimeError::from))
                }
            } else {
                Ok(store.revision())
            };
            let _ = resp.send(out);
        }
        Command::Shutdown { resp } => {
            let out = if let Some(tx) = persist_tx {
                let (done_tx, done_rx) = oneshot::channel();
                let send_res = tx.send(PersistMsg::Shutdown { resp: done_tx }).await;
                if send_res.is_err() {
                    Err(RuntimeError::ChannelClosed)
                } else {
                    match done_rx.await {
                        Ok(()) => Ok(()),
                        Err(_) => Err(RuntimeError::ChannelClosed),
                    }
                }
            } else {
                Ok(())
            };
            let _ = resp.send(out);
            return true;
        }
    }

    false
}

fn persist_dirty(
    store: &mut TeamStore,
    persist_tx: Option<&mpsc::Sender<PersistMsg>>,
    events_tx: &broadcast::Sender<TeamEvent>,
) -> Result<(), RuntimeError> {
    let dirty = store.drain_dirty();
    if !dirty.any() {
        return Ok(());
    }

    let Some(tx) = persist_tx else {
        let _ = events_tx.send(TeamEvent::DurableUpTo {
            revision: store.revision(),
        });
        return Ok(());
    };

    let batch = SaveBatch {
        roster: dirty.roster.then(|| store.export_roster()),
        game_days: dirty.game_days.then(|| store.export_game_days()),
        revision: store.revision(),
    };
    tx.try_send(PersistMsg::Save(batch)).map_err(|err| {
        RuntimeError::Persist(PersistError::Message(format!("persist queue error: {err}")))
    })
}

fn spawn_persistence_worker(
    sink: Box<dyn TeamDocs>,
    mut rx: mpsc::Receiver<PersistMsg>,
    durable_tx: mpsc::UnboundedSender<Result<Revision, PersistError>>,
    config: RuntimeConfig,
) {
    let sink = Arc::new(Mutex::new(sink));
    tokio::spawn(async move {
        let mut pending: Option<SaveBatch> = None;
        let mut deadline = Instant::now() + Duration::from_millis(config.save_max_latency_ms);
        let mut last_durable: Revision = 0;

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else {
                        let _ = write_pending(&sink, &mut pending, &mut last_durable, &durable_tx, true).await;
                        break;
                    };

                    match msg {
                        PersistMsg::Save(batch) => {
                            match pending.as_mut() {
                                Some(cur) => cur.merge(batch),
                                None => pending = Some(batch),
                            }

                            if config.save_on_mutate {
                                let _ = write_pending(&sink, &mut pending, &mut last_durable, &durable_tx, true).await;
                                deadline = Instant::now() + Duration::from_millis(config.save_max_latency_ms);
                            }
                        }
                        PersistMsg::Flush { resp } => {
                            let result = write_pending(&sink, &mut pending, &mut last_durable, &durable_tx, true).await;
                            let _ = resp.send(result.map(|_| last_durable));
                            deadline = Instant::now() + Duration::from_millis(config.save_max_latency_ms);
                        }
                        PersistMsg::Shutdown { resp } => {
                            let _ = write_pending(&sink, &mut pending, &mut last_durable, &durable_tx, true).await;
                            let _ = resp.send(());
                            break;
                        }
                    }
                }
                _ = tokio::time::sleep_until(deadline), if pending.is_some() => {
                    let _ = write_pending(&sink, &mut pending, &mut last_durable, &durable_tx, false).await;
                    deadline = Instant::now() + Duration::from_millis(config.save_max_latency_ms);
                }
            }
        }
    });
}

async fn write_pending(
    sink: &Arc<Mutex<Box<dyn TeamDocs>>>,
    pending: &mut Option<SaveBatch>,
    last_durable: &mut Revision,
    durable_tx: &mpsc::UnboundedSender<Result<Revision, PersistError>>,
    call_flush: bool,
) -> Result<(), PersistError> {
    let Some(batch) = pending.take() else {
        if call_flush {
            let sink_ref = Arc::clone(sink);
            tokio::task::spawn_blocking(move || {
                let mut sink = sink_ref.blocking_lock();
                sink.flush()
            })
            .await
            .map_err(|e| PersistError::Message(format!("join error: {e}")))??;
        }
        return Ok(());
    };

    let revision = batch.revision;
    let sink_ref = Arc::clone(sink);
    let write_res: Result<(), PersistError> = tokio::task::spawn_blocking(move || {
        let mut sink = sink_ref.blocking_lock();
        if let Some(roster) = &batch.roster {
            sink.save_roster(roster)?;
        }
        if let Some(days) = &batch.game_days {
            sink.save_game_days(days)?;
        }
        if call_flush {
            sink.flush()?;
        }
        Ok(())
    })
    .await
    .map_err(|e| PersistError::Message(format!("join error: {e}")))?;

    match write_res {
        Ok(()) => {
            *last_durable = (*last_durable).max(revision);
            let _ = durable_tx.send(Ok(*last_durable));
            Ok(())
        }
        Err(err) => {
            let _ = durable_tx.send(Err(PersistError::Message(format!("save failed: {err:?}"))));
            Err(err)
        }
    }
}
