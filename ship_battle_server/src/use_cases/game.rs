use super::types::{FrameUpdate, RoomEvent, RoomSummary};
use crate::domain::{FrameCommand, Game, GamePhase};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tracing::{debug, info, warn};

/// Drives one game: applies lifecycle events as they arrive, counts the
/// start countdown down once per second of ticks and runs one frame per tick
/// while live. Exits on shutdown or once the game is complete.
pub async fn room_task(
    room_id: Arc<str>,
    mut game: Game,
    mut events_rx: mpsc::Receiver<RoomEvent>,
    frame_tx: broadcast::Sender<FrameUpdate>,
    summary_tx: watch::Sender<RoomSummary>,
    shutdown: Arc<Notify>,
    tick_interval: Duration,
) {
    let mut interval = tokio::time::interval(tick_interval);
    let mut countdown_ticks: u32 = 0;
    publish_summary(&game, &summary_tx);
    info!(%room_id, fps = game.fps(), "room task started");

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!(%room_id, frame = game.frame(), "room shut down");
                break;
            }
            _ = interval.tick() => {}
        }
        let started = Instant::now();

        let mut batch: Vec<FrameCommand> = Vec::new();
        while let Ok(event) = events_rx.try_recv() {
            apply_event(&mut game, event, &mut batch, &summary_tx);
        }

        let mut published_frame = false;
        match game.phase() {
            GamePhase::Lobby | GamePhase::Complete => {
                if !batch.is_empty() {
                    debug!(%room_id, dropped = batch.len(), phase = %game.phase(), "commands outside live play dropped");
                }
            }
            GamePhase::Starting => {
                if !batch.is_empty() {
                    debug!(%room_id, dropped = batch.len(), "commands during countdown dropped");
                }
                countdown_ticks += 1;
                if countdown_ticks >= game.fps() {
                    countdown_ticks = 0;
                    match game.decr_starting_countdown() {
                        Ok(remaining) => debug!(%room_id, remaining, "countdown"),
                        Err(e) => warn!(%room_id, error = %e, "countdown failed"),
                    }
                }
            }
            GamePhase::Live => match game.run_frame(batch) {
                Ok(report) => {
                    for kill in &report.kills {
                        debug!(%room_id, frame = report.frame, victim = %kill.victim, "kill");
                    }
                    // No receivers is normal before anyone subscribes.
                    let _ = frame_tx.send(FrameUpdate {
                        snapshot: game.snapshot(),
                        rejections: report.rejections,
                    });
                    published_frame = true;
                }
                Err(e) => warn!(%room_id, error = %e, "frame failed"),
            },
        }

        publish_summary(&game, &summary_tx);

        let elapsed = started.elapsed();
        if elapsed > tick_interval {
            warn!(
                %room_id,
                frame = game.frame(),
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = tick_interval.as_millis() as u64,
                "tick overran its interval"
            );
        }

        if game.phase() == GamePhase::Complete {
            if !published_frame {
                let _ = frame_tx.send(FrameUpdate {
                    snapshot: game.snapshot(),
                    rejections: Vec::new(),
                });
            }
            info!(%room_id, frame = game.frame(), winning_team = ?game.winning_team(), "game complete");
            break;
        }
    }
}

// Lifecycle replies go out after the summary reflects them, so a caller that
// reads the summary next sees its own change.
fn apply_event(
    game: &mut Game,
    event: RoomEvent,
    batch: &mut Vec<FrameCommand>,
    summary_tx: &watch::Sender<RoomSummary>,
) {
    let (result, reply) = match event {
        RoomEvent::AddPlayer { details, reply } => (game.register_player(details), reply),
        RoomEvent::RemovePlayer { player_id, reply } => (game.remove_player(player_id), reply),
        RoomEvent::SetMap { map, reply } => (game.set_map(map), reply),
        RoomEvent::Start { reply } => (game.advance_to_starting(), reply),
        RoomEvent::Command(command) => {
            batch.push(command);
            return;
        }
    };
    publish_summary(game, summary_tx);
    let _ = reply.send(result);
}

/// Updates the summary every tick, but only wakes watchers when more than the
/// frame counter moved.
fn publish_summary(game: &Game, summary_tx: &watch::Sender<RoomSummary>) {
    let next = RoomSummary {
        phase: game.phase(),
        frame: game.frame(),
        countdown: game.countdown(),
        players: game.players().to_vec(),
        winning_team: game.winning_team(),
        map_configured: game.map_is_configured(),
    };
    summary_tx.send_if_modified(|current| {
        let notify = current.differs_beyond_frame(&next);
        *current = next;
        notify
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GameConfig, GameError, MapSpec, PlayerDetails, ShipCommand};
    use tokio::sync::oneshot;
    use tokio::time::timeout;

    struct Harness {
        events_tx: mpsc::Sender<RoomEvent>,
        frames_rx: broadcast::Receiver<FrameUpdate>,
        summary_rx: watch::Receiver<RoomSummary>,
        shutdown: Arc<Notify>,
        task: tokio::task::JoinHandle<()>,
    }

    fn spawn_room(countdown_seconds: u32) -> Harness {
        let mut config = GameConfig {
            fps: 100,
            ..GameConfig::default()
        };
        config.game.countdown_seconds = countdown_seconds;
        let (events_tx, events_rx) = mpsc::channel(64);
        let (frame_tx, frames_rx) = broadcast::channel(256);
        let (summary_tx, summary_rx) = watch::channel(RoomSummary::default());
        let shutdown = Arc::new(Notify::new());
        let task = tokio::spawn(room_task(
            Arc::from("room-test"),
            Game::new(config),
            events_rx,
            frame_tx,
            summary_tx,
            shutdown.clone(),
            Duration::from_millis(10),
        ));
        Harness {
            events_tx,
            frames_rx,
            summary_rx,
            shutdown,
            task,
        }
    }

    async fn ask(
        tx: &mpsc::Sender<RoomEvent>,
        make: impl FnOnce(oneshot::Sender<Result<(), GameError>>) -> RoomEvent,
    ) -> Result<(), GameError> {
        let (reply, rx) = oneshot::channel();
        tx.send(make(reply)).await.expect("room task alive");
        rx.await.expect("room task replied")
    }

    fn player(player_id: u64, team_id: u32) -> PlayerDetails {
        PlayerDetails {
            player_id,
            name: format!("pilot {player_id}"),
            team_id,
        }
    }

    fn duel_map() -> MapSpec {
        MapSpec {
            name: "duel".to_string(),
            meters_x: 20_000,
            meters_y: 20_000,
            units_per_meter: Some(10),
            spawn_points: vec![(2000, 2000), (18_000, 18_000)],
            space_stations: Vec::new(),
            mining_locations: Vec::new(),
        }
    }

    async fn start_duel(h: &Harness) {
        ask(&h.events_tx, |reply| RoomEvent::AddPlayer {
            details: player(1, 1),
            reply,
        })
        .await
        .expect("add player 1");
        ask(&h.events_tx, |reply| RoomEvent::AddPlayer {
            details: player(2, 2),
            reply,
        })
        .await
        .expect("add player 2");
        ask(&h.events_tx, |reply| RoomEvent::SetMap {
            map: duel_map(),
            reply,
        })
        .await
        .expect("set map");
        ask(&h.events_tx, |reply| RoomEvent::Start { reply })
            .await
            .expect("start");
    }

    #[tokio::test]
    async fn when_lifecycle_event_is_rejected_then_error_is_replied() {
        let h = spawn_room(1);
        let result = ask(&h.events_tx, |reply| RoomEvent::Start { reply }).await;
        assert_eq!(result, Err(GameError::NotEnoughPlayers { registered: 0 }));
        h.shutdown.notify_one();
        timeout(Duration::from_secs(2), h.task)
            .await
            .expect("task stops")
            .expect("task did not panic");
    }

    #[tokio::test]
    async fn when_player_joins_then_summary_lists_them() {
        let mut h = spawn_room(1);
        ask(&h.events_tx, |reply| RoomEvent::AddPlayer {
            details: player(7, 3),
            reply,
        })
        .await
        .expect("add player");

        timeout(Duration::from_secs(2), async {
            while h.summary_rx.borrow_and_update().players.is_empty() {
                h.summary_rx.changed().await.expect("summary open");
            }
        })
        .await
        .expect("summary updated");
        assert_eq!(h.summary_rx.borrow().players, vec![player(7, 3)]);
        assert_eq!(h.summary_rx.borrow().phase, GamePhase::Lobby);
        h.shutdown.notify_one();
    }

    #[tokio::test]
    async fn when_countdown_elapses_then_frames_are_broadcast() {
        let mut h = spawn_room(1);
        start_duel(&h).await;

        let update = timeout(Duration::from_secs(5), h.frames_rx.recv())
            .await
            .expect("frame within countdown")
            .expect("frame channel open");
        assert_eq!(update.snapshot.phase, GamePhase::Live);
        assert_eq!(update.snapshot.ships.len(), 2);
        assert!(update.rejections.is_empty());
        h.shutdown.notify_one();
    }

    #[tokio::test]
    async fn when_command_targets_unknown_player_then_frame_reports_it() {
        let mut h = spawn_room(1);
        start_duel(&h).await;
        let first = timeout(Duration::from_secs(5), h.frames_rx.recv())
            .await
            .expect("live")
            .expect("open");
        assert_eq!(first.snapshot.phase, GamePhase::Live);

        h.events_tx
            .send(RoomEvent::Command(FrameCommand {
                player_id: 99,
                command: ShipCommand::ActivateEngine,
            }))
            .await
            .expect("queued");

        let rejected = timeout(Duration::from_secs(2), async {
            loop {
                let update = h.frames_rx.recv().await.expect("open");
                if !update.rejections.is_empty() {
                    return update;
                }
            }
        })
        .await
        .expect("rejection reported");
        assert_eq!(rejected.rejections[0].player_id, 99);
        assert_eq!(rejected.rejections[0].command, "activate_engine");
        h.shutdown.notify_one();
    }

    #[tokio::test]
    async fn when_everyone_leaves_then_task_publishes_and_exits() {
        let mut h = spawn_room(1);
        start_duel(&h).await;
        for player_id in [1, 2] {
            ask(&h.events_tx, |reply| RoomEvent::RemovePlayer { player_id, reply })
                .await
                .expect("remove");
        }

        timeout(Duration::from_secs(2), h.task)
            .await
            .expect("task exits")
            .expect("task did not panic");
        assert_eq!(h.summary_rx.borrow_and_update().phase, GamePhase::Complete);
        let last = h.frames_rx.recv().await.expect("final frame");
        assert_eq!(last.snapshot.phase, GamePhase::Complete);
    }
}
