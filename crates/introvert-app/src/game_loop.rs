//! Game loop thread: runs the simulation engine at the nominal tick rate and
//! publishes snapshots.
//!
//! The engine is created inside the thread. Commands arrive via `mpsc`.
//! Snapshots go to a caller-supplied sink and into shared state for polling.
//! Time scale is applied inside the engine, so the wall-clock cadence is fixed.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use introvert_core::constants::TICK_RATE;
use introvert_core::state::GameStateSnapshot;
use introvert_sim::{SimConfig, SimulationEngine};

use crate::state::GameLoopCommand;

/// Wall-clock duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop<F>(
    config: SimConfig,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    on_snapshot: F,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)>
where
    F: FnMut(&GameStateSnapshot) + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("introvert-game-loop".into())
        .spawn(move || {
            run_game_loop(config, cmd_rx, &latest_snapshot, on_snapshot);
        })?;

    Ok((cmd_tx, handle))
}

/// Move every pending command into the engine queue. Returns `false` when
/// the loop should stop (shutdown requested or sender gone).
pub fn drain_commands(
    engine: &mut SimulationEngine,
    cmd_rx: &mpsc::Receiver<GameLoopCommand>,
) -> bool {
    loop {
        match cmd_rx.try_recv() {
            Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                debug!(?cmd, "command received");
                engine.queue_command(cmd);
            }
            Ok(GameLoopCommand::Shutdown) => return false,
            Err(mpsc::TryRecvError::Empty) => return true,
            Err(mpsc::TryRecvError::Disconnected) => return false,
        }
    }
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop<F>(
    config: SimConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
    mut on_snapshot: F,
) where
    F: FnMut(&GameStateSnapshot),
{
    let mut engine = SimulationEngine::new(config);
    let mut next_tick_time = Instant::now();
    info!("game loop started");

    loop {
        // 1. Drain all pending commands
        if !drain_commands(&mut engine, &cmd_rx) {
            break;
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick(1.0);

        // 3. Hand the snapshot to the sink
        on_snapshot(&snapshot);

        // 4. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind: reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }

    info!(ticks = engine.time().tick, "game loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use introvert_core::commands::PlayerCommand;
    use introvert_core::enums::GamePhase;

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::SelectMap { map: 1 }))
            .unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Pause))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }

        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::PlayerCommand(PlayerCommand::SelectMap { map: 1 })
        ));
        assert!(matches!(
            commands[1],
            GameLoopCommand::PlayerCommand(PlayerCommand::Pause)
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_drain_stops_at_shutdown() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        let mut engine = SimulationEngine::new(SimConfig::default());

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::SelectMap { map: 0 }))
            .unwrap();
        assert!(drain_commands(&mut engine, &rx));
        assert_eq!(engine.tick(1.0).phase, GamePhase::Active);

        tx.send(GameLoopCommand::Shutdown).unwrap();
        assert!(!drain_commands(&mut engine, &rx));

        drop(tx);
        assert!(!drain_commands(&mut engine, &rx));
    }

    #[test]
    fn test_pause_resume_via_commands() {
        let mut engine = SimulationEngine::new(SimConfig::default());

        engine.queue_command(PlayerCommand::SelectMap { map: 0 });
        let snap = engine.tick(1.0);
        assert_eq!(snap.phase, GamePhase::Active);

        engine.queue_command(PlayerCommand::Pause);
        let snap = engine.tick(1.0);
        assert_eq!(snap.phase, GamePhase::Paused);
        let paused_tick = snap.time.tick;

        // Tick while paused: time should not advance
        let snap = engine.tick(1.0);
        assert_eq!(snap.time.tick, paused_tick);

        engine.queue_command(PlayerCommand::Resume);
        let snap = engine.tick(1.0);
        assert_eq!(snap.phase, GamePhase::Active);
        assert!(snap.time.tick > paused_tick);
    }

    #[test]
    fn test_spawned_loop_publishes_snapshots() {
        let latest = Arc::new(Mutex::new(None));
        let seen = Arc::new(Mutex::new(0usize));
        let counter = seen.clone();
        let (tx, handle) = spawn_game_loop(SimConfig::default(), latest.clone(), move |_| {
            *counter.lock().unwrap() += 1;
        })
        .unwrap();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::SelectMap { map: 2 }))
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let map = latest.lock().unwrap().as_ref().and_then(|s| s.map);
            if map == Some(2) {
                break;
            }
            assert!(Instant::now() < deadline, "loop never applied the command");
            std::thread::sleep(Duration::from_millis(5));
        }

        tx.send(GameLoopCommand::Shutdown).unwrap();
        handle.join().unwrap();
        assert!(*seen.lock().unwrap() > 0);
    }

    #[test]
    fn test_tick_duration_constant() {
        // 60Hz = 16.666ms per tick
        let expected_nanos = 1_000_000_000u64 / 60;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }
}
