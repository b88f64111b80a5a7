//! Application state shared between the driver and the game loop thread.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use thiserror::Error;

use introvert_core::commands::PlayerCommand;
use introvert_core::errors::CommandError;
use introvert_core::state::GameStateSnapshot;
use introvert_sim::SimConfig;

use crate::game_loop;

/// Commands sent from the driver to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotRunning,
    #[error("game loop channel closed")]
    ChannelClosed,
    #[error("shared state lock poisoned")]
    LockPoisoned,
    #[error("game loop thread panicked")]
    LoopPanicked,
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] io::Error),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("usage: {0}")]
    Usage(String),
}

/// Handle to a running (or not yet started) game loop.
///
/// - `command_tx` is `None` until `start_simulation` succeeds.
/// - `latest_snapshot` is shared with the loop thread, which replaces it every tick.
pub struct AppState {
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    loop_thread: Mutex<Option<JoinHandle<()>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            loop_thread: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.command_tx
            .lock()
            .map(|tx| tx.is_some())
            .unwrap_or(false)
    }

    /// Spawn the game loop. `on_snapshot` sees every snapshot the loop produces.
    pub fn start_simulation<F>(&self, config: SimConfig, on_snapshot: F) -> Result<(), AppError>
    where
        F: FnMut(&GameStateSnapshot) + Send + 'static,
    {
        let mut tx_lock = self.command_tx.lock().map_err(|_| AppError::LockPoisoned)?;
        if tx_lock.is_some() {
            return Err(AppError::AlreadyRunning);
        }

        let (cmd_tx, handle) =
            game_loop::spawn_game_loop(config, self.latest_snapshot.clone(), on_snapshot)?;
        *tx_lock = Some(cmd_tx);
        *self.loop_thread.lock().map_err(|_| AppError::LockPoisoned)? = Some(handle);
        Ok(())
    }

    /// Forward a player command to the loop. Applied at the next tick boundary.
    pub fn send_command(&self, command: PlayerCommand) -> Result<(), AppError> {
        let tx_lock = self.command_tx.lock().map_err(|_| AppError::LockPoisoned)?;
        match tx_lock.as_ref() {
            Some(tx) => tx
                .send(GameLoopCommand::PlayerCommand(command))
                .map_err(|_| AppError::ChannelClosed),
            None => Err(AppError::NotRunning),
        }
    }

    /// Latest snapshot, for polling.
    pub fn get_snapshot(&self) -> Result<Option<GameStateSnapshot>, AppError> {
        let lock = self
            .latest_snapshot
            .lock()
            .map_err(|_| AppError::LockPoisoned)?;
        Ok(lock.clone())
    }

    /// Stop the loop and wait for its thread to exit.
    pub fn shutdown(&self) -> Result<(), AppError> {
        let tx = self
            .command_tx
            .lock()
            .map_err(|_| AppError::LockPoisoned)?
            .take()
            .ok_or(AppError::NotRunning)?;
        // The loop also exits on disconnect, so a failed send is fine.
        let _ = tx.send(GameLoopCommand::Shutdown);
        drop(tx);

        let handle = self
            .loop_thread
            .lock()
            .map_err(|_| AppError::LockPoisoned)?
            .take();
        if let Some(handle) = handle {
            handle.join().map_err(|_| AppError::LoopPanicked)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(state.latest_snapshot.lock().unwrap().is_none());
        assert!(!state.is_running());
    }

    #[test]
    fn test_commands_need_a_running_loop() {
        let state = AppState::new();
        assert!(matches!(
            state.send_command(PlayerCommand::StartWave),
            Err(AppError::NotRunning)
        ));
        assert!(matches!(state.shutdown(), Err(AppError::NotRunning)));
        assert!(state.get_snapshot().unwrap().is_none());
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let state = AppState::new();
        state.start_simulation(SimConfig::default(), |_| {}).unwrap();
        assert!(state.is_running());
        assert!(matches!(
            state.start_simulation(SimConfig::default(), |_| {}),
            Err(AppError::AlreadyRunning)
        ));
        state.shutdown().unwrap();
        assert!(!state.is_running());
    }
}
