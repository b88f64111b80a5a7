use std::process::ExitCode;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use introvert_app::demo::{self, DemoConfig};
use introvert_app::state::{AppError, AppState};
use introvert_core::catalog::DefenderTypeId;
use introvert_core::commands::PlayerCommand;
use introvert_core::events::SimEvent;
use introvert_sim::SimConfig;

/// Wall-clock length of a `live` session.
const LIVE_SESSION: Duration = Duration::from_secs(15);

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let live = args.first().is_some_and(|arg| arg == "live");
    if live {
        args.remove(0);
    }

    let result = DemoConfig::from_args(args).and_then(|config| {
        if live {
            run_live(&config)
        } else {
            run_autopilot(&config)
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "demo failed");
            ExitCode::FAILURE
        }
    }
}

fn run_autopilot(config: &DemoConfig) -> Result<(), AppError> {
    let report = demo::run_headless(config)?;
    info!(
        waves_cleared = report.waves_cleared,
        game_over = report.game_over,
        "autopilot finished"
    );
    print_json(&report);
    Ok(())
}

/// Run the threaded loop in real time with one defender and one wave.
fn run_live(config: &DemoConfig) -> Result<(), AppError> {
    let app = AppState::new();
    app.start_simulation(
        SimConfig {
            seed: config.seed,
            time_scale: config.time_scale,
            ..Default::default()
        },
        |snapshot| {
            for event in &snapshot.events {
                match event {
                    SimEvent::WaveCleared { .. }
                    | SimEvent::GameOver { .. }
                    | SimEvent::BaseDamaged { .. }
                    | SimEvent::CommandRejected { .. } => info!(?event, "sim event"),
                    _ => {}
                }
            }
        },
    )?;

    let site = demo::candidate_sites(&introvert_core::catalog::Catalog::builtin(), config.map)
        .into_iter()
        .next();
    app.send_command(PlayerCommand::SelectMap { map: config.map })?;
    if let Some(position) = site {
        app.send_command(PlayerCommand::PlaceDefender {
            archetype: DefenderTypeId::from("junior"),
            position,
        })?;
    }
    app.send_command(PlayerCommand::StartWave)?;

    std::thread::sleep(LIVE_SESSION);

    let snapshot = app.get_snapshot()?;
    app.shutdown()?;
    if let Some(snapshot) = snapshot {
        print_json(&snapshot.score);
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => error!(%err, "failed to serialize output"),
    }
}
