//! Headless autopilot match.
//!
//! Drives the engine directly on the calling thread: builds defenders in a
//! fixed order on the legal sites closest to the path, spends leftovers on
//! upgrades, then fast-forwards through each wave.

use serde::Serialize;
use tracing::{debug, info};

use introvert_core::catalog::{Catalog, DefenderTypeId};
use introvert_core::constants::PATH_CORRIDOR_HALF_WIDTH;
use introvert_core::errors::{CommandError, SpecialError, UpgradeError};
use introvert_core::state::ScoreView;
use introvert_core::types::{DefenderId, Position};
use introvert_sim::placement::distance_to_segment;
use introvert_sim::{SimConfig, SimulationEngine};

use crate::state::AppError;

/// Archetypes bought in rotation.
const BUILD_ORDER: [&str; 4] = ["junior", "dario", "max", "tony"];

/// Spacing of the candidate placement grid.
const GRID_STEP: f64 = 20.0;
const BOARD_WIDTH: f64 = 800.0;
const BOARD_HEIGHT: f64 = 600.0;

/// Give up on a wave that has not resolved after this many ticks.
const MAX_TICKS_PER_WAVE: u32 = 20_000;

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub seed: u64,
    pub map: usize,
    pub waves: u32,
    pub time_scale: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            map: 0,
            waves: 5,
            time_scale: 2.0,
        }
    }
}

impl DemoConfig {
    /// Parse `--seed N --map N --waves N --speed X` style arguments.
    pub fn from_args<I>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            let value = args
                .next()
                .ok_or_else(|| AppError::Usage(format!("{flag} needs a value")))?;
            let bad = || AppError::Usage(format!("invalid value '{value}' for {flag}"));
            match flag.as_str() {
                "--seed" => config.seed = value.parse().map_err(|_| bad())?,
                "--map" => config.map = value.parse().map_err(|_| bad())?,
                "--waves" => config.waves = value.parse().map_err(|_| bad())?,
                "--speed" => config.time_scale = value.parse().map_err(|_| bad())?,
                _ => return Err(AppError::Usage(format!("unknown flag {flag}"))),
            }
        }
        Ok(config)
    }
}

/// Outcome of an autopilot match.
#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    pub seed: u64,
    pub map: usize,
    pub map_name: String,
    pub waves_cleared: u32,
    pub defenders: usize,
    pub upgrades: usize,
    pub global_pauses: usize,
    pub game_over: bool,
    pub ticks: u64,
    pub score: ScoreView,
}

/// Grid points outside every path corridor, closest to a path first.
pub fn candidate_sites(catalog: &Catalog, map: usize) -> Vec<Position> {
    let Some(map) = catalog.map(map) else {
        return Vec::new();
    };

    let mut sites = Vec::new();
    let mut y = GRID_STEP;
    while y < BOARD_HEIGHT {
        let mut x = GRID_STEP;
        while x < BOARD_WIDTH {
            let site = Position::new(x, y);
            let clearance = map
                .paths
                .iter()
                .flat_map(|path| path.windows(2))
                .map(|seg| {
                    distance_to_segment(site.as_dvec2(), seg[0].as_dvec2(), seg[1].as_dvec2())
                })
                .fold(f64::INFINITY, f64::min);
            if clearance >= PATH_CORRIDOR_HALF_WIDTH {
                sites.push((clearance, site));
            }
            x += GRID_STEP;
        }
        y += GRID_STEP;
    }

    sites.sort_by(|a, b| a.0.total_cmp(&b.0));
    sites.into_iter().map(|(_, site)| site).collect()
}

struct Autopilot {
    sites: Vec<Position>,
    next_site: usize,
    next_build: usize,
    upgrades: usize,
    pauses: usize,
}

impl Autopilot {
    /// Buy defenders while affordable, then upgrades with what is left.
    fn spend(&mut self, engine: &mut SimulationEngine) {
        loop {
            let archetype = DefenderTypeId::from(BUILD_ORDER[self.next_build % BUILD_ORDER.len()]);
            let Some(cost) = engine.catalog().defender(&archetype).map(|d| d.cost) else {
                break;
            };
            if engine.state().resources < cost {
                break;
            }
            let Some(offset) = self.sites[self.next_site..]
                .iter()
                .position(|site| engine.can_place(site.x, site.y))
            else {
                break;
            };
            let site = self.sites[self.next_site + offset];
            self.next_site += offset + 1;

            match engine.place_defender(&archetype, site.x, site.y) {
                Ok(id) => {
                    info!(defender = id.0, archetype = %archetype, x = site.x, y = site.y, "autopilot placed defender");
                    self.next_build += 1;
                }
                Err(err) => {
                    debug!(%err, "autopilot placement skipped");
                    break;
                }
            }
        }

        let snapshot = engine.snapshot();
        for defender in &snapshot.defenders {
            let Some(template) = engine.catalog().defender(&defender.archetype) else {
                continue;
            };
            for upgrade in template.upgrades.clone() {
                match engine.request_upgrade(defender.id, &upgrade) {
                    Ok(()) => {
                        self.upgrades += 1;
                        info!(defender = defender.id.0, upgrade = %upgrade, "autopilot bought upgrade");
                    }
                    Err(UpgradeError::InsufficientFunds) => return,
                    Err(err) => debug!(%err, "autopilot upgrade skipped"),
                }
            }
        }
    }

    /// Use every manual global pause once the field is busy.
    fn pause_if_crowded(&mut self, engine: &mut SimulationEngine) {
        if engine.state().live_unit_count() < 3 {
            return;
        }
        for index in 0..engine.state().defenders.len() {
            let defender = DefenderId(index as u32);
            match engine.trigger_special(defender) {
                Ok(()) => {
                    self.pauses += 1;
                    info!(defender = defender.0, "autopilot used global pause");
                }
                // Not a pause defender, or already spent this wave.
                Err(SpecialError::NotApplicableToArchetype | SpecialError::AlreadyUsedThisWave) => {}
                Err(err) => debug!(defender = defender.0, %err, "autopilot special rejected"),
            }
        }
    }
}

/// Play up to `config.waves` waves with the autopilot.
pub fn run_headless(config: &DemoConfig) -> Result<DemoReport, AppError> {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: config.seed,
        time_scale: config.time_scale,
        ..Default::default()
    });
    engine.select_map(config.map)?;
    let map_name = engine.catalog().maps[config.map].name.clone();

    let mut pilot = Autopilot {
        sites: candidate_sites(engine.catalog(), config.map),
        next_site: 0,
        next_build: 0,
        upgrades: 0,
        pauses: 0,
    };
    let mut waves_cleared = 0;

    for _ in 0..config.waves {
        if engine.state().game_over {
            break;
        }
        pilot.spend(&mut engine);

        let wave = engine.state().wave;
        let count = engine.start_wave().map_err(CommandError::from)?;
        info!(wave, count, "autopilot started wave");

        for _ in 0..MAX_TICKS_PER_WAVE {
            pilot.pause_if_crowded(&mut engine);
            engine.tick(1.0);
            if engine.state().game_over || engine.state().wave > wave {
                break;
            }
        }

        if engine.state().wave > wave {
            waves_cleared += 1;
            info!(
                wave,
                resources = engine.state().resources,
                vitality = engine.state().vitality,
                "autopilot cleared wave"
            );
        }
    }

    let snapshot = engine.snapshot();
    Ok(DemoReport {
        seed: config.seed,
        map: config.map,
        map_name,
        waves_cleared,
        defenders: snapshot.defenders.len(),
        upgrades: pilot.upgrades,
        global_pauses: pilot.pauses,
        game_over: engine.state().game_over,
        ticks: snapshot.time.tick,
        score: snapshot.score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_args_parse() {
        let config = DemoConfig::from_args(args(&["--map", "3", "--seed", "9", "--speed", "1.5"]))
            .unwrap();
        assert_eq!(config.map, 3);
        assert_eq!(config.seed, 9);
        assert_eq!(config.time_scale, 1.5);
        assert_eq!(config.waves, DemoConfig::default().waves);
    }

    #[test]
    fn test_args_reject_garbage() {
        assert!(matches!(
            DemoConfig::from_args(args(&["--map"])),
            Err(AppError::Usage(_))
        ));
        assert!(matches!(
            DemoConfig::from_args(args(&["--waves", "lots"])),
            Err(AppError::Usage(_))
        ));
        assert!(matches!(
            DemoConfig::from_args(args(&["--color", "red"])),
            Err(AppError::Usage(_))
        ));
    }

    #[test]
    fn test_candidate_sites_avoid_paths() {
        let catalog = Catalog::builtin();
        let sites = candidate_sites(&catalog, 0);
        assert!(!sites.is_empty());
        assert!(!sites.contains(&Position::new(80.0, 300.0)));
        assert!(candidate_sites(&catalog, 99).is_empty());
    }

    #[test]
    fn test_headless_match_is_deterministic() {
        let config = DemoConfig {
            waves: 2,
            ..Default::default()
        };
        let first = run_headless(&config).unwrap();
        let second = run_headless(&config).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert!(first.defenders >= 1);
        assert_eq!(first.map_name, "Local Dev Environment");
    }

    #[test]
    fn test_pause_used_once_per_wave_when_crowded() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        engine.select_map(0).unwrap();
        engine
            .place_defender(&DefenderTypeId::from("dario"), 650.0, 500.0)
            .unwrap();
        let mut pilot = Autopilot {
            sites: Vec::new(),
            next_site: 0,
            next_build: 0,
            upgrades: 0,
            pauses: 0,
        };

        pilot.pause_if_crowded(&mut engine);
        assert_eq!(pilot.pauses, 0, "empty field");

        engine.start_wave().unwrap();
        while engine.state().live_unit_count() < 3 {
            engine.tick(1.0);
        }
        pilot.pause_if_crowded(&mut engine);
        pilot.pause_if_crowded(&mut engine);
        assert_eq!(pilot.pauses, 1);
    }

    #[test]
    fn test_headless_unknown_map() {
        let config = DemoConfig {
            map: 42,
            ..Default::default()
        };
        assert!(matches!(
            run_headless(&config),
            Err(AppError::Command(CommandError::UnknownMap(42)))
        ));
    }
}
