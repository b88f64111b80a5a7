#[cfg(test)]
mod tests {
    use crate::catalog::*;
    use crate::commands::PlayerCommand;
    use crate::constants::MS_PER_TICK;
    use crate::enums::*;
    use crate::errors::{CatalogError, CommandError, PlacementError};
    use crate::events::SimEvent;
    use crate::state::GameStateSnapshot;
    use crate::types::{DefenderId, Position, SimTime};

    fn minimal_catalog_json() -> serde_json::Value {
        serde_json::json!({
            "units": {
                "walker": { "name": "Walker", "health": 10, "speed": 1.0, "reward": 5,
                            "base_damage": 1.0, "color": "#fff", "category": "basic" }
            },
            "defenders": {
                "shooter": {
                    "name": "Shooter", "cost": 10, "damage": 5, "range": 100,
                    "fire_interval_ms": 500, "color": "#000",
                    "special": { "kind": "none" },
                    "strong": ["walker"], "weak": [],
                    "upgrades": ["damage"]
                }
            },
            "upgrades": {
                "damage": { "name": "More Damage", "cost": 20,
                            "effect": { "kind": "damage", "factor": 1.5 } }
            },
            "maps": [
                { "name": "Line",
                  "paths": [[ {"x": 0, "y": 0}, {"x": 100, "y": 0} ]],
                  "spawns": [ {"x": 0, "y": 0, "path": 0} ] }
            ],
            "waves": [ { "name": "One", "count": 3, "units": ["walker"] } ]
        })
    }

    // ---- Built-in catalog ----

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.units.len(), 17);
        assert_eq!(catalog.defenders.len(), 11);
        assert_eq!(catalog.upgrades.len(), 21);
        assert_eq!(catalog.maps.len(), 5);
        assert!(!catalog.waves.is_empty());
    }

    #[test]
    fn test_builtin_catalog_values() {
        let catalog = Catalog::builtin();

        let neighbor = catalog.unit(&UnitTypeId::from("neighbor"));
        assert_eq!(neighbor.health, 30.0);
        assert_eq!(neighbor.speed, 1.0);
        assert_eq!(neighbor.reward, 10.0);

        let sophia = catalog.defender(&DefenderTypeId::from("sophia")).unwrap();
        assert_eq!(sophia.cost, 180.0);
        assert_eq!(
            sophia.special,
            SpecialSpec::Support {
                radius: 100.0,
                boost_ms: 200.0,
                upgraded_boost_ms: 400.0,
                cooldown_ticks: 300.0,
            }
        );

        let po = catalog.defender(&DefenderTypeId::from("po")).unwrap();
        assert!(po.utility_only);
        match &po.special {
            SpecialSpec::AreaSlow { conversion, .. } => {
                let conversion = conversion.expect("po converts when upgraded");
                assert_eq!(conversion.probability, 0.3);
                assert_eq!(conversion.cooldown_ticks, 600.0);
            }
            other => panic!("unexpected special for po: {other:?}"),
        }

        let speed = catalog.upgrade(&UpgradeId::from("speed")).unwrap();
        assert_eq!(speed.effect, UpgradeEffect::FireInterval { factor: 0.33 });
    }

    #[test]
    fn test_builtin_maps_share_terminus() {
        let catalog = Catalog::builtin();
        for map in &catalog.maps {
            for path in &map.paths {
                assert_eq!(*path.last().unwrap(), Position::new(750.0, 250.0));
            }
        }
    }

    #[test]
    fn test_wave_config_clamps_to_last_entry() {
        let catalog = Catalog::builtin();
        let last = catalog.waves.last().unwrap().name.clone();
        assert_eq!(catalog.wave_config(1).name, catalog.waves[0].name);
        assert_eq!(catalog.wave_config(0).name, catalog.waves[0].name);
        assert_eq!(catalog.wave_config(500).name, last);
    }

    #[test]
    #[should_panic(expected = "unknown unit archetype")]
    fn test_unknown_unit_lookup_panics() {
        let catalog = Catalog::builtin();
        catalog.unit(&UnitTypeId::from("nobody"));
    }

    // ---- Validation ----

    #[test]
    fn test_minimal_catalog_valid() {
        let json = minimal_catalog_json().to_string();
        let catalog = Catalog::from_json_str(&json).unwrap();
        assert_eq!(catalog.wave_config(7).count, 3);
    }

    #[test]
    fn test_validation_rejects_unknown_wave_unit() {
        let mut json = minimal_catalog_json();
        json["waves"][0]["units"] = serde_json::json!(["ghost"]);
        let err = Catalog::from_json_str(&json.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownUnit { .. }), "{err}");
    }

    #[test]
    fn test_validation_rejects_unknown_upgrade() {
        let mut json = minimal_catalog_json();
        json["defenders"]["shooter"]["upgrades"] = serde_json::json!(["laser"]);
        let err = Catalog::from_json_str(&json.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownUpgrade { .. }), "{err}");
    }

    #[test]
    fn test_validation_rejects_short_path() {
        let mut json = minimal_catalog_json();
        json["maps"][0]["paths"] = serde_json::json!([[{"x": 0, "y": 0}]]);
        let err = Catalog::from_json_str(&json.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::ShortPath { map: 0, path: 0 }), "{err}");
    }

    #[test]
    fn test_validation_rejects_dangling_spawn() {
        let mut json = minimal_catalog_json();
        json["maps"][0]["spawns"][0]["path"] = serde_json::json!(3);
        let err = Catalog::from_json_str(&json.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::SpawnPathMissing { map: 0, path: 3 }), "{err}");
    }

    #[test]
    fn test_validation_rejects_empty_wave() {
        let mut json = minimal_catalog_json();
        json["waves"][0]["units"] = serde_json::json!([]);
        let err = Catalog::from_json_str(&json.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyWave { wave: 0 }), "{err}");
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let err = Catalog::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    // ---- Types ----

    #[test]
    fn test_position_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert_eq!(Position::from(b.as_dvec2()), b);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..60 {
            time.advance(1.0);
        }
        assert_eq!(time.tick, 60);
        assert!((time.elapsed_ms - 1000.0).abs() < 1e-9);

        time.advance(2.0);
        assert!((time.elapsed_ms - (1000.0 + 2.0 * MS_PER_TICK)).abs() < 1e-9);
    }

    // ---- Serde ----

    #[test]
    fn test_player_command_tagged() {
        let cmd = PlayerCommand::RequestUpgrade {
            defender: DefenderId(2),
            upgrade: UpgradeId::from("range"),
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "RequestUpgrade");
        assert_eq!(json["upgrade"], "range");
        assert_eq!(json["defender"], 2);
        let back: PlayerCommand = serde_json::from_value(json).unwrap();
        assert!(matches!(back, PlayerCommand::RequestUpgrade { .. }));
    }

    #[test]
    fn test_snapshot_default_serializes() {
        let snap = GameStateSnapshot {
            events: vec![SimEvent::WaveCleared {
                wave: 1,
                reward: 28.0,
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"WaveCleared\""));
        let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, GamePhase::MapSelect);
        assert_eq!(back.wave_phase, WavePhase::Idle);
    }

    #[test]
    fn test_command_error_wraps_sources() {
        let err: CommandError = PlacementError::BlockedByPath.into();
        assert_eq!(
            err.to_string(),
            "placement rejected: position overlaps a path corridor"
        );
    }
}
