//! Configuration catalog: unit, defender and upgrade archetypes, maps, and
//! the wave table.
//!
//! The catalog is immutable data. The engine instantiates owned per-entity
//! copies from it and never writes back. `Catalog::builtin()` parses the
//! embedded `data/catalog.json`; other content can be supplied through
//! `Catalog::from_json_str`, which validates cross references so lookups at
//! simulation time can treat a miss as a programming error.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CatalogError;
use crate::types::Position;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Key of a unit archetype (e.g. `"neighbor"`).
    UnitTypeId
);
string_id!(
    /// Key of a defender archetype (e.g. `"sophia"`).
    DefenderTypeId
);
string_id!(
    /// Key of an upgrade (e.g. `"damage"`).
    UpgradeId
);

/// Hostile unit template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitArchetype {
    pub name: String,
    pub health: f64,
    /// Path distance covered per tick at 1× time scale.
    pub speed: f64,
    pub reward: f64,
    /// Vitality removed from the base when this unit reaches the terminus.
    pub base_damage: f64,
    /// Visual tag for the presentation layer.
    pub color: String,
    pub category: String,
}

/// Player-placed defender template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefenderArchetype {
    pub name: String,
    pub cost: f64,
    pub damage: f64,
    pub range: f64,
    pub fire_interval_ms: f64,
    pub color: String,
    /// Pure-utility archetypes fire no projectiles until a damage upgrade is applied.
    #[serde(default)]
    pub utility_only: bool,
    pub special: SpecialSpec,
    /// Unit archetypes that take double damage from this defender.
    #[serde(default)]
    pub strong: Vec<UnitTypeId>,
    /// Unit archetypes that take half damage from this defender.
    #[serde(default)]
    pub weak: Vec<UnitTypeId>,
    /// Upgrades this archetype may buy.
    pub upgrades: Vec<UpgradeId>,
}

/// Special-ability parameters as authored in the catalog. Variants carry both
/// the base and the upgraded parameter set; which one is live is resolved from
/// the defender's applied upgrade effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecialSpec {
    None,
    /// Manual: stuns every hostile on the field. Once per wave per defender.
    GlobalPause { stun_ticks: f64 },
    /// Manual: relocate the defender. Once per wave per archetype.
    Reposition,
    /// Lets nearby defenders fire sooner.
    Support {
        radius: f64,
        boost_ms: f64,
        upgraded_boost_ms: f64,
        cooldown_ticks: f64,
    },
    /// Slows units in range. With `conversion` enabled by upgrade, converts
    /// them instead.
    AreaSlow {
        slow_ticks: f64,
        upgraded_slow_ticks: f64,
        cooldown_ticks: f64,
        #[serde(default)]
        conversion: Option<ConversionSpec>,
    },
    /// Stuns units in range. Inactive until enabled by upgrade.
    AreaStun { stun_ticks: f64, cooldown_ticks: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionSpec {
    /// Per-unit chance of converting on each activation.
    pub probability: f64,
    pub cooldown_ticks: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeDef {
    pub name: String,
    pub cost: f64,
    pub effect: UpgradeEffect,
}

/// What an upgrade does to a defender's own stat snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpgradeEffect {
    /// Multiplies damage. Also unlocks firing for utility archetypes.
    Damage { factor: f64 },
    /// Multiplies the fire interval (smaller is faster).
    FireInterval { factor: f64 },
    Range { factor: f64 },
    /// Fire at every unit within range + bonus instead of a single target.
    AreaShot { bonus: f64 },
    /// Use the upgraded slow duration.
    ExtendedSlow,
    /// Use the upgraded support boost.
    StrongerSupport,
    /// Turn area slow into conversion.
    EnableConversion,
    /// Activate area stun.
    EnableStun,
    /// Flavor only; occupies an upgrade slot.
    Cosmetic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f64,
    pub y: f64,
    /// Index into the owning map's `paths`.
    pub path: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDef {
    pub name: String,
    /// Ordered waypoint polylines. The last waypoint of each is the terminus.
    pub paths: Vec<Vec<Position>>,
    pub spawns: Vec<SpawnPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveConfig {
    pub name: String,
    /// Unit count before per-wave scaling.
    pub count: u32,
    /// Composition, cycled by spawn index.
    pub units: Vec<UnitTypeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub units: BTreeMap<UnitTypeId, UnitArchetype>,
    pub defenders: BTreeMap<DefenderTypeId, DefenderArchetype>,
    pub upgrades: BTreeMap<UpgradeId, UpgradeDef>,
    pub maps: Vec<MapDef>,
    pub waves: Vec<WaveConfig>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The content shipped with the game.
    pub fn builtin() -> Self {
        match Self::from_json_str(BUILTIN_CATALOG) {
            Ok(catalog) => catalog,
            Err(err) => panic!("embedded catalog is invalid: {err}"),
        }
    }

    /// Parse and validate a catalog from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check every cross reference and shape constraint the engine relies on.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.maps.is_empty() {
            return Err(CatalogError::NoMaps);
        }
        if self.waves.is_empty() {
            return Err(CatalogError::NoWaves);
        }

        for (id, unit) in &self.units {
            if unit.health <= 0.0 || unit.speed < 0.0 {
                return Err(CatalogError::InvalidStat {
                    context: format!("unit '{id}'"),
                });
            }
        }

        for (id, defender) in &self.defenders {
            if defender.range <= 0.0 || defender.fire_interval_ms <= 0.0 || defender.cost < 0.0 {
                return Err(CatalogError::InvalidStat {
                    context: format!("defender '{id}'"),
                });
            }
            for unit in defender.strong.iter().chain(&defender.weak) {
                self.check_unit(unit, || format!("matchups of defender '{id}'"))?;
            }
            for upgrade in &defender.upgrades {
                if !self.upgrades.contains_key(upgrade) {
                    return Err(CatalogError::UnknownUpgrade {
                        defender: id.clone(),
                        upgrade: upgrade.clone(),
                    });
                }
            }
        }

        for (index, map) in self.maps.iter().enumerate() {
            if map.paths.is_empty() {
                return Err(CatalogError::MapWithoutPaths { map: index });
            }
            if map.spawns.is_empty() {
                return Err(CatalogError::MapWithoutSpawns { map: index });
            }
            if let Some(path) = map.paths.iter().position(|p| p.len() < 2) {
                return Err(CatalogError::ShortPath { map: index, path });
            }
            for spawn in &map.spawns {
                if spawn.path >= map.paths.len() {
                    return Err(CatalogError::SpawnPathMissing {
                        map: index,
                        path: spawn.path,
                    });
                }
            }
        }

        for (index, wave) in self.waves.iter().enumerate() {
            if wave.units.is_empty() {
                return Err(CatalogError::EmptyWave { wave: index });
            }
            for unit in &wave.units {
                self.check_unit(unit, || format!("wave {index}"))?;
            }
        }

        Ok(())
    }

    fn check_unit(
        &self,
        id: &UnitTypeId,
        context: impl FnOnce() -> String,
    ) -> Result<(), CatalogError> {
        if self.units.contains_key(id) {
            Ok(())
        } else {
            Err(CatalogError::UnknownUnit {
                context: context(),
                unit: id.clone(),
            })
        }
    }

    /// Unit archetype lookup. The catalog is validated, so a miss is a bug.
    pub fn unit(&self, id: &UnitTypeId) -> &UnitArchetype {
        self.units
            .get(id)
            .unwrap_or_else(|| panic!("unknown unit archetype '{id}'"))
    }

    /// Defender archetype lookup. Player input may name anything, hence `Option`.
    pub fn defender(&self, id: &DefenderTypeId) -> Option<&DefenderArchetype> {
        self.defenders.get(id)
    }

    pub fn upgrade(&self, id: &UpgradeId) -> Option<&UpgradeDef> {
        self.upgrades.get(id)
    }

    pub fn map(&self, index: usize) -> Option<&MapDef> {
        self.maps.get(index)
    }

    /// Wave table entry for a 1-based wave index. Past the end of the table
    /// the last entry repeats (scaling keeps growing).
    pub fn wave_config(&self, wave: u32) -> &WaveConfig {
        let index = (wave.saturating_sub(1) as usize).min(self.waves.len() - 1);
        &self.waves[index]
    }
}
