//! Upgrade validation and application.
//!
//! A defender holds at most `MAX_UPGRADES_PER_DEFENDER` distinct upgrades
//! drawn from its archetype's list. Stat upgrades floor their result.

use tracing::debug;

use introvert_core::catalog::{Catalog, SpecialSpec, UpgradeEffect, UpgradeId};
use introvert_core::components::{Ability, Defender, DefenderStats};
use introvert_core::constants::MAX_UPGRADES_PER_DEFENDER;
use introvert_core::errors::UpgradeError;
use introvert_core::events::SimEvent;
use introvert_core::types::DefenderId;

use crate::world_state::WorldState;

/// Validate, charge, and apply an upgrade.
///
/// Checks run in order: defender, upgrade offered, slot cap, duplicate,
/// funds. Nothing is mutated on failure.
pub fn request_upgrade(
    state: &mut WorldState,
    catalog: &Catalog,
    defender: DefenderId,
    upgrade: &UpgradeId,
) -> Result<(), UpgradeError> {
    if state.game_over {
        return Err(UpgradeError::GameOver);
    }
    let entity = state
        .defender_entity(defender)
        .ok_or(UpgradeError::UnknownDefender)?;
    let mut current = state
        .entities
        .get::<&mut Defender>(entity)
        .map_err(|_| UpgradeError::UnknownDefender)?;

    let archetype = catalog
        .defender(&current.archetype)
        .ok_or(UpgradeError::UnknownDefender)?;
    if !archetype.upgrades.contains(upgrade) {
        return Err(UpgradeError::UnknownUpgrade);
    }
    let definition = catalog
        .upgrade(upgrade)
        .ok_or(UpgradeError::UnknownUpgrade)?;
    if current.upgrades.len() >= MAX_UPGRADES_PER_DEFENDER {
        return Err(UpgradeError::MaxUpgradesReached);
    }
    if current.upgrades.contains(upgrade) {
        return Err(UpgradeError::AlreadyApplied);
    }
    if state.resources < definition.cost {
        return Err(UpgradeError::InsufficientFunds);
    }

    state.resources -= definition.cost;
    current.upgrades.push(upgrade.clone());
    apply_effect(&mut current.stats, &definition.effect);
    let effects = applied_effects(catalog, &current);
    current.ability = resolve_ability(&archetype.special, &effects);
    drop(current);

    debug!(defender = defender.0, upgrade = %upgrade, cost = definition.cost, "upgrade applied");
    state.events.push(SimEvent::UpgradeApplied {
        defender,
        upgrade: upgrade.clone(),
    });
    Ok(())
}

/// Mutate a stat snapshot by one upgrade effect.
pub fn apply_effect(stats: &mut DefenderStats, effect: &UpgradeEffect) {
    match *effect {
        UpgradeEffect::Damage { factor } => {
            stats.damage = (stats.damage * factor).floor();
            stats.damage_upgraded = true;
        }
        UpgradeEffect::FireInterval { factor } => {
            stats.fire_interval_ms = (stats.fire_interval_ms * factor).floor();
        }
        UpgradeEffect::Range { factor } => {
            stats.range = (stats.range * factor).floor();
        }
        UpgradeEffect::AreaShot { bonus } => {
            stats.area_bonus = Some(bonus);
        }
        UpgradeEffect::ExtendedSlow
        | UpgradeEffect::StrongerSupport
        | UpgradeEffect::EnableConversion
        | UpgradeEffect::EnableStun
        | UpgradeEffect::Cosmetic => {}
    }
}

fn applied_effects(catalog: &Catalog, defender: &Defender) -> Vec<UpgradeEffect> {
    defender
        .upgrades
        .iter()
        .filter_map(|id| catalog.upgrade(id))
        .map(|definition| definition.effect)
        .collect()
}

/// The live ability for an archetype's special given the applied upgrades.
pub fn resolve_ability(spec: &SpecialSpec, effects: &[UpgradeEffect]) -> Ability {
    let has = |effect: UpgradeEffect| effects.contains(&effect);
    match *spec {
        SpecialSpec::None => Ability::None,
        SpecialSpec::GlobalPause { stun_ticks } => Ability::GlobalPause { stun_ticks },
        SpecialSpec::Reposition => Ability::Reposition,
        SpecialSpec::Support {
            radius,
            boost_ms,
            upgraded_boost_ms,
            cooldown_ticks,
        } => Ability::Support {
            radius,
            boost_ms: if has(UpgradeEffect::StrongerSupport) {
                upgraded_boost_ms
            } else {
                boost_ms
            },
            cooldown_ticks,
        },
        SpecialSpec::AreaSlow {
            slow_ticks,
            upgraded_slow_ticks,
            cooldown_ticks,
            conversion,
        } => match conversion {
            Some(conversion) if has(UpgradeEffect::EnableConversion) => Ability::AreaConvert {
                probability: conversion.probability,
                cooldown_ticks: conversion.cooldown_ticks,
            },
            _ => Ability::AreaSlow {
                slow_ticks: if has(UpgradeEffect::ExtendedSlow) {
                    upgraded_slow_ticks
                } else {
                    slow_ticks
                },
                cooldown_ticks,
            },
        },
        SpecialSpec::AreaStun {
            stun_ticks,
            cooldown_ticks,
        } => {
            if has(UpgradeEffect::EnableStun) {
                Ability::AreaStun {
                    stun_ticks,
                    cooldown_ticks,
                }
            } else {
                Ability::None
            }
        }
    }
}
