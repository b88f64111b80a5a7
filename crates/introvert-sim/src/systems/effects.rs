//! Transient visual effects: floating messages and particles.

use hecs::World;

use introvert_core::components::{Effect, EffectKind};
use introvert_core::constants::PARTICLE_GRAVITY;
use introvert_core::types::Position;

/// Age every effect and integrate particle motion.
pub fn run(world: &mut World, scaled_delta: f64) {
    for (_entity, (effect, position)) in world.query_mut::<(&mut Effect, &mut Position)>() {
        if let EffectKind::Particle { vx, vy } = &mut effect.kind {
            position.x += *vx * scaled_delta;
            position.y += *vy * scaled_delta;
            *vy += PARTICLE_GRAVITY * scaled_delta;
        }
        effect.life -= scaled_delta;
    }
}
