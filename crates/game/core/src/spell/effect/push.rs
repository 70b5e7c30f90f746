use glam::Vec3;

use crate::env::{RenderId, RenderKind};
use crate::mana::ManaRegulator;
use crate::spell::{
    CastState, DataSourceHandle, SpellContext, SpellDataSource, SpellEventListener,
    SpellEventOptions,
};
use crate::types::ElementType;

const TRAIL_RADIUS: f32 = 4.0;

/// Accelerates the source's target along the source direction.
///
/// Burst-dash elements and instant casts run on a burst grant and never touch
/// the pool afterwards; held casts draw a sustained rate from the pool. Power
/// scales with how much of the requested mana was granted.
#[derive(Clone, Debug, PartialEq)]
pub struct Push {
    source: DataSourceHandle,
    element: ElementType,
    regulator: ManaRegulator,
    trail_right: RenderId,
    trail_left: RenderId,
}

impl Push {
    pub(super) fn init(
        source: DataSourceHandle,
        data: &SpellDataSource,
        element: ElementType,
        options: SpellEventOptions,
        ctx: &mut SpellContext<'_>,
    ) -> Self {
        let tuning = &ctx.tuning.push;
        let trail_right = ctx.world.add(RenderKind::DashTrail, data.position, TRAIL_RADIUS);
        let trail_left = ctx.world.add(RenderKind::DashTrail, data.position, TRAIL_RADIUS);

        Self {
            source,
            element,
            regulator: ManaRegulator::new(options.burst_mana, tuning.sustained_rate * ctx.dt),
            trail_right,
            trail_left,
        }
    }

    pub(super) fn update(&mut self, listener: &mut SpellEventListener, ctx: &mut SpellContext<'_>) {
        let tuning = &ctx.tuning.push;

        let Some(data) = ctx.source(self.source) else {
            listener.destroy();
            return;
        };
        let Some(target) = data
            .target
            .and_then(|entity| ctx.world.find_object(entity))
        else {
            listener.destroy();
            return;
        };

        let is_bursty =
            tuning.burst_dash.get(self.element) || data.cast_state == CastState::Instant;

        // A spent burst and a never-granted burst both read as "needs burst".
        if is_bursty && self.regulator.needs_burst() {
            let burst = ctx.mana_pool.request(tuning.burst_mana.get(self.element));
            if burst <= 0.0 {
                listener.destroy();
                return;
            }
            self.regulator = ManaRegulator::new(burst, tuning.burst_rate * ctx.dt);
        }

        let wanted = tuning.mana_per_second.get(self.element) * ctx.dt;
        let pool = (!is_bursty).then_some(&mut *ctx.mana_pool);
        let granted = self.regulator.request(pool, wanted);
        let power_ratio = if wanted > 0.0 { granted / wanted } else { 0.0 };

        if power_ratio <= 0.0 {
            listener.destroy();
            return;
        }

        let target_velocity = data.direction * tuning.strength.get(self.element) * power_ratio;
        let velocity = move_towards(
            target.velocity,
            target_velocity,
            ctx.dt * tuning.acceleration * power_ratio,
        );
        ctx.world.set_velocity(target.entity, velocity);

        ctx.world.set_position(self.trail_right, target.position);
        ctx.world.set_position(self.trail_left, target.position);
    }

    pub(super) fn destroy(self, ctx: &mut SpellContext<'_>) {
        ctx.world.remove(self.trail_right);
        ctx.world.remove(self.trail_left);
        ctx.data_sources.release(self.source);
    }

    pub fn regulator(&self) -> &ManaRegulator {
        &self.regulator
    }
}

fn move_towards(from: Vec3, to: Vec3, max_delta: f32) -> Vec3 {
    let delta = to - from;
    let distance = delta.length();
    if distance <= max_delta || distance <= f32::EPSILON {
        to
    } else {
        from + delta / distance * max_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_towards_clamps_the_step() {
        let moved = move_towards(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 2.0);
        assert_eq!(moved, Vec3::new(2.0, 0.0, 0.0));

        let arrived = move_towards(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 2.0);
        assert_eq!(arrived, Vec3::new(1.0, 0.0, 0.0));
    }
}
