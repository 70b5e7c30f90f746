use glam::Vec3;

use crate::env::{ColliderId, ColliderShape, ColliderSpec, CollisionLayers, RenderId, RenderKind};
use crate::mana::ManaRegulator;
use crate::spell::{
    CastState, DataSourceHandle, SpellContext, SpellDataSource, SpellEventListener,
    SpellEventOptions, SpellEventType,
};
use crate::types::{DamageType, ElementType};

/// Cone of flame anchored to the caster.
///
/// Instant casts burn through a burst; held casts draw from the pool every
/// tick. The first entity caught in the cone chains a source at its position.
#[derive(Clone, Debug, PartialEq)]
pub struct Fire {
    source: DataSourceHandle,
    element: ElementType,
    regulator: ManaRegulator,
    draws_from_pool: bool,
    options: SpellEventOptions,
    chained: bool,
    collider: ColliderId,
    render: RenderId,
}

impl Fire {
    pub(super) fn init(
        source: DataSourceHandle,
        data: &SpellDataSource,
        element: ElementType,
        options: SpellEventOptions,
        ctx: &mut SpellContext<'_>,
    ) -> Self {
        let tuning = &ctx.tuning.fire;
        let draws_from_pool = data.cast_state != CastState::Instant;

        let burst = if draws_from_pool || options.burst_mana > 0.0 {
            options.burst_mana
        } else {
            ctx.mana_pool.request(tuning.burst_mana)
        };

        let collider = ctx.world.add_collider(ColliderSpec {
            owner: data.target,
            shape: ColliderShape::Cone {
                direction: data.direction,
                range: tuning.range,
            },
            position: data.position,
            layers: CollisionLayers::DAMAGE_ENEMY,
            is_trigger: true,
        });
        let render = ctx.world.add(RenderKind::Fire, data.position, tuning.range);

        Self {
            source,
            element,
            regulator: ManaRegulator::new(burst, tuning.mana_per_second * ctx.dt),
            draws_from_pool,
            options,
            chained: false,
            collider,
            render,
        }
    }

    pub(super) fn update(&mut self, listener: &mut SpellEventListener, ctx: &mut SpellContext<'_>) {
        let tuning = &ctx.tuning.fire;
        let Some(data) = ctx.source(self.source) else {
            listener.destroy();
            return;
        };

        let wanted = tuning.mana_per_second * ctx.dt;
        let pool = self.draws_from_pool.then_some(&mut *ctx.mana_pool);
        let granted = self.regulator.request(pool, wanted);
        if granted <= 0.0 {
            listener.destroy();
            return;
        }
        let power = if wanted > 0.0 { granted / wanted } else { 0.0 };

        let origin = anchor(&data, ctx);
        ctx.world.move_collider(self.collider, origin);
        ctx.world.set_position(self.render, origin);

        let Some(hit) = ctx.world.nearest_contact(self.collider) else {
            return;
        };
        ctx.world.damage(
            hit,
            tuning.damage_per_second * ctx.dt * power,
            data.target,
            DamageType::with_element(DamageType::FIRE, self.element),
        );

        if !self.chained && self.options.has_primary_event {
            self.chained = true;
            let position = ctx
                .world
                .find_object(hit)
                .map_or(origin, |object| object.position);
            if let Ok(chained) = ctx.data_sources.alloc(SpellDataSource {
                position,
                direction: data.direction,
                target: Some(hit),
                cast_state: data.cast_state,
                element: self.element,
            }) {
                listener.add_owned(SpellEventType::Primary, chained, ctx.data_sources);
            }
        }
    }

    pub(super) fn destroy(self, ctx: &mut SpellContext<'_>) {
        ctx.world.remove_collider(self.collider);
        ctx.world.remove(self.render);
        ctx.data_sources.release(self.source);
    }
}

/// Fire follows its caster while the caster exists.
fn anchor(data: &SpellDataSource, ctx: &SpellContext<'_>) -> Vec3 {
    data.target
        .and_then(|entity| ctx.world.find_object(entity))
        .map_or(data.position, |object| object.position)
}
