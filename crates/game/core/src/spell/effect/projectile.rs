use glam::Vec3;

use crate::env::{ColliderId, ColliderShape, ColliderSpec, CollisionLayers, RenderId, RenderKind};
use crate::mana::ManaRegulator;
use crate::spell::{
    DataSourceHandle, SpellContext, SpellDataSource, SpellEventListener, SpellEventOptions,
    SpellEventType,
};
use crate::types::{DamageType, ElementType};

/// Bolt that flies along the source direction until it hits something or
/// fizzles. A hit chains a new source positioned at the victim; a miss chains
/// the secondary symbol from where the bolt ran out.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    source: DataSourceHandle,
    position: Vec3,
    velocity: Vec3,
    element: ElementType,
    age: f32,
    /// Share of the mana cost paid, 0 until the first update.
    power: f32,
    regulator: ManaRegulator,
    options: SpellEventOptions,
    collider: ColliderId,
    render: RenderId,
}

impl Projectile {
    pub(super) fn init(
        source: DataSourceHandle,
        data: &SpellDataSource,
        element: ElementType,
        options: SpellEventOptions,
        ctx: &mut SpellContext<'_>,
    ) -> Self {
        let tuning = &ctx.tuning.projectile;
        let collider = ctx.world.add_collider(ColliderSpec {
            owner: data.target,
            shape: ColliderShape::Sphere {
                radius: tuning.radius,
            },
            position: data.position,
            layers: CollisionLayers::DAMAGE_ENEMY,
            is_trigger: true,
        });
        let render = ctx
            .world
            .add(RenderKind::Projectile, data.position, tuning.radius);

        Self {
            source,
            position: data.position,
            velocity: data.direction.normalize_or_zero() * tuning.speed,
            element,
            age: 0.0,
            power: 0.0,
            regulator: ManaRegulator::new(options.burst_mana, tuning.mana_cost),
            options,
            collider,
            render,
        }
    }

    pub(super) fn update(&mut self, listener: &mut SpellEventListener, ctx: &mut SpellContext<'_>) {
        let tuning = &ctx.tuning.projectile;

        if self.power <= 0.0 {
            let granted = self
                .regulator
                .request(Some(&mut *ctx.mana_pool), tuning.mana_cost);
            if granted <= 0.0 {
                listener.destroy();
                return;
            }
            self.power = (granted / tuning.mana_cost.max(f32::EPSILON)).min(1.0);
        }

        if let Some(hit) = ctx.world.nearest_contact(self.collider) {
            let caster = ctx.source(self.source).and_then(|data| data.target);
            ctx.world.damage(
                hit,
                tuning.damage * self.power,
                caster,
                DamageType::with_element(DamageType::PROJECTILE, self.element),
            );

            if self.options.has_primary_event
                && let Some(data) = ctx.source(self.source)
                && let Ok(chained) = ctx.data_sources.alloc(SpellDataSource {
                    position: self.position,
                    direction: data.direction,
                    target: Some(hit),
                    cast_state: data.cast_state,
                    element: self.element,
                })
            {
                listener.add_owned(SpellEventType::Primary, chained, ctx.data_sources);
            }

            listener.destroy();
            return;
        }

        self.age += ctx.dt;
        if self.age >= tuning.lifetime {
            if self.options.has_secondary_event
                && let Some(data) = ctx.source(self.source)
                && let Ok(chained) = ctx.data_sources.alloc(SpellDataSource {
                    position: self.position,
                    ..data
                })
            {
                listener.add_owned(SpellEventType::Secondary, chained, ctx.data_sources);
            }
            listener.destroy();
            return;
        }

        self.position += self.velocity * ctx.dt;
        ctx.world.move_collider(self.collider, self.position);
        ctx.world.set_position(self.render, self.position);
    }

    pub(super) fn destroy(self, ctx: &mut SpellContext<'_>) {
        ctx.world.remove_collider(self.collider);
        ctx.world.remove(self.render);
        ctx.data_sources.release(self.source);
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }
}
