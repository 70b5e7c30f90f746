use crate::env::{ColliderId, ColliderShape, ColliderSpec, CollisionLayers, RenderId, RenderKind};
use crate::mana::ManaRegulator;
use crate::spell::{
    DataSourceHandle, SpellContext, SpellDataSource, SpellEventListener, SpellEventOptions,
    SpellEventType,
};
use crate::types::{DamageType, ElementType};

/// One-shot blast at the source position.
///
/// Detonates on its first update, passes its own source on to the primary
/// and secondary symbols and lingers for the configured duration before destroying itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    source: DataSourceHandle,
    element: ElementType,
    regulator: ManaRegulator,
    options: SpellEventOptions,
    detonated: bool,
    timer: f32,
    collider: ColliderId,
    render: RenderId,
}

impl Explosion {
    pub(super) fn init(
        source: DataSourceHandle,
        data: &SpellDataSource,
        element: ElementType,
        options: SpellEventOptions,
        ctx: &mut SpellContext<'_>,
    ) -> Self {
        let tuning = &ctx.tuning.explosion;
        let collider = ctx.world.add_collider(ColliderSpec {
            owner: data.target,
            shape: ColliderShape::Sphere {
                radius: tuning.radius,
            },
            position: data.position,
            layers: CollisionLayers::DAMAGE_ENEMY | CollisionLayers::DAMAGE_PLAYER,
            is_trigger: true,
        });
        let render = ctx
            .world
            .add(RenderKind::Explosion, data.position, tuning.radius);

        Self {
            source,
            element,
            regulator: ManaRegulator::new(options.burst_mana, tuning.mana_cost),
            options,
            detonated: false,
            timer: 0.0,
            collider,
            render,
        }
    }

    pub(super) fn update(&mut self, listener: &mut SpellEventListener, ctx: &mut SpellContext<'_>) {
        let tuning = &ctx.tuning.explosion;

        if !self.detonated {
            let granted = self
                .regulator
                .request(Some(&mut *ctx.mana_pool), tuning.mana_cost);
            if granted <= 0.0 {
                listener.destroy();
                return;
            }
            self.detonated = true;

            let power = (granted / tuning.mana_cost.max(f32::EPSILON)).min(1.0);
            if let Some(hit) = ctx.world.nearest_contact(self.collider) {
                let caster = ctx.source(self.source).and_then(|data| data.target);
                ctx.world.damage(
                    hit,
                    tuning.damage * power,
                    caster,
                    DamageType::with_element(DamageType::empty(), self.element),
                );
            }

            if self.options.has_primary_event {
                listener.add_shared(SpellEventType::Primary, self.source, ctx.data_sources);
            }
            if self.options.has_secondary_event {
                listener.add_shared(SpellEventType::Secondary, self.source, ctx.data_sources);
            }
        }

        self.timer += ctx.dt;
        if self.timer >= tuning.duration {
            listener.destroy();
        }
    }

    pub(super) fn destroy(self, ctx: &mut SpellContext<'_>) {
        ctx.world.remove_collider(self.collider);
        ctx.world.remove(self.render);
        ctx.data_sources.release(self.source);
    }
}
