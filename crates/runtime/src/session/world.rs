//! In-memory world the headless runtime simulates spells against.
//!
//! Bodies are spheres that integrate their velocity every tick. Colliders
//! registered by spell effects are tested against bodies when an effect asks
//! for its nearest contact. Damage drains optional health and despawns the
//! body once it runs out, which spell effects observe as a dangling target.

use std::collections::{BTreeMap, BTreeSet};
use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec3;
use tracing::debug;

use spellcast_core::{
    ColliderId, ColliderShape, ColliderSpec, CollisionLayers, CollisionScene, DamageType,
    DynamicObject, EntityId, HealthScene, Inventory, ItemType, RenderId, RenderKind, RenderScene,
};

/// Cosine of the half opening angle of cone colliders.
const CONE_HALF_ANGLE_COS: f32 = FRAC_1_SQRT_2;

/// One simulated entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub entity: EntityId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    /// `None` for bodies that cannot be damaged.
    pub health: Option<f32>,
    /// Only colliders sharing one of these layers report a contact.
    pub layers: CollisionLayers,
}

/// A render registration as the headless renderer sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderEntry {
    pub kind: RenderKind,
    pub position: Vec3,
    pub radius: f32,
}

#[derive(Debug, Default)]
pub struct SimWorld {
    bodies: BTreeMap<EntityId, Body>,
    colliders: BTreeMap<ColliderId, ColliderSpec>,
    renders: BTreeMap<RenderId, RenderEntry>,
    items: BTreeSet<ItemType>,
    next_entity: u32,
    next_handle: u32,
}

impl SimWorld {
    /// Creates a world holding only the player at the origin.
    pub fn new() -> Self {
        let mut world = Self {
            next_entity: EntityId::PLAYER.0,
            ..Self::default()
        };
        world.insert(Body {
            entity: EntityId::PLAYER,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            radius: 0.5,
            health: None,
            layers: CollisionLayers::TANGIBLE | CollisionLayers::DAMAGE_PLAYER,
        });
        world
    }

    /// Spawns an enemy body and returns its freshly allocated entity id.
    pub fn spawn(&mut self, position: Vec3, radius: f32, health: Option<f32>) -> EntityId {
        self.next_entity += 1;
        let entity = EntityId(self.next_entity);
        self.insert(Body {
            entity,
            position,
            velocity: Vec3::ZERO,
            radius,
            health,
            layers: CollisionLayers::TANGIBLE | CollisionLayers::DAMAGE_ENEMY,
        });
        entity
    }

    fn insert(&mut self, body: Body) {
        self.bodies.insert(body.entity, body);
    }

    pub fn despawn(&mut self, entity: EntityId) -> Option<Body> {
        self.bodies.remove(&entity)
    }

    pub fn body(&self, entity: EntityId) -> Option<&Body> {
        self.bodies.get(&entity)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn renders(&self) -> impl Iterator<Item = &RenderEntry> {
        self.renders.values()
    }

    /// Integrates every body's velocity over `dt`.
    pub fn step(&mut self, dt: f32) {
        for body in self.bodies.values_mut() {
            body.position += body.velocity * dt;
        }
    }

    fn next_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

fn overlaps(spec: &ColliderSpec, body: &Body) -> bool {
    if !spec.layers.intersects(body.layers) {
        return false;
    }
    let offset = body.position - spec.position;
    match spec.shape {
        ColliderShape::Sphere { radius } => offset.length() <= radius + body.radius,
        ColliderShape::Cone { direction, range } => {
            let distance = offset.length();
            if distance > range + body.radius {
                return false;
            }
            if distance <= body.radius {
                return true;
            }
            offset.normalize().dot(direction.normalize_or_zero()) >= CONE_HALF_ANGLE_COS
        }
        ColliderShape::Box { half_size } => offset
            .abs()
            .cmple(half_size + Vec3::splat(body.radius))
            .all(),
    }
}

impl CollisionScene for SimWorld {
    fn find_object(&self, entity: EntityId) -> Option<DynamicObject> {
        self.bodies.get(&entity).map(|body| DynamicObject {
            entity: body.entity,
            position: body.position,
            velocity: body.velocity,
        })
    }

    fn set_velocity(&mut self, entity: EntityId, velocity: Vec3) {
        if let Some(body) = self.bodies.get_mut(&entity) {
            body.velocity = velocity;
        }
    }

    fn add_collider(&mut self, spec: ColliderSpec) -> ColliderId {
        let id = ColliderId(self.next_handle());
        self.colliders.insert(id, spec);
        id
    }

    fn move_collider(&mut self, collider: ColliderId, position: Vec3) {
        if let Some(spec) = self.colliders.get_mut(&collider) {
            spec.position = position;
        }
    }

    fn remove_collider(&mut self, collider: ColliderId) {
        self.colliders.remove(&collider);
    }

    fn nearest_contact(&self, collider: ColliderId) -> Option<EntityId> {
        let spec = self.colliders.get(&collider)?;
        self.bodies
            .values()
            .filter(|body| Some(body.entity) != spec.owner && overlaps(spec, body))
            .min_by(|a, b| {
                let da = a.position.distance_squared(spec.position);
                let db = b.position.distance_squared(spec.position);
                da.total_cmp(&db)
            })
            .map(|body| body.entity)
    }
}

impl RenderScene for SimWorld {
    fn add(&mut self, kind: RenderKind, position: Vec3, radius: f32) -> RenderId {
        let id = RenderId(self.next_handle());
        self.renders.insert(
            id,
            RenderEntry {
                kind,
                position,
                radius,
            },
        );
        id
    }

    fn set_position(&mut self, id: RenderId, position: Vec3) {
        if let Some(entry) = self.renders.get_mut(&id) {
            entry.position = position;
        }
    }

    fn remove(&mut self, id: RenderId) {
        self.renders.remove(&id);
    }
}

impl HealthScene for SimWorld {
    fn damage(
        &mut self,
        target: EntityId,
        amount: f32,
        source: Option<EntityId>,
        damage: DamageType,
    ) -> bool {
        let Some(body) = self.bodies.get_mut(&target) else {
            return false;
        };
        let Some(health) = body.health.as_mut() else {
            return false;
        };

        *health -= amount;
        debug!(%target, amount, ?source, ?damage, remaining = *health, "damage applied");
        if *health <= 0.0 {
            self.bodies.remove(&target);
            debug!(%target, "entity destroyed");
        }
        true
    }
}

impl Inventory for SimWorld {
    fn has_item(&self, item: ItemType) -> bool {
        self.items.contains(&item)
    }

    fn unlock_item(&mut self, item: ItemType) {
        self.items.insert(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor(owner: Option<EntityId>, shape: ColliderShape, position: Vec3) -> ColliderSpec {
        ColliderSpec {
            owner,
            shape,
            position,
            layers: CollisionLayers::DAMAGE_ENEMY,
            is_trigger: true,
        }
    }

    #[test]
    fn nearest_contact_skips_the_owner() {
        let mut world = SimWorld::new();
        let near = world.spawn(Vec3::new(1.0, 0.0, 0.0), 0.5, Some(10.0));
        world.spawn(Vec3::new(2.0, 0.0, 0.0), 0.5, Some(10.0));
        let collider = world.add_collider(sensor(
            Some(EntityId::PLAYER),
            ColliderShape::Sphere { radius: 3.0 },
            Vec3::ZERO,
        ));

        assert_eq!(world.nearest_contact(collider), Some(near));
    }

    #[test]
    fn cones_only_see_ahead() {
        let mut world = SimWorld::new();
        let ahead = world.spawn(Vec3::new(0.0, 0.0, 3.0), 0.5, None);
        world.spawn(Vec3::new(0.0, 0.0, -1.0), 0.5, None);
        let collider = world.add_collider(sensor(
            Some(EntityId::PLAYER),
            ColliderShape::Cone {
                direction: Vec3::Z,
                range: 4.0,
            },
            Vec3::ZERO,
        ));

        assert_eq!(world.nearest_contact(collider), Some(ahead));
    }

    #[test]
    fn contacts_respect_collider_layers() {
        let mut world = SimWorld::new();
        let enemy = world.spawn(Vec3::new(3.0, 0.0, 0.0), 0.5, Some(10.0));
        let enemy_only = world.add_collider(sensor(
            None,
            ColliderShape::Sphere { radius: 4.0 },
            Vec3::ZERO,
        ));
        assert_eq!(world.nearest_contact(enemy_only), Some(enemy));

        let both = world.add_collider(ColliderSpec {
            layers: CollisionLayers::DAMAGE_ENEMY | CollisionLayers::DAMAGE_PLAYER,
            ..sensor(None, ColliderShape::Sphere { radius: 4.0 }, Vec3::ZERO)
        });
        assert_eq!(world.nearest_contact(both), Some(EntityId::PLAYER));

        let player_only = world.add_collider(ColliderSpec {
            layers: CollisionLayers::DAMAGE_PLAYER,
            ..sensor(None, ColliderShape::Sphere { radius: 4.0 }, Vec3::new(3.0, 0.0, 0.0))
        });
        assert_eq!(world.nearest_contact(player_only), Some(EntityId::PLAYER));
    }

    #[test]
    fn lethal_damage_despawns() {
        let mut world = SimWorld::new();
        let target = world.spawn(Vec3::X, 0.5, Some(5.0));

        assert!(world.damage(target, 3.0, None, DamageType::FIRE));
        assert!(world.find_object(target).is_some());
        assert!(world.damage(target, 3.0, None, DamageType::FIRE));
        assert!(world.find_object(target).is_none());
        assert!(!world.damage(EntityId::PLAYER, 1.0, None, DamageType::FIRE));
    }

    #[test]
    fn step_integrates_velocity() {
        let mut world = SimWorld::new();
        world.set_velocity(EntityId::PLAYER, Vec3::new(2.0, 0.0, 0.0));
        world.step(0.5);
        assert_eq!(world.body(EntityId::PLAYER).unwrap().position, Vec3::X);
    }
}
