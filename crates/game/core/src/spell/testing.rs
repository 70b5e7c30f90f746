//! In-memory world used by effect and executor tests.

use std::collections::HashMap;

use glam::Vec3;

use crate::env::{
    ColliderId, ColliderSpec, CollisionScene, DynamicObject, HealthScene, RenderId, RenderKind,
    RenderScene,
};
use crate::types::{DamageType, EntityId};

#[derive(Debug, Default)]
pub(crate) struct TestWorld {
    pub objects: HashMap<EntityId, DynamicObject>,
    pub colliders: HashMap<ColliderId, ColliderSpec>,
    pub renders: HashMap<RenderId, (RenderKind, Vec3)>,
    /// Contact reported for every collider.
    pub contact: Option<EntityId>,
    pub damage_log: Vec<(EntityId, f32, DamageType)>,
    next_handle: u32,
}

impl TestWorld {
    pub fn with_player() -> Self {
        let mut world = Self::default();
        world.spawn(EntityId::PLAYER, Vec3::ZERO);
        world
    }

    pub fn spawn(&mut self, entity: EntityId, position: Vec3) {
        self.objects.insert(
            entity,
            DynamicObject {
                entity,
                position,
                velocity: Vec3::ZERO,
            },
        );
    }

    pub fn velocity(&self, entity: EntityId) -> Vec3 {
        self.objects
            .get(&entity)
            .map_or(Vec3::ZERO, |object| object.velocity)
    }

    fn next(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl CollisionScene for TestWorld {
    fn find_object(&self, entity: EntityId) -> Option<DynamicObject> {
        self.objects.get(&entity).copied()
    }

    fn set_velocity(&mut self, entity: EntityId, velocity: Vec3) {
        if let Some(object) = self.objects.get_mut(&entity) {
            object.velocity = velocity;
        }
    }

    fn add_collider(&mut self, spec: ColliderSpec) -> ColliderId {
        let id = ColliderId(self.next());
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
        let owner = self.colliders.get(&collider)?.owner;
        self.contact.filter(|entity| Some(*entity) != owner)
    }
}

impl RenderScene for TestWorld {
    fn add(&mut self, kind: RenderKind, position: Vec3, _radius: f32) -> RenderId {
        let id = RenderId(self.next());
        self.renders.insert(id, (kind, position));
        id
    }

    fn set_position(&mut self, id: RenderId, position: Vec3) {
        if let Some(entry) = self.renders.get_mut(&id) {
            entry.1 = position;
        }
    }

    fn remove(&mut self, id: RenderId) {
        self.renders.remove(&id);
    }
}

impl HealthScene for TestWorld {
    fn damage(
        &mut self,
        target: EntityId,
        amount: f32,
        _source: Option<EntityId>,
        damage: DamageType,
    ) -> bool {
        self.damage_log.push((target, amount, damage));
        self.objects.contains_key(&target)
    }
}
