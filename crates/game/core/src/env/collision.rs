//! Collision/entity collaborator interface.

use glam::Vec3;

use crate::types::EntityId;

/// Snapshot of a live dynamic object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DynamicObject {
    pub entity: EntityId,
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Handle to a collider registered with the collision scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColliderId(pub u32);

bitflags::bitflags! {
    /// Layers a collider lives on; contacts only occur between overlapping layers.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct CollisionLayers: u16 {
        const TANGIBLE      = 1 << 0;
        const DAMAGE_PLAYER = 1 << 1;
        const DAMAGE_ENEMY  = 1 << 2;
    }
}

/// Collider geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColliderShape {
    Sphere { radius: f32 },
    /// Cone opening along `direction` out to `range`.
    Cone { direction: Vec3, range: f32 },
    Box { half_size: Vec3 },
}

/// Everything needed to register a collider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColliderSpec {
    /// Entity the collider belongs to; contacts with the owner are ignored.
    pub owner: Option<EntityId>,
    pub shape: ColliderShape,
    pub position: Vec3,
    pub layers: CollisionLayers,
    /// Triggers report contacts without producing a physical response.
    pub is_trigger: bool,
}

/// Live entity and collider queries.
pub trait CollisionScene {
    /// Resolves an entity to its current transform, `None` once it is gone.
    fn find_object(&self, entity: EntityId) -> Option<DynamicObject>;

    fn set_velocity(&mut self, entity: EntityId, velocity: Vec3);

    fn add_collider(&mut self, spec: ColliderSpec) -> ColliderId;

    fn move_collider(&mut self, collider: ColliderId, position: Vec3);

    fn remove_collider(&mut self, collider: ColliderId);

    /// Nearest entity currently touching the collider's volume.
    fn nearest_contact(&self, collider: ColliderId) -> Option<EntityId>;
}
