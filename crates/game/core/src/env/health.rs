//! Health collaborator interface.

use crate::types::{DamageType, EntityId};

/// Damage sink for entities that carry health.
pub trait HealthScene {
    /// Applies damage to `target`. Returns false when the entity has no health.
    fn damage(
        &mut self,
        target: EntityId,
        amount: f32,
        source: Option<EntityId>,
        damage: DamageType,
    ) -> bool;
}
