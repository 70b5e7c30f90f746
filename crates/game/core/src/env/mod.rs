//! Traits describing the collaborators the core drives but does not own.
//!
//! Physics, rendering, health and inventory live outside this crate. Spell
//! effects reach them through [`SpellWorld`], so the executor can be run
//! against a real scene or an in-memory test double alike.
mod collision;
mod health;
mod inventory;
mod render;
mod update;

pub use collision::{
    ColliderId, ColliderShape, ColliderSpec, CollisionLayers, CollisionScene, DynamicObject,
};
pub use health::HealthScene;
pub use inventory::Inventory;
pub use render::{RenderId, RenderKind, RenderScene};
pub use update::{UpdateId, UpdateLayers, UpdatePriority};

/// Everything a spell effect may touch while it runs.
pub trait SpellWorld: CollisionScene + RenderScene + HealthScene {}

impl<T> SpellWorld for T where T: CollisionScene + RenderScene + HealthScene + ?Sized {}
