//! Render registration collaborator interface.

use glam::Vec3;

/// Handle to a registered per-frame render callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderId(pub u32);

/// What a spell effect draws; the renderer owns the actual visuals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RenderKind {
    Projectile,
    Fire,
    Explosion,
    DashTrail,
}

/// Per-frame render registration bound to a position and culling radius.
pub trait RenderScene {
    fn add(&mut self, kind: RenderKind, position: Vec3, radius: f32) -> RenderId;

    fn set_position(&mut self, id: RenderId, position: Vec3);

    fn remove(&mut self, id: RenderId);
}
