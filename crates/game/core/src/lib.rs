//! Deterministic spell and cutscene systems driven by a fixed-tick loop.
//!
//! `spellcast-core` holds the rules: the spell executor and its effect
//! variants, the shared mana pool, the cutscene VM with its expression
//! engine, and the collaborator traits they drive. Everything runs on a
//! single thread inside one tick; callers observe what happened through
//! return values such as [`spell::ExecutorReport`].
pub mod config;
pub mod cutscene;
pub mod env;
pub mod error;
pub mod expression;
pub mod mana;
pub mod spell;
pub mod types;

pub use config::{EffectTuning, SpellConfig};
pub use cutscene::{
    Cutscene, CutsceneBuilder, CutsceneError, CutsceneHost, CutsceneStatus, CutsceneStep,
    CutsceneVm, TemplatedString,
};
pub use env::{
    ColliderId, ColliderShape, ColliderSpec, CollisionLayers, CollisionScene, DynamicObject,
    HealthScene, Inventory, RenderId, RenderKind, RenderScene, SpellWorld, UpdateId, UpdateLayers,
    UpdatePriority,
};
pub use error::{ErrorSeverity, GameError};
pub use expression::{
    DataType, ExprData, ExprOp, Expression, ExpressionError, VariableBlock, VariableRef, evaluate,
};
pub use mana::{ManaPool, ManaPoolDefinition, ManaRegulator};
pub use spell::{
    CastState, DataSourceError, DataSourceHandle, ExecutorReport, SlotHandle, SlotId, Spell,
    SpellDataSource, SpellDataSourcePool, SpellEffect, SpellEnv, SpellError, SpellEventType,
    SpellExecutor, SpellSymbol, SymbolKind,
};
pub use types::{DamageType, ElementTable, ElementType, EntityId, ItemType};
