//! Spell effect variants.
//!
//! Every running slot holds one [`SpellEffect`]. The executor dispatches
//! `init`, `update` and `destroy` through a single match; effects only see
//! the world through [`SpellContext`] and report outcomes through the
//! listener.

mod explosion;
mod fire;
mod projectile;
mod push;
mod recast;

pub use explosion::Explosion;
pub use fire::Fire;
pub use projectile::Projectile;
pub use push::Push;
pub use recast::Recast;

use crate::config::EffectTuning;
use crate::env::SpellWorld;
use crate::mana::ManaPool;
use crate::spell::{
    DataSourceHandle, SpellDataSource, SpellDataSourcePool, SpellEventListener, SpellSymbol,
    SymbolKind,
};
use crate::types::ElementType;

/// Transitions and mana handed to an effect when its symbol is triggered.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpellEventOptions {
    pub has_primary_event: bool,
    pub has_secondary_event: bool,
    /// Charged mana released by the cast; only the first symbol receives it.
    pub burst_mana: f32,
}

/// Everything an effect may read or mutate during one call.
pub struct SpellContext<'a> {
    pub data_sources: &'a mut SpellDataSourcePool,
    pub mana_pool: &'a mut ManaPool,
    pub world: &'a mut dyn SpellWorld,
    pub tuning: &'a EffectTuning,
    /// Scaled seconds for this tick.
    pub dt: f32,
}

impl SpellContext<'_> {
    pub fn source(&self, handle: DataSourceHandle) -> Option<SpellDataSource> {
        self.data_sources.get(handle).copied()
    }
}

/// Element an effect runs with: the symbol's own element wins over the one
/// carried by the incoming source.
pub(crate) fn effective_element(symbol: SpellSymbol, source: &SpellDataSource) -> ElementType {
    match symbol.element {
        ElementType::None => source.element,
        element => element,
    }
}

/// Running state of one slot.
#[derive(Clone, Debug, PartialEq)]
pub enum SpellEffect {
    Projectile(Projectile),
    Fire(Fire),
    Explosion(Explosion),
    Push(Push),
    Recast(Recast),
}

impl SpellEffect {
    /// Starts the effect for `symbol`, taking over the caller's reference to
    /// `source`.
    ///
    /// Returns `None` for a blank symbol; the reference is released in that
    /// case and no slot should be claimed.
    pub fn init(
        symbol: SpellSymbol,
        source: DataSourceHandle,
        options: SpellEventOptions,
        ctx: &mut SpellContext<'_>,
    ) -> Option<Self> {
        let data = ctx.source(source)?;
        let element = effective_element(symbol, &data);

        let effect = match symbol.kind {
            SymbolKind::Blank => {
                ctx.data_sources.release(source);
                return None;
            }
            SymbolKind::Projectile => {
                Self::Projectile(Projectile::init(source, &data, element, options, ctx))
            }
            SymbolKind::Fire => Self::Fire(Fire::init(source, &data, element, options, ctx)),
            SymbolKind::Explosion => {
                Self::Explosion(Explosion::init(source, &data, element, options, ctx))
            }
            SymbolKind::Push => Self::Push(Push::init(source, &data, element, options, ctx)),
            SymbolKind::Recast => Self::Recast(Recast::init(source, options)),
        };
        Some(effect)
    }

    pub fn update(&mut self, listener: &mut SpellEventListener, ctx: &mut SpellContext<'_>) {
        match self {
            Self::Projectile(effect) => effect.update(listener, ctx),
            Self::Fire(effect) => effect.update(listener, ctx),
            Self::Explosion(effect) => effect.update(listener, ctx),
            Self::Push(effect) => effect.update(listener, ctx),
            Self::Recast(effect) => effect.update(listener, ctx),
        }
    }

    /// Unregisters collaborator state and releases every held reference.
    pub fn destroy(self, ctx: &mut SpellContext<'_>) {
        match self {
            Self::Projectile(effect) => effect.destroy(ctx),
            Self::Fire(effect) => effect.destroy(ctx),
            Self::Explosion(effect) => effect.destroy(ctx),
            Self::Push(effect) => effect.destroy(ctx),
            Self::Recast(effect) => effect.destroy(ctx),
        }
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            Self::Projectile(_) => SymbolKind::Projectile,
            Self::Fire(_) => SymbolKind::Fire,
            Self::Explosion(_) => SymbolKind::Explosion,
            Self::Push(_) => SymbolKind::Push,
            Self::Recast(_) => SymbolKind::Recast,
        }
    }

    pub fn as_recast_mut(&mut self) -> Option<&mut Recast> {
        match self {
            Self::Recast(recast) => Some(recast),
            _ => None,
        }
    }
}
