//! Data-driven content definitions and loaders.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Core configuration and effect tuning (TOML)
//! - Spell grids (RON)
//! - Cutscene programs (RON, one file per cutscene)
//!
//! and prebuilt sequences assembled with the cutscene builder.
//!
//! All loaders use spellcast-core types directly with serde for RON/TOML
//! deserialization.

pub mod sequences;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use sequences::item_reveal;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, CutsceneLoader, SpellBook, SpellLoader};
