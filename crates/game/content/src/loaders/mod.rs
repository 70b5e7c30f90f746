//! Content loaders for reading game data from files.
//!
//! Each loader turns one RON/TOML file into spellcast-core types. Parse
//! errors carry the offending path.

pub mod config;
pub mod cutscene;
pub mod factory;
pub mod spell;

pub use config::ConfigLoader;
pub use cutscene::CutsceneLoader;
pub use factory::ContentFactory;
pub use spell::{SpellBook, SpellLoader};

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
