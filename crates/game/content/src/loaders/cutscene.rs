//! Cutscene program loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use spellcast_core::{Cutscene, CutsceneStep};

use crate::loaders::{LoadResult, read_file};

/// Cutscene file structure for RON files.
///
/// ```ron
/// (
///     steps: [
///         Pause(should_pause: true, should_change_game_mode: false, layers: "WORLD"),
///         Delay(duration: 1.0),
///         Dialog(message: (template: "The door is sealed")),
///         Pause(should_pause: false, should_change_game_mode: false, layers: "WORLD"),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutsceneFile {
    pub steps: Vec<CutsceneStep>,
}

/// Loader for cutscene programs from RON files.
pub struct CutsceneLoader;

impl CutsceneLoader {
    /// Load a cutscene from a RON file.
    pub fn load(path: &Path) -> LoadResult<Cutscene> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load cutscene {}: {}", path.display(), e))
    }

    /// Parse a cutscene from RON text. Jumps are validated up front.
    pub fn parse(content: &str) -> LoadResult<Cutscene> {
        let file: CutsceneFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse cutscene RON: {}", e))?;

        let cutscene = Cutscene::new(file.steps);
        cutscene.validate()?;
        Ok(cutscene)
    }
}
