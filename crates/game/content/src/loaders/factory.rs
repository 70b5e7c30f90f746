//! Content factory for loading spells, cutscenes and configuration.

use std::path::{Path, PathBuf};

use spellcast_core::{Cutscene, SpellConfig};

use crate::loaders::{ConfigLoader, CutsceneLoader, LoadResult, SpellBook, SpellLoader};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── spells.ron
/// └── cutscenes/
///     ├── intro.ron
///     └── sealed_door.ron
/// ```
#[derive(Debug, Clone)]
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load core configuration from `config.toml`, falling back to defaults
    /// when the file does not exist.
    pub fn load_config(&self) -> LoadResult<SpellConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(SpellConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the spell catalog from `spells.ron`.
    pub fn load_spells(&self) -> LoadResult<SpellBook> {
        let path = self.data_dir.join("spells.ron");
        let book = SpellLoader::load(&path)?;
        tracing::info!(count = book.len(), "loaded spells");
        Ok(book)
    }

    /// Load a cutscene from `cutscenes/{name}.ron`.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the cutscene file (without `.ron` extension)
    pub fn load_cutscene(&self, name: &str) -> LoadResult<Cutscene> {
        let path = self.cutscene_path(name);
        let cutscene = CutsceneLoader::load(&path)?;
        tracing::debug!(cutscene = name, steps = cutscene.step_count(), "loaded cutscene");
        Ok(cutscene)
    }

    fn cutscene_path(&self, name: &str) -> PathBuf {
        self.data_dir.join("cutscenes").join(format!("{}.ron", name))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
        assert_eq!(
            factory.cutscene_path("intro"),
            Path::new("/tmp/data/cutscenes/intro.ron")
        );
    }

    #[test]
    fn loads_everything_from_a_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "executor_slots = 8\n").unwrap();
        fs::write(
            dir.path().join("spells.ron"),
            r#"(spells: [(name: "bolt", rows: [[(kind: Projectile)]])])"#,
        )
        .unwrap();
        fs::create_dir(dir.path().join("cutscenes")).unwrap();
        fs::write(
            dir.path().join("cutscenes/intro.ron"),
            r#"(steps: [Delay(duration: 0.5), Dialog(message: (template: "hi"))])"#,
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_config().unwrap().executor_slots, 8);
        assert!(factory.load_spells().unwrap().get("bolt").is_some());
        assert_eq!(factory.load_cutscene("intro").unwrap().step_count(), 2);
    }

    #[test]
    fn missing_config_uses_defaults_but_missing_cutscene_fails() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_config().unwrap(), SpellConfig::default());
        let err = factory.load_cutscene("missing").unwrap_err();
        assert!(format!("{:#}", err).contains("missing.ron"));
    }
}
