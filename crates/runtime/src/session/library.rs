//! Named cutscene programs, loaded from content on first use.

use std::collections::HashMap;
use std::sync::Arc;

use spellcast_content::ContentFactory;
use spellcast_core::Cutscene;

use crate::api::{Result, RuntimeError};

#[derive(Debug, Default)]
pub struct CutsceneLibrary {
    factory: Option<ContentFactory>,
    cache: HashMap<String, Arc<Cutscene>>,
}

impl CutsceneLibrary {
    /// Library that only knows the cutscenes inserted into it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Library that falls back to `cutscenes/<name>.ron` under the factory's
    /// data directory.
    pub fn with_factory(factory: ContentFactory) -> Self {
        Self {
            factory: Some(factory),
            cache: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, cutscene: Cutscene) {
        self.cache.insert(name.into(), Arc::new(cutscene));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    /// Returns the named cutscene, loading and caching it on first use.
    ///
    /// # Errors
    ///
    /// `UnknownCutscene` when there is no content directory to load from,
    /// `Content` when the file is missing or malformed.
    pub fn load(&mut self, name: &str) -> Result<Arc<Cutscene>> {
        if let Some(cutscene) = self.cache.get(name) {
            return Ok(Arc::clone(cutscene));
        }

        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| RuntimeError::UnknownCutscene {
                name: name.to_string(),
            })?;
        let cutscene = Arc::new(
            factory
                .load_cutscene(name)
                .map_err(|err| RuntimeError::Content(err.into()))?,
        );
        self.cache.insert(name.to_string(), Arc::clone(&cutscene));
        Ok(cutscene)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use spellcast_core::CutsceneStep;

    use super::*;

    #[test]
    fn loads_from_content_once() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("cutscenes")).unwrap();
        fs::write(
            dir.path().join("cutscenes/wait.ron"),
            "(steps: [Delay(duration: 1.0)])",
        )
        .unwrap();
        let mut library = CutsceneLibrary::with_factory(ContentFactory::new(dir.path()));

        let first = library.load("wait").unwrap();
        fs::remove_file(dir.path().join("cutscenes/wait.ron")).unwrap();
        let second = library.load("wait").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            first.steps(),
            &[CutsceneStep::Delay { duration: 1.0 }]
        );
    }

    #[test]
    fn unknown_names_are_reported() {
        let mut library = CutsceneLibrary::new();
        library.insert("known", Cutscene::new(Vec::new()));

        assert!(library.load("known").is_ok());
        assert!(matches!(
            library.load("missing"),
            Err(RuntimeError::UnknownCutscene { .. })
        ));
    }
}
