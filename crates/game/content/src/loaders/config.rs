//! Core configuration loader.

use std::path::Path;

use spellcast_core::SpellConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`SpellConfig`] from TOML files.
///
/// Every table and key is optional; missing values keep their defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<SpellConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<SpellConfig> {
        let config: SpellConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.executor_slots == 0 {
            anyhow::bail!("executor_slots must be at least 1");
        }
        if config.tick_duration.is_nan() || config.tick_duration <= 0.0 {
            anyhow::bail!("tick_duration must be positive");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_keep_defaults() {
        let config = ConfigLoader::parse(
            r#"
            executor_slots = 4

            [mana]
            max_mana = 50.0
            mana_regen_rate = 5.0
            power_scale = 1.0

            [effects.push]
            burst_rate = 24.0
            "#,
        )
        .unwrap();

        assert_eq!(config.executor_slots, 4);
        assert_eq!(config.mana.max_mana, 50.0);
        assert_eq!(config.effects.push.burst_rate, 24.0);
        assert_eq!(config.effects.push.sustained_rate, 8.0);
        assert_eq!(config.tick_duration, SpellConfig::DEFAULT_TICK_DURATION);
    }

    #[test]
    fn zero_slots_are_rejected() {
        assert!(ConfigLoader::parse("executor_slots = 0").is_err());
    }
}
