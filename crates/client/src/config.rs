//! Demo scenario configuration.
use std::env;

/// What the headless driver does once the runtime is up.
#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub spell: String,
    pub cutscene: Option<String>,
    /// Item to unlock through the reveal sequence.
    pub reveal_item: Option<u16>,
    pub ticks: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            spell: "fireball".to_string(),
            cutscene: Some("rune_shrine".to_string()),
            reveal_item: None,
            ticks: 90,
        }
    }
}

impl DemoConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `SPELLCAST_DEMO_SPELL`
    /// - `SPELLCAST_DEMO_CUTSCENE` (empty disables the cutscene)
    /// - `SPELLCAST_DEMO_REVEAL`
    /// - `SPELLCAST_DEMO_TICKS`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(spell) = read_env::<String>("SPELLCAST_DEMO_SPELL") {
            config.spell = spell;
        }

        if let Some(cutscene) = read_env::<String>("SPELLCAST_DEMO_CUTSCENE") {
            config.cutscene = (!cutscene.is_empty()).then_some(cutscene);
        }

        config.reveal_item = read_env::<u16>("SPELLCAST_DEMO_REVEAL");

        if let Some(ticks) = read_env::<u32>("SPELLCAST_DEMO_TICKS") {
            config.ticks = ticks.max(1);
        }

        config
    }
}

fn read_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.trim().parse().ok()
}
