use crate::mana::ManaPoolDefinition;
use crate::types::ElementTable;

/// Core configuration: compile-time capacities and runtime-tunable values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SpellConfig {
    /// Number of slots in the spell executor table.
    pub executor_slots: usize,
    /// Number of spell data sources that may be alive at once.
    pub data_source_capacity: usize,
    /// Seconds of simulated time per tick.
    pub tick_duration: f32,
    /// Multiplier applied to `tick_duration` for spell and cutscene time.
    pub time_scale: f32,
    /// Upper bound on cutscene steps executed within a single tick.
    pub max_cutscene_steps_per_tick: usize,
    /// Number of words in the global variable block.
    pub global_words: usize,
    pub mana: ManaPoolDefinition,
    pub effects: EffectTuning,
}

impl SpellConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_SPELL_EXECUTORS: usize = 16;
    /// Buttons that can hold a pending recast.
    pub const MAX_BUTTON_INDEX: usize = 8;
    /// Events a single slot may emit during one update.
    pub const MAX_SPELL_EVENTS: usize = 8;
    pub const MAX_BUILDER_STEP_COUNT: usize = 32;
    pub const MAX_EXPRESSION_STACK: usize = 16;
    /// Values a cutscene may push before a dialog consumes them.
    pub const MAX_CUTSCENE_ARGS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DATA_SOURCE_CAPACITY: usize = 32;
    pub const DEFAULT_TICK_DURATION: f32 = 1.0 / 30.0;
    pub const DEFAULT_GLOBAL_WORDS: usize = 64;

    pub fn new() -> Self {
        Self {
            executor_slots: Self::MAX_SPELL_EXECUTORS,
            data_source_capacity: Self::DEFAULT_DATA_SOURCE_CAPACITY,
            tick_duration: Self::DEFAULT_TICK_DURATION,
            time_scale: 1.0,
            max_cutscene_steps_per_tick: Self::MAX_BUILDER_STEP_COUNT,
            global_words: Self::DEFAULT_GLOBAL_WORDS,
            mana: ManaPoolDefinition::default(),
            effects: EffectTuning::default(),
        }
    }

    pub fn with_executor_slots(mut self, executor_slots: usize) -> Self {
        self.executor_slots = executor_slots.max(1);
        self
    }

    /// Tick duration after time scaling, used by spells and cutscenes.
    pub fn scaled_time_step(&self) -> f32 {
        self.tick_duration * self.time_scale
    }
}

impl Default for SpellConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Balance values for every spell effect variant.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EffectTuning {
    pub projectile: ProjectileTuning,
    pub fire: FireTuning,
    pub explosion: ExplosionTuning,
    pub push: PushTuning,
    pub recast: RecastTuning,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ProjectileTuning {
    pub speed: f32,
    /// Seconds before an unobstructed projectile fizzles.
    pub lifetime: f32,
    pub radius: f32,
    pub damage: f32,
    pub mana_cost: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 12.0,
            lifetime: 1.5,
            radius: 0.1,
            damage: 1.0,
            mana_cost: 5.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FireTuning {
    pub range: f32,
    pub damage_per_second: f32,
    pub mana_per_second: f32,
    /// Mana granted up front to an instant cast.
    pub burst_mana: f32,
}

impl Default for FireTuning {
    fn default() -> Self {
        Self {
            range: 2.0,
            damage_per_second: 3.0,
            mana_per_second: 6.0,
            burst_mana: 3.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ExplosionTuning {
    pub radius: f32,
    pub damage: f32,
    /// Seconds the explosion stays visible after detonating.
    pub duration: f32,
    pub mana_cost: f32,
}

impl Default for ExplosionTuning {
    fn default() -> Self {
        Self {
            radius: 1.5,
            damage: 4.0,
            duration: 0.3,
            mana_cost: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PushTuning {
    pub strength: ElementTable<f32>,
    pub mana_per_second: ElementTable<f32>,
    pub burst_mana: ElementTable<f32>,
    /// Elements whose push always behaves as a burst dash.
    pub burst_dash: ElementTable<bool>,
    /// Regulator ceiling, in mana per second, for sustained pushes.
    pub sustained_rate: f32,
    /// Regulator ceiling, in mana per second, while a burst is active.
    pub burst_rate: f32,
    /// Velocity change per second at full power.
    pub acceleration: f32,
}

impl Default for PushTuning {
    fn default() -> Self {
        Self {
            strength: ElementTable::splat(10.0),
            mana_per_second: ElementTable::splat(10.0),
            burst_mana: ElementTable::splat(20.0),
            burst_dash: ElementTable {
                none: false,
                fire: true,
                ice: false,
                lightning: true,
            },
            sustained_rate: 8.0,
            burst_rate: 16.0,
            acceleration: 60.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RecastTuning {
    /// Seconds a recast waits for its button before expiring.
    pub timeout: f32,
}

impl Default for RecastTuning {
    fn default() -> Self {
        Self { timeout: 3.0 }
    }
}
