//! Event types for different topics.

use serde::{Deserialize, Serialize};

use spellcast_core::ItemType;

/// Spell executor activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpellEvent {
    /// A spell was cast; `slot` is `None` when the first symbol claimed no
    /// slot (blank symbol or a triggered recast).
    Cast {
        button: usize,
        spell: String,
        slot: Option<u32>,
    },

    /// Every slot started from `button` was torn down.
    Stopped { button: usize },

    /// Slots that changed during one executor update.
    Activity {
        tick: u64,
        destroyed: Vec<u32>,
        chained: Vec<u32>,
        evicted: Vec<u32>,
        dropped_events: usize,
    },
}

/// Cutscene lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CutsceneEvent {
    Started { name: String },

    /// A dialog opened and waits to be dismissed.
    Dialog { name: String, text: String },

    ItemShown { item: ItemType, should_show: bool },

    Finished { name: String },

    /// The cutscene hit an authoring error and was abandoned.
    Aborted { name: String, code: String },
}

/// Emitted after every simulated tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickEvent {
    pub tick: u64,
    pub mana: f32,
    pub active_slots: usize,
}
