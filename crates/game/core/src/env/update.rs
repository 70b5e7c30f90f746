//! Update scheduling vocabulary shared with the runtime scheduler.

use core::fmt;

bitflags::bitflags! {
    /// Layers gate which systems run during pause and cutscene states.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct UpdateLayers: u16 {
        const WORLD      = 1 << 0;
        const PLAYER     = 1 << 1;
        const CUTSCENE   = 1 << 2;
        const PAUSE_MENU = 1 << 3;
    }
}

/// Ordering of per-tick callbacks; lower runs first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UpdatePriority(pub u8);

impl UpdatePriority {
    pub const PLAYER: Self = Self(0);
    pub const SPELLS: Self = Self(1);
    pub const EFFECTS: Self = Self(2);
    pub const CUTSCENE: Self = Self(3);
}

/// Handle to a per-tick callback registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UpdateId(pub u32);

impl fmt::Display for UpdateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "update#{}", self.0)
    }
}
