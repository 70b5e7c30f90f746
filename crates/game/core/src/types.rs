//! Identifiers and small value types shared by every subsystem.

use std::fmt;

/// Identifier of a live entity owned by the collision/entity collaborator.
///
/// Entities are allocated outside this crate. Spell effects only hold the
/// identifier and resolve it every tick, so a despawned entity shows up as a
/// failed lookup rather than a dangling reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(1);
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Inventory item type identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemType(pub u16);

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item:{}", self.0)
    }
}

/// Elemental affinity of a spell symbol or data source.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ElementType {
    #[default]
    None,
    Fire,
    Ice,
    Lightning,
}

/// One value per [`ElementType`].
///
/// Replaces designated-initializer lookup tables with an explicit, typed
/// table that can be loaded from configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementTable<T> {
    pub none: T,
    pub fire: T,
    pub ice: T,
    pub lightning: T,
}

impl<T: Copy> ElementTable<T> {
    /// Table holding the same value for every element.
    pub const fn splat(value: T) -> Self {
        Self {
            none: value,
            fire: value,
            ice: value,
            lightning: value,
        }
    }

    pub const fn get(&self, element: ElementType) -> T {
        match element {
            ElementType::None => self.none,
            ElementType::Fire => self.fire,
            ElementType::Ice => self.ice,
            ElementType::Lightning => self.lightning,
        }
    }
}

bitflags::bitflags! {
    /// Kind of damage delivered to an entity's health.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DamageType: u8 {
        const PROJECTILE = 1 << 0;
        const FIRE       = 1 << 1;
        const ICE        = 1 << 2;
        const LIGHTNING  = 1 << 3;
    }
}

impl DamageType {
    /// Damage flag contributed by an element, combined with `base`.
    pub fn with_element(base: DamageType, element: ElementType) -> Self {
        base | match element {
            ElementType::None => DamageType::empty(),
            ElementType::Fire => DamageType::FIRE,
            ElementType::Ice => DamageType::ICE,
            ElementType::Lightning => DamageType::LIGHTNING,
        }
    }
}
