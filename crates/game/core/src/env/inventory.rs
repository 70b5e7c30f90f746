//! Inventory collaborator interface.

use crate::types::ItemType;

/// Item ownership by item type.
pub trait Inventory {
    fn has_item(&self, item: ItemType) -> bool;

    fn unlock_item(&mut self, item: ItemType);
}
