//! Reference-counted spell data sources.
//!
//! A data source describes where a spell effect comes from and what it aims
//! at. Several slots may share one source (a chain hands its source to the
//! next symbol), so sources live in a fixed pool and are addressed by
//! generation-checked handles. The entry is recycled when its last reference
//! is released; any handle still pointing at it then fails validation.

use glam::Vec3;

use crate::spell::DataSourceError;
use crate::types::{ElementType, EntityId};

/// How the spell that produced a data source was cast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CastState {
    /// Tapped: effects run on a one-off burst of mana.
    #[default]
    Instant,
    /// Button held while mana charges.
    Charging,
    /// Button held: effects draw mana from the pool continuously.
    Held,
}

/// Origin, aim and targeting of an in-flight spell effect.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpellDataSource {
    pub position: Vec3,
    pub direction: Vec3,
    /// Entity the effect acts on; for a fresh cast this is the caster.
    pub target: Option<EntityId>,
    pub cast_state: CastState,
    pub element: ElementType,
}

/// Generation-checked reference into a [`SpellDataSourcePool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DataSourceHandle {
    index: u16,
    generation: u32,
}

#[derive(Clone, Debug, Default)]
struct Entry {
    generation: u32,
    ref_count: u16,
    source: SpellDataSource,
}

/// Fixed-capacity pool of shared data sources.
#[derive(Clone, Debug)]
pub struct SpellDataSourcePool {
    entries: Box<[Entry]>,
    live: usize,
}

impl SpellDataSourcePool {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, u16::MAX as usize);
        Self {
            entries: vec![Entry::default(); capacity].into_boxed_slice(),
            live: 0,
        }
    }

    /// Stores `source` with a reference count of one, owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns `DataSourceError::PoolExhausted` when every entry is referenced.
    pub fn alloc(&mut self, source: SpellDataSource) -> Result<DataSourceHandle, DataSourceError> {
        let capacity = self.entries.len();
        let (index, entry) = self
            .entries
            .iter_mut()
            .enumerate()
            .find(|(_, entry)| entry.ref_count == 0)
            .ok_or(DataSourceError::PoolExhausted { capacity })?;

        entry.ref_count = 1;
        entry.source = source;
        self.live += 1;

        Ok(DataSourceHandle {
            index: index as u16,
            generation: entry.generation,
        })
    }

    /// Adds a reference. Returns false when `handle` is stale.
    pub fn retain(&mut self, handle: DataSourceHandle) -> bool {
        match self.entry_mut(handle) {
            Some(entry) => {
                entry.ref_count += 1;
                true
            }
            None => false,
        }
    }

    /// Drops a reference, recycling the entry when it was the last one.
    /// Returns false when `handle` is stale.
    pub fn release(&mut self, handle: DataSourceHandle) -> bool {
        let Some(entry) = self.entry_mut(handle) else {
            return false;
        };

        entry.ref_count -= 1;
        if entry.ref_count == 0 {
            entry.generation = entry.generation.wrapping_add(1);
            entry.source = SpellDataSource::default();
            self.live -= 1;
        }
        true
    }

    pub fn get(&self, handle: DataSourceHandle) -> Option<&SpellDataSource> {
        self.entries
            .get(handle.index as usize)
            .filter(|entry| entry.ref_count > 0 && entry.generation == handle.generation)
            .map(|entry| &entry.source)
    }

    pub fn get_mut(&mut self, handle: DataSourceHandle) -> Option<&mut SpellDataSource> {
        self.entry_mut(handle).map(|entry| &mut entry.source)
    }

    /// Current reference count, 0 for stale handles.
    pub fn ref_count(&self, handle: DataSourceHandle) -> u16 {
        self.entries
            .get(handle.index as usize)
            .filter(|entry| entry.generation == handle.generation)
            .map_or(0, |entry| entry.ref_count)
    }

    /// Number of entries currently referenced.
    pub fn live(&self) -> usize {
        self.live
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    fn entry_mut(&mut self, handle: DataSourceHandle) -> Option<&mut Entry> {
        self.entries
            .get_mut(handle.index as usize)
            .filter(|entry| entry.ref_count > 0 && entry.generation == handle.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_at(x: f32) -> SpellDataSource {
        SpellDataSource {
            position: Vec3::new(x, 0.0, 0.0),
            ..SpellDataSource::default()
        }
    }

    #[test]
    fn last_release_recycles_the_entry() {
        let mut pool = SpellDataSourcePool::new(2);
        let handle = pool.alloc(source_at(1.0)).unwrap();
        assert!(pool.retain(handle));
        assert_eq!(pool.ref_count(handle), 2);

        assert!(pool.release(handle));
        assert_eq!(pool.get(handle).unwrap().position.x, 1.0);
        assert!(pool.release(handle));

        assert_eq!(pool.live(), 0);
        assert!(pool.get(handle).is_none());
        assert!(!pool.release(handle));
    }

    #[test]
    fn stale_handles_do_not_reach_the_new_occupant() {
        let mut pool = SpellDataSourcePool::new(1);
        let old = pool.alloc(source_at(1.0)).unwrap();
        pool.release(old);

        let new = pool.alloc(source_at(2.0)).unwrap();
        assert_ne!(old, new);
        assert!(pool.get(old).is_none());
        assert!(!pool.retain(old));
        assert_eq!(pool.get(new).unwrap().position.x, 2.0);
    }

    #[test]
    fn exhausted_pool_reports_capacity() {
        let mut pool = SpellDataSourcePool::new(1);
        pool.alloc(source_at(0.0)).unwrap();
        assert_eq!(
            pool.alloc(source_at(0.0)),
            Err(DataSourceError::PoolExhausted { capacity: 1 })
        );
    }
}
