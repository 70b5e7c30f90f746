//! Per-tick update registry.
//!
//! Systems register once with a priority and a layer mask. Each tick the
//! session walks [`UpdateScheduler::runnable`], which yields the entries whose
//! mask intersects the active layers, lowest priority first and in
//! registration order within a priority.

use spellcast_core::{UpdateId, UpdateLayers, UpdatePriority};

#[derive(Debug)]
struct Registration<T> {
    id: UpdateId,
    priority: UpdatePriority,
    layers: UpdateLayers,
    payload: T,
}

/// Ordered set of per-tick registrations gated by [`UpdateLayers`].
#[derive(Debug)]
pub struct UpdateScheduler<T> {
    entries: Vec<Registration<T>>,
    active: UpdateLayers,
    next_id: u32,
}

impl<T> UpdateScheduler<T> {
    pub fn new(active: UpdateLayers) -> Self {
        Self {
            entries: Vec::new(),
            active,
            next_id: 0,
        }
    }

    pub fn register(
        &mut self,
        priority: UpdatePriority,
        layers: UpdateLayers,
        payload: T,
    ) -> UpdateId {
        self.next_id += 1;
        let id = UpdateId(self.next_id);
        let at = self.entries.partition_point(|entry| entry.priority <= priority);
        self.entries.insert(
            at,
            Registration {
                id,
                priority,
                layers,
                payload,
            },
        );
        id
    }

    /// Removes a registration, handing back its payload.
    pub fn unregister(&mut self, id: UpdateId) -> Option<T> {
        let at = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(at).payload)
    }

    pub fn contains(&self, id: UpdateId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn active_layers(&self) -> UpdateLayers {
        self.active
    }

    pub fn set_active_layers(&mut self, layers: UpdateLayers) {
        self.active = layers;
    }

    /// Registrations allowed to run under the active layers, in run order.
    pub fn runnable(&self) -> impl Iterator<Item = (UpdateId, &T)> + '_ {
        self.entries
            .iter()
            .filter(|entry| entry.layers.intersects(self.active))
            .map(|entry| (entry.id, &entry.payload))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for UpdateScheduler<T> {
    fn default() -> Self {
        Self::new(UpdateLayers::all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order<T: Copy>(scheduler: &UpdateScheduler<T>) -> Vec<T> {
        scheduler.runnable().map(|(_, payload)| *payload).collect()
    }

    #[test]
    fn runs_by_priority_then_registration() {
        let mut scheduler = UpdateScheduler::default();
        scheduler.register(UpdatePriority::CUTSCENE, UpdateLayers::CUTSCENE, "cutscene");
        scheduler.register(UpdatePriority::SPELLS, UpdateLayers::WORLD, "spells");
        scheduler.register(UpdatePriority::PLAYER, UpdateLayers::PLAYER, "mana");
        scheduler.register(UpdatePriority::SPELLS, UpdateLayers::WORLD, "late spells");

        assert_eq!(
            order(&scheduler),
            vec!["mana", "spells", "late spells", "cutscene"]
        );
    }

    #[test]
    fn inactive_layers_are_skipped() {
        let mut scheduler = UpdateScheduler::new(UpdateLayers::WORLD | UpdateLayers::CUTSCENE);
        scheduler.register(UpdatePriority::PLAYER, UpdateLayers::PLAYER, 0);
        scheduler.register(UpdatePriority::SPELLS, UpdateLayers::WORLD, 1);
        scheduler.register(UpdatePriority::CUTSCENE, UpdateLayers::CUTSCENE, 2);

        assert_eq!(order(&scheduler), vec![1, 2]);

        scheduler.set_active_layers(UpdateLayers::CUTSCENE);
        assert_eq!(order(&scheduler), vec![2]);
    }

    #[test]
    fn unregister_returns_the_payload() {
        let mut scheduler = UpdateScheduler::default();
        let spells = scheduler.register(UpdatePriority::SPELLS, UpdateLayers::WORLD, 'a');
        scheduler.register(UpdatePriority::EFFECTS, UpdateLayers::WORLD, 'b');

        assert_eq!(scheduler.unregister(spells), Some('a'));
        assert_eq!(scheduler.unregister(spells), None);
        assert!(!scheduler.contains(spells));
        assert_eq!(order(&scheduler), vec!['b']);
    }
}
