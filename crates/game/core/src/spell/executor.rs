//! Fixed-capacity spell slot scheduler.
//!
//! The executor owns a table of slots. Each live slot runs one effect for one
//! symbol of a spell and is identified by its table index plus a monotonically
//! increasing id (0 marks an empty slot). Ids give the executor its ordering:
//!
//! - `update` visits slots oldest first, over a snapshot taken before any slot
//!   runs, so slots created by chaining wait for the next tick.
//! - destroy events are applied before chain events, so a slot that dies and
//!   chains in the same update frees its index for the chained symbol.
//! - when the table is full, the slot with the smallest id is evicted; a new
//!   cast always gets a slot.

use std::fmt;
use std::sync::Arc;

use crate::config::{EffectTuning, SpellConfig};
use crate::env::{SpellWorld, UpdateId};
use crate::mana::ManaPool;
use crate::spell::{
    DataSourceError, DataSourceHandle, Spell, SpellContext, SpellDataSource, SpellDataSourcePool,
    SpellEffect, SpellEventListener, SpellEventOptions, SpellEventType, SymbolKind,
};

/// Monotonic slot identity. `SlotId::EMPTY` is never issued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(pub u32);

impl SlotId {
    pub const EMPTY: Self = Self(0);

    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

/// Reference to a slot, valid while the slot still carries `id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    pub index: usize,
    pub id: SlotId,
}

/// Per-call access to the collaborators effects act on.
pub struct SpellEnv<'a> {
    pub mana_pool: &'a mut ManaPool,
    pub world: &'a mut dyn SpellWorld,
    /// Scaled seconds for this tick.
    pub dt: f32,
}

impl<'a> SpellEnv<'a> {
    pub fn new(mana_pool: &'a mut ManaPool, world: &'a mut dyn SpellWorld, dt: f32) -> Self {
        Self {
            mana_pool,
            world,
            dt,
        }
    }
}

/// What happened to the slot table since the previous `update`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutorReport {
    /// Slots whose effect ran this update, in visiting order.
    pub updated: Vec<SlotId>,
    /// Slots torn down by their own destroy event or by `stop`.
    pub destroyed: Vec<SlotId>,
    /// Slots created by chain events.
    pub chained: Vec<SlotId>,
    /// Slots sacrificed to make room for a new one.
    pub evicted: Vec<SlotId>,
    /// Events rejected by full listeners.
    pub dropped_events: usize,
}

impl ExecutorReport {
    pub fn is_quiet(&self) -> bool {
        self.updated.is_empty()
            && self.destroyed.is_empty()
            && self.chained.is_empty()
            && self.evicted.is_empty()
            && self.dropped_events == 0
    }
}

#[derive(Clone, Debug)]
struct SpellSlot {
    spell: Arc<Spell>,
    col: u8,
    row: u8,
    button_index: usize,
    effect: SpellEffect,
}

/// Slot table, data source pool and pending recasts for one caster.
#[derive(Debug)]
pub struct SpellExecutor {
    ids: Box<[SlotId]>,
    slots: Box<[Option<SpellSlot>]>,
    data_sources: SpellDataSourcePool,
    pending_recast: [Option<SlotHandle>; SpellConfig::MAX_BUTTON_INDEX],
    tuning: EffectTuning,
    next_slot: usize,
    next_id: u32,
    update_id: Option<UpdateId>,
    order: Vec<(SlotId, usize)>,
    report: ExecutorReport,
}

impl SpellExecutor {
    pub fn new(config: &SpellConfig) -> Self {
        let slot_count = config.executor_slots.max(1);
        Self {
            ids: vec![SlotId::EMPTY; slot_count].into_boxed_slice(),
            slots: (0..slot_count).map(|_| None).collect(),
            data_sources: SpellDataSourcePool::new(config.data_source_capacity),
            pending_recast: [None; SpellConfig::MAX_BUTTON_INDEX],
            tuning: config.effects.clone(),
            next_slot: 0,
            next_id: 1,
            update_id: None,
            order: Vec::with_capacity(slot_count),
            report: ExecutorReport::default(),
        }
    }

    /// Records the scheduler registration driving this executor.
    pub fn attach_update(&mut self, id: UpdateId) {
        self.update_id = Some(id);
    }

    pub fn update_id(&self) -> Option<UpdateId> {
        self.update_id
    }

    /// Allocates a data source and casts `spell` from it.
    ///
    /// # Errors
    ///
    /// Returns `DataSourceError::PoolExhausted` when no source can be allocated.
    pub fn cast(
        &mut self,
        button_index: usize,
        spell: Arc<Spell>,
        source: SpellDataSource,
        env: &mut SpellEnv<'_>,
    ) -> Result<Option<SlotHandle>, DataSourceError> {
        let handle = self.data_sources.alloc(source)?;
        Ok(self.start(button_index, spell, handle, env))
    }

    /// Casts `spell` at its first symbol, taking over the reference to `source`.
    ///
    /// A recast waiting on `button_index` is triggered with `source` instead.
    /// Charged mana is drained from the pool and granted to the first symbol.
    pub fn start(
        &mut self,
        button_index: usize,
        spell: Arc<Spell>,
        source: DataSourceHandle,
        env: &mut SpellEnv<'_>,
    ) -> Option<SlotHandle> {
        if let Some(handle) = self.take_pending_recast(button_index)
            && self.is_live(handle)
            && let Some(recast) = self.slots[handle.index]
                .as_mut()
                .and_then(|slot| slot.effect.as_recast_mut())
        {
            recast.trigger(source, &mut self.data_sources);
            return Some(handle);
        }

        let burst_mana = env.mana_pool.request_charged_mana();
        self.step(button_index, spell, 0, 0, Some(source), burst_mana, env)
    }

    /// Runs the symbol at `(col, row)`, consuming the reference to `source`.
    ///
    /// A missing source ends the branch. A blank symbol releases the source
    /// without claiming a slot.
    fn step(
        &mut self,
        button_index: usize,
        spell: Arc<Spell>,
        col: u8,
        row: u8,
        source: Option<DataSourceHandle>,
        burst_mana: f32,
        env: &mut SpellEnv<'_>,
    ) -> Option<SlotHandle> {
        let source = source?;
        self.data_sources.get(source)?;

        let symbol = spell.symbol(col, row);
        if symbol.is_blank() {
            self.data_sources.release(source);
            return None;
        }

        let options = SpellEventOptions {
            has_primary_event: spell.has_primary_event(col, row),
            has_secondary_event: spell.has_secondary_event(col, row),
            burst_mana,
        };

        let index = self.find_slot(env);
        let mut ctx = context(&mut self.data_sources, &self.tuning, env);
        let effect = SpellEffect::init(symbol, source, options, &mut ctx)?;

        let id = SlotId(self.next_id);
        self.next_id += 1;
        let handle = SlotHandle { index, id };

        if effect.kind() == SymbolKind::Recast
            && let Some(pending) = self.pending_recast.get_mut(button_index)
        {
            *pending = Some(handle);
        }

        self.ids[index] = id;
        self.slots[index] = Some(SpellSlot {
            spell,
            col,
            row,
            button_index,
            effect,
        });

        Some(handle)
    }

    /// Picks the next empty slot after the round-robin cursor, evicting the
    /// oldest slot when none is empty.
    fn find_slot(&mut self, env: &mut SpellEnv<'_>) -> usize {
        let len = self.ids.len();
        let mut oldest = 0;
        let mut oldest_id = self.ids[0];

        for _ in 0..len {
            let current = self.next_slot;
            let id = self.ids[current];
            self.next_slot = (self.next_slot + 1) % len;

            if id.is_empty() {
                return current;
            }
            if id < oldest_id {
                oldest = current;
                oldest_id = id;
            }
        }

        self.destroy_slot(oldest, env);
        self.report.evicted.push(oldest_id);
        oldest
    }

    /// Advances every live slot once, oldest first.
    ///
    /// Returns what happened since the previous call, including evictions
    /// caused by `start` between ticks.
    pub fn update(&mut self, env: &mut SpellEnv<'_>) -> ExecutorReport {
        let mut order = std::mem::take(&mut self.order);
        order.clear();
        order.extend(
            self.ids
                .iter()
                .enumerate()
                .filter(|(_, id)| !id.is_empty())
                .map(|(index, id)| (*id, index)),
        );
        order.sort_unstable();

        for &(id, index) in &order {
            // Evicted by a chain earlier in this update.
            if self.ids[index] != id {
                continue;
            }
            self.update_slot(index, env);
        }

        self.order = order;
        std::mem::take(&mut self.report)
    }

    fn update_slot(&mut self, index: usize, env: &mut SpellEnv<'_>) {
        let id = self.ids[index];
        let Some(slot) = self.slots[index].as_mut() else {
            return;
        };

        let mut listener = SpellEventListener::new();
        let mut ctx = context(&mut self.data_sources, &self.tuning, env);
        slot.effect.update(&mut listener, &mut ctx);

        let spell = Arc::clone(&slot.spell);
        let (col, row, button_index) = (slot.col, slot.row, slot.button_index);

        self.report.updated.push(id);
        self.report.dropped_events += listener.dropped();

        if listener.has_destroy() {
            self.destroy_slot(index, env);
            self.report.destroyed.push(id);
        }

        for event in listener.drain() {
            let next = match event.kind {
                SpellEventType::Destroy => None,
                SpellEventType::Primary => spell
                    .has_primary_event(col, row)
                    .then(|| (col.saturating_add(1), row)),
                SpellEventType::Secondary => spell
                    .has_secondary_event(col, row)
                    .then(|| (col.saturating_add(1), row.saturating_add(1))),
            };

            match next {
                Some((next_col, next_row)) => {
                    let chained = self.step(
                        button_index,
                        Arc::clone(&spell),
                        next_col,
                        next_row,
                        event.data_source,
                        0.0,
                        env,
                    );
                    if let Some(handle) = chained {
                        self.report.chained.push(handle.id);
                    }
                }
                None => {
                    if let Some(source) = event.data_source {
                        self.data_sources.release(source);
                    }
                }
            }
        }
    }

    /// Tears down every slot started from `button_index`.
    pub fn stop(&mut self, button_index: usize, env: &mut SpellEnv<'_>) {
        for index in 0..self.slots.len() {
            let matches = self.slots[index]
                .as_ref()
                .is_some_and(|slot| slot.button_index == button_index);
            if matches {
                let id = self.ids[index];
                self.destroy_slot(index, env);
                self.report.destroyed.push(id);
            }
        }
        if let Some(pending) = self.pending_recast.get_mut(button_index) {
            *pending = None;
        }
    }

    /// Tears down every slot and hands back the scheduler registration so the
    /// owner can unregister it.
    pub fn destroy_all(&mut self, env: &mut SpellEnv<'_>) -> Option<UpdateId> {
        for index in 0..self.slots.len() {
            if !self.ids[index].is_empty() {
                self.destroy_slot(index, env);
            }
        }
        self.pending_recast = [None; SpellConfig::MAX_BUTTON_INDEX];
        self.report = ExecutorReport::default();
        self.update_id.take()
    }

    fn destroy_slot(&mut self, index: usize, env: &mut SpellEnv<'_>) {
        let id = std::mem::replace(&mut self.ids[index], SlotId::EMPTY);
        if let Some(slot) = self.slots[index].take() {
            let mut ctx = context(&mut self.data_sources, &self.tuning, env);
            slot.effect.destroy(&mut ctx);
        }

        for pending in &mut self.pending_recast {
            if pending.is_some_and(|handle| handle.index == index && handle.id == id) {
                *pending = None;
            }
        }
    }

    fn take_pending_recast(&mut self, button_index: usize) -> Option<SlotHandle> {
        self.pending_recast.get_mut(button_index)?.take()
    }

    pub fn is_live(&self, handle: SlotHandle) -> bool {
        !handle.id.is_empty() && self.ids.get(handle.index) == Some(&handle.id)
    }

    pub fn effect(&self, handle: SlotHandle) -> Option<&SpellEffect> {
        if !self.is_live(handle) {
            return None;
        }
        self.slots[handle.index].as_ref().map(|slot| &slot.effect)
    }

    /// Handles of every live slot in table order.
    pub fn live_slots(&self) -> impl Iterator<Item = SlotHandle> + '_ {
        self.ids
            .iter()
            .enumerate()
            .filter(|(_, id)| !id.is_empty())
            .map(|(index, id)| SlotHandle { index, id: *id })
    }

    pub fn active_count(&self) -> usize {
        self.ids.iter().filter(|id| !id.is_empty()).count()
    }

    pub fn capacity(&self) -> usize {
        self.ids.len()
    }

    pub fn pending_recast(&self, button_index: usize) -> Option<SlotHandle> {
        self.pending_recast.get(button_index).copied().flatten()
    }

    pub fn data_sources(&self) -> &SpellDataSourcePool {
        &self.data_sources
    }

    pub fn data_sources_mut(&mut self) -> &mut SpellDataSourcePool {
        &mut self.data_sources
    }
}

fn context<'a>(
    data_sources: &'a mut SpellDataSourcePool,
    tuning: &'a EffectTuning,
    env: &'a mut SpellEnv<'_>,
) -> SpellContext<'a> {
    SpellContext {
        data_sources,
        mana_pool: &mut *env.mana_pool,
        world: &mut *env.world,
        tuning,
        dt: env.dt,
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::mana::ManaPoolDefinition;
    use crate::spell::testing::TestWorld;
    use crate::spell::{CastState, SpellSymbol};
    use crate::types::{ElementType, EntityId};

    const DT: f32 = 1.0 / 30.0;

    fn sym(kind: SymbolKind) -> SpellSymbol {
        SpellSymbol::new(kind, ElementType::None)
    }

    fn chain(kinds: &[SymbolKind]) -> Arc<Spell> {
        Arc::new(Spell::chain(kinds.iter().map(|kind| sym(*kind))).unwrap())
    }

    fn player_source() -> SpellDataSource {
        SpellDataSource {
            position: Vec3::ZERO,
            direction: Vec3::X,
            target: Some(EntityId::PLAYER),
            cast_state: CastState::Instant,
            element: ElementType::None,
        }
    }

    struct Harness {
        executor: SpellExecutor,
        pool: ManaPool,
        world: TestWorld,
    }

    impl Harness {
        fn new(slots: usize) -> Self {
            let config = SpellConfig::new().with_executor_slots(slots);
            Self {
                executor: SpellExecutor::new(&config),
                pool: ManaPool::new(&ManaPoolDefinition::default()),
                world: TestWorld::with_player(),
            }
        }

        fn cast(&mut self, button: usize, spell: &Arc<Spell>) -> Option<SlotHandle> {
            self.cast_from(button, spell, player_source())
        }

        fn cast_from(
            &mut self,
            button: usize,
            spell: &Arc<Spell>,
            source: SpellDataSource,
        ) -> Option<SlotHandle> {
            let mut env = SpellEnv::new(&mut self.pool, &mut self.world, DT);
            self.executor
                .cast(button, Arc::clone(spell), source, &mut env)
                .unwrap()
        }

        fn update(&mut self) -> ExecutorReport {
            let mut env = SpellEnv::new(&mut self.pool, &mut self.world, DT);
            self.executor.update(&mut env)
        }
    }

    #[test]
    fn full_table_evicts_the_smallest_id() {
        let mut harness = Harness::new(3);
        let recast = chain(&[SymbolKind::Recast]);
        for button in 0..3 {
            harness.cast(button, &recast);
        }
        harness.executor.ids.copy_from_slice(&[SlotId(5), SlotId(2), SlotId(9)]);
        harness.executor.next_id = 10;

        let handle = harness.cast(3, &recast).unwrap();

        assert_eq!(handle.index, 1);
        assert_eq!(handle.id, SlotId(10));
        let report = harness.update();
        assert_eq!(report.evicted, vec![SlotId(2)]);
        assert_eq!(harness.executor.active_count(), 3);
    }

    #[test]
    fn update_visits_oldest_first() {
        let mut harness = Harness::new(3);
        let recast = chain(&[SymbolKind::Recast]);
        for button in 0..3 {
            harness.cast(button, &recast);
        }
        harness.executor.ids.copy_from_slice(&[SlotId(7), SlotId(3), SlotId(5)]);

        let report = harness.update();

        assert_eq!(report.updated, vec![SlotId(3), SlotId(5), SlotId(7)]);
    }

    #[test]
    fn chained_slots_wait_for_the_next_update() {
        let mut harness = Harness::new(4);
        let spell = chain(&[SymbolKind::Explosion, SymbolKind::Explosion]);
        let first = harness.cast(0, &spell).unwrap();

        let report = harness.update();
        assert_eq!(report.updated, vec![first.id]);
        assert_eq!(report.chained.len(), 1);
        assert_eq!(harness.executor.active_count(), 2);

        let report = harness.update();
        assert_eq!(report.updated.len(), 2);
    }

    #[test]
    fn destroy_frees_the_index_before_chaining() {
        let mut harness = Harness::new(1);
        let spell = chain(&[SymbolKind::Recast, SymbolKind::Explosion]);

        let recast = harness.cast(0, &spell).unwrap();
        assert_eq!(harness.executor.pending_recast(0), Some(recast));

        // Second press on the same button triggers the parked recast.
        let triggered = harness.cast(0, &spell).unwrap();
        assert_eq!(triggered, recast);
        assert_eq!(harness.executor.data_sources().live(), 2);

        let report = harness.update();
        assert_eq!(report.destroyed, vec![recast.id]);
        assert!(report.evicted.is_empty());
        assert_eq!(report.chained, vec![SlotId(2)]);

        let chained = harness.executor.live_slots().next().unwrap();
        assert_eq!(chained.index, recast.index);
        assert_eq!(
            harness.executor.effect(chained).map(SpellEffect::kind),
            Some(SymbolKind::Explosion)
        );
        assert_eq!(harness.executor.data_sources().live(), 1);
        assert_eq!(harness.executor.pending_recast(0), None);
    }

    #[test]
    fn blank_first_symbol_claims_nothing() {
        let mut harness = Harness::new(2);
        let spell = Arc::new(
            Spell::from_rows(vec![vec![SpellSymbol::BLANK, sym(SymbolKind::Fire)]]).unwrap(),
        );

        assert_eq!(harness.cast(0, &spell), None);
        assert_eq!(harness.executor.active_count(), 0);
        assert_eq!(harness.executor.data_sources().live(), 0);
    }

    #[test]
    fn stop_only_tears_down_the_given_button() {
        let mut harness = Harness::new(4);
        let recast = chain(&[SymbolKind::Recast]);
        harness.cast(0, &recast);
        let kept = harness.cast(1, &recast).unwrap();

        let mut env = SpellEnv::new(&mut harness.pool, &mut harness.world, DT);
        harness.executor.stop(0, &mut env);

        assert_eq!(harness.executor.live_slots().collect::<Vec<_>>(), vec![kept]);
        assert_eq!(harness.executor.pending_recast(0), None);
        assert_eq!(harness.executor.data_sources().live(), 1);
    }

    #[test]
    fn destroy_all_releases_everything() {
        let mut harness = Harness::new(4);
        harness.executor.attach_update(UpdateId(7));
        harness.cast(0, &chain(&[SymbolKind::Projectile]));
        harness.cast(1, &chain(&[SymbolKind::Fire]));

        let mut env = SpellEnv::new(&mut harness.pool, &mut harness.world, DT);
        assert_eq!(harness.executor.destroy_all(&mut env), Some(UpdateId(7)));

        assert_eq!(harness.executor.active_count(), 0);
        assert_eq!(harness.executor.data_sources().live(), 0);
        assert!(harness.world.colliders.is_empty());
        assert!(harness.world.renders.is_empty());
    }

    #[test]
    fn projectile_hit_chains_a_source_at_the_victim() {
        let mut harness = Harness::new(4);
        let victim = EntityId(7);
        harness.world.spawn(victim, Vec3::new(1.0, 0.0, 0.0));
        harness.world.contact = Some(victim);

        let spell = chain(&[SymbolKind::Projectile, SymbolKind::Push]);
        harness.cast(0, &spell);
        let report = harness.update();

        assert_eq!(report.destroyed.len(), 1);
        assert_eq!(report.chained.len(), 1);
        assert_eq!(harness.world.damage_log.len(), 1);
        assert_eq!(harness.world.damage_log[0].0, victim);
        assert_eq!(harness.executor.data_sources().live(), 1);

        // The chained push acts on the victim.
        harness.update();
        assert!(harness.world.velocity(victim).x > 0.0);
    }

    #[test]
    fn explosion_chains_down_right_through_its_secondary_event() {
        let mut harness = Harness::new(4);
        let spell = Arc::new(
            Spell::from_rows(vec![
                vec![sym(SymbolKind::Explosion)],
                vec![SpellSymbol::BLANK, sym(SymbolKind::Fire)],
            ])
            .unwrap(),
        );
        assert!(!spell.has_primary_event(0, 0));
        assert!(spell.has_secondary_event(0, 0));
        let blast = harness.cast(0, &spell).unwrap();

        let report = harness.update();
        assert_eq!(report.updated, vec![blast.id]);
        assert_eq!(report.chained.len(), 1);

        let fire = harness
            .executor
            .live_slots()
            .find(|handle| handle.id == report.chained[0])
            .unwrap();
        assert_eq!(
            harness.executor.effect(fire).map(SpellEffect::kind),
            Some(SymbolKind::Fire)
        );
        // Both slots hold the one cast source.
        assert_eq!(harness.executor.data_sources().live(), 1);

        let report = harness.update();
        assert!(report.updated.contains(&fire.id));
    }

    #[test]
    fn projectile_miss_chains_its_secondary_symbol() {
        let mut harness = Harness::new(4);
        let spell = Arc::new(
            Spell::from_rows(vec![
                vec![sym(SymbolKind::Projectile)],
                vec![SpellSymbol::BLANK, sym(SymbolKind::Explosion)],
            ])
            .unwrap(),
        );
        harness.cast(0, &spell);

        let mut chained = Vec::new();
        for _ in 0..60 {
            chained.extend(harness.update().chained);
        }

        assert_eq!(chained.len(), 1);
        assert!(harness.world.damage_log.is_empty());
    }

    #[test]
    fn partial_payment_weakens_the_projectile() {
        let mut harness = Harness::new(2);
        let victim = EntityId(7);
        harness.world.spawn(victim, Vec3::new(1.0, 0.0, 0.0));
        harness.world.contact = Some(victim);
        let leave = harness.pool.current_mana() - 2.5;
        harness.pool.request(leave);

        harness.cast(0, &chain(&[SymbolKind::Projectile]));
        harness.update();

        assert_eq!(harness.world.damage_log.len(), 1);
        assert!((harness.world.damage_log[0].1 - 0.5).abs() < 1e-4);
    }

    #[test]
    fn push_with_missing_target_destroys_itself() {
        let mut harness = Harness::new(2);
        let source = SpellDataSource {
            target: Some(EntityId(99)),
            ..player_source()
        };
        harness.cast_from(0, &chain(&[SymbolKind::Push]), source);

        let report = harness.update();

        assert_eq!(report.destroyed.len(), 1);
        assert_eq!(harness.executor.data_sources().live(), 0);
    }

    #[test]
    fn instant_push_draws_a_burst_then_accelerates() {
        let mut harness = Harness::new(2);
        harness.cast(0, &chain(&[SymbolKind::Push]));

        let report = harness.update();

        assert!(report.destroyed.is_empty());
        assert_eq!(harness.pool.current_mana(), 80.0);
        let velocity = harness.world.velocity(EntityId::PLAYER);
        assert!((velocity.x - DT * 60.0).abs() < 1e-4);
    }

    #[test]
    fn empty_pool_stops_a_held_push() {
        let mut harness = Harness::new(2);
        harness.pool.request(f32::MAX);
        let source = SpellDataSource {
            cast_state: CastState::Held,
            ..player_source()
        };
        harness.cast_from(0, &chain(&[SymbolKind::Push]), source);

        let report = harness.update();

        assert_eq!(report.destroyed.len(), 1);
    }

    #[test]
    fn untriggered_recast_expires() {
        let mut harness = Harness::new(2);
        harness.cast(0, &chain(&[SymbolKind::Recast, SymbolKind::Fire]));

        let destroyed: usize = (0..120).map(|_| harness.update().destroyed.len()).sum();

        assert_eq!(destroyed, 1);
        assert_eq!(harness.executor.pending_recast(0), None);
        assert_eq!(harness.executor.data_sources().live(), 0);
    }
}
