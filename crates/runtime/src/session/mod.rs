//! Single-threaded game session advanced one fixed tick at a time.
//!
//! [`GameSession`] owns the spell executor, the mana pool, the cutscene
//! runner and the in-memory world, and registers each of them with an
//! [`UpdateScheduler`]. A tick runs whatever the active layers allow, in
//! priority order: mana regeneration, spells, physics, then cutscenes. Layer
//! changes requested by a cutscene take effect on the following tick.
//!
//! The session performs no I/O. Everything observable it produces is queued
//! as an [`Event`] and drained by the tick worker.

mod library;
mod runner;
mod stage;
mod world;

pub use library::CutsceneLibrary;
pub use runner::{CutsceneOutcome, CutsceneRunner, FinishCallback, FinishPolicy};
pub use stage::Stage;
pub use world::{Body, RenderEntry, SimWorld};

use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use spellcast_content::{SpellBook, item_reveal};
use spellcast_core::{
    Cutscene, EntityId, ExecutorReport, Inventory, ItemType, ManaPool, SlotHandle, SlotId,
    SpellConfig, SpellDataSource, SpellEnv, SpellExecutor, UpdateLayers, UpdatePriority,
    VariableBlock,
};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, SpellEvent, TickEvent};
use crate::scheduler::UpdateScheduler;

/// Layers active outside of pauses and cutscenes.
pub const GAMEPLAY_LAYERS: UpdateLayers = UpdateLayers::WORLD
    .union(UpdateLayers::PLAYER)
    .union(UpdateLayers::CUTSCENE);

/// Per-tick systems the session registers with its scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum System {
    Mana,
    Spells,
    Physics,
    Cutscene,
}

/// Session tuning beyond the core [`SpellConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub spell: SpellConfig,
    /// Seconds a show-item animation takes.
    pub item_display_duration: f32,
    /// Close dialogs on the tick after they open, for unattended runs.
    pub auto_dismiss_dialogs: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            spell: SpellConfig::default(),
            item_display_duration: 0.5,
            auto_dismiss_dialogs: false,
        }
    }
}

/// Read-only snapshot of a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub tick: u64,
    pub mana: f32,
    pub max_mana: f32,
    pub charged_mana: f32,
    pub active_slots: usize,
    pub live_data_sources: usize,
    pub active_layers: u16,
    pub cutscene: Option<String>,
    pub dialog: Option<String>,
}

pub struct GameSession {
    config: SpellConfig,
    tick: u64,
    scheduler: UpdateScheduler<System>,
    executor: SpellExecutor,
    mana: ManaPool,
    world: SimWorld,
    globals: VariableBlock,
    runner: CutsceneRunner,
    stage: Stage,
    spells: SpellBook,
    library: CutsceneLibrary,
    outbox: Vec<Event>,
}

impl GameSession {
    pub fn new(config: SessionConfig, spells: SpellBook, library: CutsceneLibrary) -> Self {
        let SessionConfig {
            spell,
            item_display_duration,
            auto_dismiss_dialogs,
        } = config;

        let mut scheduler = UpdateScheduler::new(GAMEPLAY_LAYERS);
        scheduler.register(UpdatePriority::PLAYER, UpdateLayers::PLAYER, System::Mana);
        let spells_id = scheduler.register(UpdatePriority::SPELLS, UpdateLayers::WORLD, System::Spells);
        scheduler.register(UpdatePriority::EFFECTS, UpdateLayers::WORLD, System::Physics);
        scheduler.register(
            UpdatePriority::CUTSCENE,
            UpdateLayers::CUTSCENE,
            System::Cutscene,
        );

        let mut executor = SpellExecutor::new(&spell);
        executor.attach_update(spells_id);

        info!(
            slots = executor.capacity(),
            spells = spells.len(),
            tick_duration = spell.tick_duration,
            "game session initialized"
        );

        Self {
            mana: ManaPool::new(&spell.mana),
            globals: VariableBlock::new(spell.global_words),
            stage: Stage::new(item_display_duration, auto_dismiss_dialogs),
            config: spell,
            tick: 0,
            scheduler,
            executor,
            world: SimWorld::new(),
            runner: CutsceneRunner::new(),
            spells,
            library,
            outbox: Vec::new(),
        }
    }

    /// Advances the simulation by one tick.
    pub fn tick(&mut self) -> TickEvent {
        let dt = self.config.scaled_time_step();
        let systems: Vec<System> = self
            .scheduler
            .runnable()
            .map(|(_, system)| *system)
            .collect();

        for system in systems {
            match system {
                System::Mana => self.mana.update(dt),
                System::Spells => {
                    let mut env = SpellEnv::new(&mut self.mana, &mut self.world, dt);
                    let report = self.executor.update(&mut env);
                    self.record(report);
                }
                System::Physics => self.world.step(dt),
                System::Cutscene => {
                    let mut layers = self.scheduler.active_layers();
                    self.runner.update(
                        &mut self.stage,
                        &mut self.globals,
                        &mut layers,
                        dt,
                        self.config.max_cutscene_steps_per_tick,
                        &mut self.outbox,
                    );
                    self.scheduler.set_active_layers(layers);
                }
            }
        }

        self.tick += 1;
        let summary = TickEvent {
            tick: self.tick,
            mana: self.mana.current_mana(),
            active_slots: self.executor.active_count(),
        };
        self.outbox.push(Event::Tick(summary.clone()));
        summary
    }

    fn record(&mut self, report: ExecutorReport) {
        if report.is_quiet() {
            return;
        }
        debug!(
            tick = self.tick,
            updated = ?report.updated,
            destroyed = ?report.destroyed,
            chained = ?report.chained,
            "spell executor update"
        );
        if !report.evicted.is_empty() {
            warn!(tick = self.tick, evicted = ?report.evicted, "evicted oldest spell slots");
        }
        if report.dropped_events > 0 {
            warn!(
                tick = self.tick,
                dropped = report.dropped_events,
                "spell event listener overflowed"
            );
        }

        if report.destroyed.is_empty()
            && report.chained.is_empty()
            && report.evicted.is_empty()
            && report.dropped_events == 0
        {
            return;
        }
        let ids = |slots: &[SlotId]| -> Vec<u32> { slots.iter().map(|slot| slot.0).collect() };
        self.outbox.push(Event::Spell(SpellEvent::Activity {
            tick: self.tick,
            destroyed: ids(&report.destroyed),
            chained: ids(&report.chained),
            evicted: ids(&report.evicted),
            dropped_events: report.dropped_events,
        }));
    }

    // ========================================================================
    // Spells
    // ========================================================================

    /// Casts the named spell from `source` on `button`.
    ///
    /// # Errors
    ///
    /// `InvalidButton` and `UnknownSpell` for bad requests, `DataSource` when
    /// the data source pool is exhausted.
    pub fn cast(
        &mut self,
        button: usize,
        spell: &str,
        source: SpellDataSource,
    ) -> Result<Option<SlotHandle>> {
        check_button(button)?;
        let definition = self
            .spells
            .get(spell)
            .ok_or_else(|| RuntimeError::UnknownSpell {
                name: spell.to_string(),
            })?;

        let dt = self.config.scaled_time_step();
        let mut env = SpellEnv::new(&mut self.mana, &mut self.world, dt);
        // Evictions made here surface in the next tick's report.
        let handle = self.executor.cast(button, definition, source, &mut env)?;

        info!(button, spell, slot = ?handle.map(|h| h.id), "spell cast");
        self.outbox.push(Event::Spell(SpellEvent::Cast {
            button,
            spell: spell.to_string(),
            slot: handle.map(|h| h.id.0),
        }));
        Ok(handle)
    }

    /// Tears down every slot started from `button`.
    pub fn stop(&mut self, button: usize) -> Result<()> {
        check_button(button)?;
        let dt = self.config.scaled_time_step();
        let mut env = SpellEnv::new(&mut self.mana, &mut self.world, dt);
        self.executor.stop(button, &mut env);

        info!(button, "spell stopped");
        self.outbox.push(Event::Spell(SpellEvent::Stopped { button }));
        Ok(())
    }

    /// Moves mana from the pool into the charge reserve.
    pub fn charge(&mut self, amount: f32) {
        self.mana.charge(amount);
        debug!(amount, charged = self.mana.charged_mana(), "mana charged");
    }

    // ========================================================================
    // Cutscenes
    // ========================================================================

    /// Queues a named cutscene from the library.
    pub fn play_cutscene(&mut self, name: &str, policy: FinishPolicy) -> Result<()> {
        let cutscene = self.library.load(name)?;
        self.runner.play(name, cutscene, policy);
        Ok(())
    }

    /// Queues a cutscene assembled at runtime.
    pub fn play_program(
        &mut self,
        name: impl Into<String>,
        cutscene: Cutscene,
        policy: FinishPolicy,
    ) -> Result<()> {
        cutscene.validate()?;
        self.runner.play(name, Arc::new(cutscene), policy);
        Ok(())
    }

    pub fn dismiss_dialog(&mut self) -> bool {
        self.stage.dismiss_dialog()
    }

    /// Unlocks `item` and plays the reveal sequence for it. Returns false
    /// when the item was already owned.
    pub fn reveal_item(&mut self, item: ItemType, message: &str) -> Result<bool> {
        if self.world.has_item(item) {
            return Ok(false);
        }
        let cutscene = item_reveal(item, message)?;
        self.world.unlock_item(item);
        self.play_program(format!("reveal {item}"), cutscene, FinishPolicy::FreeOnFinish)?;
        Ok(true)
    }

    // ========================================================================
    // World
    // ========================================================================

    pub fn spawn(&mut self, position: Vec3, radius: f32, health: Option<f32>) -> EntityId {
        let entity = self.world.spawn(position, radius, health);
        debug!(%entity, ?position, ?health, "entity spawned");
        entity
    }

    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut SimWorld {
        &mut self.world
    }

    pub fn executor(&self) -> &SpellExecutor {
        &self.executor
    }

    pub fn mana_pool(&self) -> &ManaPool {
        &self.mana
    }

    pub fn globals(&self) -> &VariableBlock {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut VariableBlock {
        &mut self.globals
    }

    pub fn runner(&self) -> &CutsceneRunner {
        &self.runner
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn scheduler(&self) -> &UpdateScheduler<System> {
        &self.scheduler
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            tick: self.tick,
            mana: self.mana.current_mana(),
            max_mana: self.mana.max_mana(),
            charged_mana: self.mana.charged_mana(),
            active_slots: self.executor.active_count(),
            live_data_sources: self.executor.data_sources().live(),
            active_layers: self.scheduler.active_layers().bits(),
            cutscene: self.runner.current().map(str::to_string),
            dialog: self.stage.dialog().map(str::to_string),
        }
    }

    /// Takes every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbox)
    }

    /// Tears down every spell and cutscene and unregisters the spell update.
    pub fn shutdown(&mut self) {
        let dt = self.config.scaled_time_step();
        let mut env = SpellEnv::new(&mut self.mana, &mut self.world, dt);
        if let Some(id) = self.executor.destroy_all(&mut env) {
            self.scheduler.unregister(id);
        }

        let mut layers = self.scheduler.active_layers();
        self.runner
            .cancel_all(&mut self.stage, &mut layers, &mut self.outbox);
        self.scheduler.set_active_layers(layers);
        info!(tick = self.tick, "game session shut down");
    }
}

fn check_button(button: usize) -> Result<()> {
    if button >= SpellConfig::MAX_BUTTON_INDEX {
        return Err(RuntimeError::InvalidButton {
            button,
            max: SpellConfig::MAX_BUTTON_INDEX - 1,
        });
    }
    Ok(())
}
