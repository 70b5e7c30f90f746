//! Runtime orchestration for the fixed-tick spell and cutscene simulation.
//!
//! This crate wires the deterministic core systems into a session advanced by
//! a background worker. Consumers embed [`Runtime`] to start the simulation,
//! subscribe to events, and cast spells or play cutscenes through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`scheduler`] orders per-tick systems by priority and update layer
//! - [`session`] owns the spell executor, mana pool, cutscene runner and world
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;
pub mod scheduler;
pub mod session;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{CutsceneEvent, Event, EventBus, SpellEvent, TickEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use scheduler::UpdateScheduler;
pub use session::{
    CutsceneLibrary, CutsceneOutcome, CutsceneRunner, FinishPolicy, GameSession, SessionConfig,
    SessionStatus, SimWorld,
};
