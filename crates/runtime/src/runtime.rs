//! High-level runtime orchestrator.
//!
//! The runtime owns the tick worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the simulation.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use spellcast_content::{ContentFactory, SpellBook};
use spellcast_core::{Cutscene, SpellConfig};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::session::{CutsceneLibrary, GameSession, SessionConfig};
use crate::workers::{Command, TickWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Ticks per second driven by the worker; 0 leaves ticking to
    /// [`RuntimeHandle::advance`].
    pub tick_hz: u32,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Directory holding `config.toml`, `spells.ron` and `cutscenes/`.
    pub content_dir: Option<PathBuf>,
    pub item_display_duration: f32,
    pub auto_dismiss_dialogs: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_hz: 30,
            event_buffer_size: 100,
            command_buffer_size: 32,
            content_dir: None,
            item_display_duration: 0.5,
            auto_dismiss_dialogs: false,
        }
    }
}

impl RuntimeConfig {
    /// Loads configuration from `SPELLCAST_*` environment variables, keeping
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tick_hz: env_or("SPELLCAST_TICK_HZ", defaults.tick_hz),
            event_buffer_size: env_or("SPELLCAST_EVENT_BUFFER", defaults.event_buffer_size),
            command_buffer_size: env_or("SPELLCAST_COMMAND_BUFFER", defaults.command_buffer_size),
            content_dir: env::var_os("SPELLCAST_CONTENT_DIR")
                .map(PathBuf::from)
                .or(defaults.content_dir),
            item_display_duration: env_or(
                "SPELLCAST_ITEM_DISPLAY_SECS",
                defaults.item_display_duration,
            ),
            auto_dismiss_dialogs: env_or(
                "SPELLCAST_AUTO_DISMISS_DIALOGS",
                defaults.auto_dismiss_dialogs,
            ),
        }
    }

    /// Interval between worker ticks.
    pub fn tick_period(&self) -> Option<Duration> {
        (self.tick_hz > 0).then(|| Duration::from_nanos(1_000_000_000 / u64::from(self.tick_hz)))
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %value, "ignoring unparsable environment variable");
            default
        }),
        Err(_) => default,
    }
}

/// Main runtime that orchestrates the spell and cutscene simulation
///
/// Design: Runtime owns the worker and coordinates its lifetime.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to events on a topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// Every running spell and cutscene is torn down before the worker exits.
    pub async fn shutdown(self) -> Result<()> {
        match self.handle.shutdown_worker().await {
            // The worker already stopped on its own.
            Ok(()) | Err(RuntimeError::CommandChannelClosed) => {}
            Err(err) => return Err(err),
        }

        self.worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    spell_config: Option<SpellConfig>,
    spells: Option<SpellBook>,
    cutscenes: Vec<(String, Cutscene)>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            spell_config: None,
            spells: None,
            cutscenes: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use this core configuration instead of the content directory's
    /// `config.toml`
    pub fn spell_config(mut self, config: SpellConfig) -> Self {
        self.spell_config = Some(config);
        self
    }

    /// Use this spell book instead of the content directory's `spells.ron`
    pub fn spells(mut self, spells: SpellBook) -> Self {
        self.spells = Some(spells);
        self
    }

    /// Register a cutscene under `name`, ahead of anything in content
    pub fn cutscene(mut self, name: impl Into<String>, cutscene: Cutscene) -> Self {
        self.cutscenes.push((name.into(), cutscene));
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        let factory = self.config.content_dir.clone().map(ContentFactory::new);

        let spell_config = match (self.spell_config, &factory) {
            (Some(config), _) => config,
            (None, Some(factory)) => factory
                .load_config()
                .map_err(|err| RuntimeError::Content(err.into()))?,
            (None, None) => SpellConfig::default(),
        };
        let spells = match (self.spells, &factory) {
            (Some(spells), _) => spells,
            (None, Some(factory)) => factory
                .load_spells()
                .map_err(|err| RuntimeError::Content(err.into()))?,
            (None, None) => SpellBook::default(),
        };

        let mut library = match factory {
            Some(factory) => CutsceneLibrary::with_factory(factory),
            None => CutsceneLibrary::new(),
        };
        for (name, cutscene) in self.cutscenes {
            cutscene.validate()?;
            library.insert(name, cutscene);
        }

        let session = GameSession::new(
            SessionConfig {
                spell: spell_config,
                item_display_duration: self.config.item_display_duration,
                auto_dismiss_dialogs: self.config.auto_dismiss_dialogs,
            },
            spells,
            library,
        );

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let worker = TickWorker::new(session, command_rx, event_bus, self.config.tick_period());
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        info!(tick_hz = self.config.tick_hz, "runtime started");

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
