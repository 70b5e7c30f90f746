//! Tick worker that owns the authoritative [`GameSession`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), advances
//! the session on a fixed interval, and publishes whatever the session
//! queued to the EventBus.

use std::time::Duration;

use glam::Vec3;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use spellcast_core::{Cutscene, EntityId, ItemType, SlotHandle, SpellDataSource};

use crate::api::Result;
use crate::events::EventBus;
use crate::session::{FinishPolicy, GameSession, SessionStatus};

/// Commands that can be sent to the tick worker
pub enum Command {
    /// Cast a named spell from a data source.
    Cast {
        button: usize,
        spell: String,
        source: SpellDataSource,
        reply: oneshot::Sender<Result<Option<SlotHandle>>>,
    },
    /// Tear down every slot started from a button.
    Stop {
        button: usize,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Move mana from the pool into the charge reserve.
    Charge {
        amount: f32,
        reply: oneshot::Sender<()>,
    },
    Spawn {
        position: Vec3,
        radius: f32,
        health: Option<f32>,
        reply: oneshot::Sender<EntityId>,
    },
    /// Queue a cutscene from the library.
    PlayCutscene {
        name: String,
        policy: FinishPolicy,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Queue a cutscene assembled by the caller.
    PlayProgram {
        name: String,
        cutscene: Cutscene,
        policy: FinishPolicy,
        reply: oneshot::Sender<Result<()>>,
    },
    RevealItem {
        item: ItemType,
        message: String,
        reply: oneshot::Sender<Result<bool>>,
    },
    DismissDialog { reply: oneshot::Sender<bool> },
    /// Run ticks immediately, independent of the interval.
    Advance {
        ticks: u32,
        reply: oneshot::Sender<SessionStatus>,
    },
    QueryStatus { reply: oneshot::Sender<SessionStatus> },
    /// Tear the session down and stop the worker.
    Shutdown { reply: oneshot::Sender<()> },
}

/// Background task that advances the session and processes commands.
pub struct TickWorker {
    session: GameSession,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    /// `None` when ticks only advance through [`Command::Advance`].
    period: Option<Duration>,
}

impl TickWorker {
    pub fn new(
        session: GameSession,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        period: Option<Duration>,
    ) -> Self {
        info!(?period, "TickWorker initialized");

        Self {
            session,
            command_rx,
            event_bus,
            period,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        match self.period {
            Some(period) => {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        cmd = self.command_rx.recv() => match cmd {
                            Some(cmd) => {
                                if self.handle_command(cmd) {
                                    return;
                                }
                            }
                            None => break,
                        },
                        _ = interval.tick() => self.tick(),
                    }
                }
            }
            None => {
                while let Some(cmd) = self.command_rx.recv().await {
                    if self.handle_command(cmd) {
                        return;
                    }
                }
            }
        }

        // Every handle was dropped without an explicit shutdown.
        self.session.shutdown();
        self.publish();
        info!("TickWorker stopped");
    }

    fn tick(&mut self) {
        self.session.tick();
        self.publish();
    }

    fn publish(&mut self) {
        for event in self.session.drain_events() {
            self.event_bus.publish(event);
        }
    }

    /// Returns true once the worker should stop.
    fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Cast {
                button,
                spell,
                source,
                reply,
            } => {
                let result = self.session.cast(button, &spell, source);
                if reply.send(result).is_err() {
                    debug!("Cast reply channel closed (caller dropped)");
                }
            }
            Command::Stop { button, reply } => {
                let result = self.session.stop(button);
                if reply.send(result).is_err() {
                    debug!("Stop reply channel closed (caller dropped)");
                }
            }
            Command::Charge { amount, reply } => {
                self.session.charge(amount);
                if reply.send(()).is_err() {
                    debug!("Charge reply channel closed (caller dropped)");
                }
            }
            Command::Spawn {
                position,
                radius,
                health,
                reply,
            } => {
                let entity = self.session.spawn(position, radius, health);
                if reply.send(entity).is_err() {
                    debug!("Spawn reply channel closed (caller dropped)");
                }
            }
            Command::PlayCutscene {
                name,
                policy,
                reply,
            } => {
                let result = self.session.play_cutscene(&name, policy);
                if reply.send(result).is_err() {
                    debug!("PlayCutscene reply channel closed (caller dropped)");
                }
            }
            Command::PlayProgram {
                name,
                cutscene,
                policy,
                reply,
            } => {
                let result = self.session.play_program(name, cutscene, policy);
                if reply.send(result).is_err() {
                    debug!("PlayProgram reply channel closed (caller dropped)");
                }
            }
            Command::RevealItem {
                item,
                message,
                reply,
            } => {
                let result = self.session.reveal_item(item, &message);
                if reply.send(result).is_err() {
                    debug!("RevealItem reply channel closed (caller dropped)");
                }
            }
            Command::DismissDialog { reply } => {
                let dismissed = self.session.dismiss_dialog();
                if reply.send(dismissed).is_err() {
                    debug!("DismissDialog reply channel closed (caller dropped)");
                }
            }
            Command::Advance { ticks, reply } => {
                for _ in 0..ticks {
                    self.tick();
                }
                if reply.send(self.session.status()).is_err() {
                    debug!("Advance reply channel closed (caller dropped)");
                }
            }
            Command::QueryStatus { reply } => {
                if reply.send(self.session.status()).is_err() {
                    debug!("QueryStatus reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown { reply } => {
                self.session.shutdown();
                self.publish();
                info!("TickWorker stopped");
                if reply.send(()).is_err() {
                    debug!("Shutdown reply channel closed (caller dropped)");
                }
                return true;
            }
        }

        // Commands may queue events outside of a tick.
        self.publish();
        false
    }
}
