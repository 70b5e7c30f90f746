//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! casting spells, playing cutscenes or streaming events from specific topics.
use glam::Vec3;
use tokio::sync::{broadcast, mpsc, oneshot};

use spellcast_core::{Cutscene, EntityId, ItemType, SlotHandle, SpellDataSource};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::session::{FinishPolicy, SessionStatus};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Cast a named spell on `button` from `source`.
    ///
    /// Returns the slot claimed by the first symbol, `None` when the cast
    /// triggered a pending recast or started on a blank symbol.
    pub async fn cast(
        &self,
        button: usize,
        spell: impl Into<String>,
        source: SpellDataSource,
    ) -> Result<Option<SlotHandle>> {
        let spell = spell.into();
        self.request(|reply| Command::Cast {
            button,
            spell,
            source,
            reply,
        })
        .await?
    }

    /// Stop every running effect started from `button`
    pub async fn stop(&self, button: usize) -> Result<()> {
        self.request(|reply| Command::Stop { button, reply }).await?
    }

    /// Charge mana for the next cast
    pub async fn charge(&self, amount: f32) -> Result<()> {
        self.request(|reply| Command::Charge { amount, reply })
            .await
    }

    /// Spawn a body in the simulated world
    pub async fn spawn(&self, position: Vec3, radius: f32, health: Option<f32>) -> Result<EntityId> {
        self.request(|reply| Command::Spawn {
            position,
            radius,
            health,
            reply,
        })
        .await
    }

    /// Queue a cutscene by name, loading it from content on first use
    pub async fn play_cutscene(&self, name: impl Into<String>) -> Result<()> {
        self.play_cutscene_with(name, FinishPolicy::FreeOnFinish).await
    }

    /// Queue a cutscene by name with an explicit finish policy
    pub async fn play_cutscene_with(
        &self,
        name: impl Into<String>,
        policy: FinishPolicy,
    ) -> Result<()> {
        let name = name.into();
        self.request(|reply| Command::PlayCutscene {
            name,
            policy,
            reply,
        })
        .await?
    }

    /// Queue a cutscene assembled with the builder
    pub async fn play_program(
        &self,
        name: impl Into<String>,
        cutscene: Cutscene,
        policy: FinishPolicy,
    ) -> Result<()> {
        let name = name.into();
        self.request(|reply| Command::PlayProgram {
            name,
            cutscene,
            policy,
            reply,
        })
        .await?
    }

    /// Unlock an item and play its reveal sequence
    pub async fn reveal_item(&self, item: ItemType, message: impl Into<String>) -> Result<bool> {
        let message = message.into();
        self.request(|reply| Command::RevealItem {
            item,
            message,
            reply,
        })
        .await?
    }

    /// Dismiss the open dialog, if any
    pub async fn dismiss_dialog(&self) -> Result<bool> {
        self.request(|reply| Command::DismissDialog { reply })
            .await
    }

    /// Run `ticks` ticks right away and return the resulting status
    pub async fn advance(&self, ticks: u32) -> Result<SessionStatus> {
        self.request(|reply| Command::Advance { ticks, reply })
            .await
    }

    /// Query the current session status (read-only snapshot)
    pub async fn query_status(&self) -> Result<SessionStatus> {
        self.request(|reply| Command::QueryStatus { reply }).await
    }

    pub(crate) async fn shutdown_worker(&self) -> Result<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Spell` - Casts, stops and executor activity
    /// - `Topic::Cutscene` - Cutscene lifecycle, dialogs and item displays
    /// - `Topic::Tick` - Per-tick summaries
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
