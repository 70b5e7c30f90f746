//! Per-update event buffer.
//!
//! Each slot update gets a fresh listener. Effects record what happened
//! (destroy me, chain right, chain down-right) and the executor decides what
//! to do once the update has returned, so an effect never mutates the slot
//! table while it is being iterated.
//!
//! Every event that carries a data source owns one reference to it. The
//! executor hands that reference to the chained slot or releases it.

use arrayvec::ArrayVec;

use crate::config::SpellConfig;
use crate::spell::{DataSourceHandle, SpellDataSourcePool};

/// What an effect asks the executor to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SpellEventType {
    /// Tear down the emitting slot.
    Destroy,
    /// Trigger the symbol to the right.
    Primary,
    /// Trigger the symbol down and to the right.
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpellEvent {
    pub kind: SpellEventType,
    pub data_source: Option<DataSourceHandle>,
    /// Seconds the emitter asked the follow-up to wait. Chains are dispatched
    /// in the same update; the value is carried for effects that use it.
    pub delay: f32,
}

/// Bounded event buffer for one slot's update.
///
/// Overflow is an authoring problem (a symbol emitting more chain events
/// than [`SpellConfig::MAX_SPELL_EVENTS`]). Extra chain events are dropped and
/// counted so the executor can report them. A destroy request is a flag kept
/// outside the buffer and is never dropped.
#[derive(Debug, Default)]
pub struct SpellEventListener {
    events: ArrayVec<SpellEvent, { SpellConfig::MAX_SPELL_EVENTS }>,
    destroy: bool,
    dropped: usize,
}

impl SpellEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event, taking ownership of any data source reference it
    /// carries. Returns false when the buffer is full; the caller keeps the
    /// reference in that case.
    ///
    /// `Destroy` only raises the destroy flag; a source passed with it stays
    /// with the caller.
    pub fn add(
        &mut self,
        kind: SpellEventType,
        data_source: Option<DataSourceHandle>,
        delay: f32,
    ) -> bool {
        if kind == SpellEventType::Destroy {
            self.destroy = true;
            return data_source.is_none();
        }
        let event = SpellEvent {
            kind,
            data_source,
            delay,
        };
        if self.events.try_push(event).is_err() {
            self.dropped += 1;
            return false;
        }
        true
    }

    /// Emits an event carrying a source the effect keeps using itself.
    pub fn add_shared(
        &mut self,
        kind: SpellEventType,
        source: DataSourceHandle,
        sources: &mut SpellDataSourcePool,
    ) {
        if self.is_full() {
            self.dropped += 1;
            return;
        }
        if sources.retain(source) {
            self.add(kind, Some(source), 0.0);
        }
    }

    /// Emits an event carrying a reference the effect hands over, such as a
    /// freshly allocated source. The reference is released if the event is
    /// dropped.
    pub fn add_owned(
        &mut self,
        kind: SpellEventType,
        source: DataSourceHandle,
        sources: &mut SpellDataSourcePool,
    ) {
        if !self.add(kind, Some(source), 0.0) {
            sources.release(source);
        }
    }

    /// Emits a destroy request for the emitting slot.
    pub fn destroy(&mut self) {
        self.destroy = true;
    }

    pub fn is_full(&self) -> bool {
        self.events.is_full()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events rejected because the buffer was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn has_destroy(&self) -> bool {
        self.destroy
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpellEvent> {
        self.events.iter()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = SpellEvent> + '_ {
        self.events.drain(..)
    }
}
