//! Spell casting: definitions, shared data sources, events, effects and the
//! slot executor that schedules them.
pub mod data_source;
pub mod definition;
pub mod effect;
pub mod event;
pub mod executor;

#[cfg(test)]
pub(crate) mod testing;

pub use data_source::{CastState, DataSourceHandle, SpellDataSource, SpellDataSourcePool};
pub use definition::{Spell, SpellSymbol, SymbolKind};
pub use effect::{SpellContext, SpellEffect, SpellEventOptions};
pub use event::{SpellEvent, SpellEventListener, SpellEventType};
pub use executor::{ExecutorReport, SlotHandle, SlotId, SpellEnv, SpellExecutor};

use crate::error::{ErrorSeverity, GameError};

/// Errors raised while building a spell definition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpellError {
    #[error("spell grid has no symbols")]
    Empty,

    #[error("spell grid {cols}x{rows} exceeds the maximum dimension")]
    GridTooLarge { cols: usize, rows: usize },
}

impl GameError for SpellError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "SPELL_EMPTY",
            Self::GridTooLarge { .. } => "SPELL_GRID_TOO_LARGE",
        }
    }
}

/// Errors raised by the data source pool.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DataSourceError {
    #[error("all {capacity} spell data sources are in use")]
    PoolExhausted { capacity: usize },
}

impl GameError for DataSourceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PoolExhausted { .. } => "DATA_SOURCE_POOL_EXHAUSTED",
        }
    }
}
