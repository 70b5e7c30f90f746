//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, content loading and the core
//! systems so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use spellcast_core::{CutsceneError, DataSourceError, ErrorSeverity, GameError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("tick worker command channel closed")]
    CommandChannelClosed,

    #[error("tick worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("tick worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("unknown spell {name:?}")]
    UnknownSpell { name: String },

    #[error("button {button} is out of range (max {max})")]
    InvalidButton { button: usize, max: usize },

    #[error("unknown cutscene {name:?}")]
    UnknownCutscene { name: String },

    #[error("failed to load content")]
    Content(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error(transparent)]
    Cutscene(#[from] CutsceneError),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Internal
            }
            Self::UnknownSpell { .. }
            | Self::InvalidButton { .. }
            | Self::UnknownCutscene { .. } => ErrorSeverity::Validation,
            Self::Content(_) => ErrorSeverity::Fatal,
            Self::DataSource(err) => err.severity(),
            Self::Cutscene(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            Self::UnknownSpell { .. } => "RUNTIME_UNKNOWN_SPELL",
            Self::InvalidButton { .. } => "RUNTIME_INVALID_BUTTON",
            Self::UnknownCutscene { .. } => "RUNTIME_UNKNOWN_CUTSCENE",
            Self::Content(_) => "RUNTIME_CONTENT",
            Self::DataSource(err) => err.error_code(),
            Self::Cutscene(err) => err.error_code(),
        }
    }
}
