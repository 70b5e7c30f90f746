//! Worker tasks that back the runtime orchestration.

mod tick;

pub use tick::{Command, TickWorker};
