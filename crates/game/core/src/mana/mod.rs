//! Mana accounting: the shared pool and per-effect regulators.

mod pool;
mod regulator;

pub use pool::{ManaPool, ManaPoolDefinition};
pub use regulator::ManaRegulator;
