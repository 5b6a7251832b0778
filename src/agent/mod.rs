//! Unified SwapRate agent

#[allow(clippy::module_inception)]
pub mod agent;

pub use agent::Agent;
