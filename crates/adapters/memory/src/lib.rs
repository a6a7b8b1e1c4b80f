//! # plantwatch-adapter-memory
//!
//! In-process implementation of the `RemoteStore` port.
//!
//! ## Contents
//!
//! | Type | Role |
//! |------|------|
//! | [`MemoryStore`] | JSON tree behind a mutex, with the same merge / replace semantics as the hosted database |
//! | [`SimulatedDevice`] | Stand-in for the plant firmware: publishes readings and appends moisture history |
//!
//! Used by the daemon's demo mode and by tests across the workspace.
//!
//! ## Dependency rule
//!
//! Depends on `plantwatch-app` (port traits) and `plantwatch-domain` only.

mod simulator;
mod store;

pub use simulator::{HISTORY_LIMIT, SimulatedDevice, seed};
pub use store::MemoryStore;
