//! # plantwatch-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** that store adapters implement:
//!   - `RemoteStore`: subscribe to a path, merge-update, replace-set
//! - Provide the **live value** handle (`ValueSubscription`) every adapter
//!   hands out for a subscribed path
//! - Define the **use-cases**:
//!   - `CommandDispatcher`: fire-and-forget writes
//!   - `AutomationController`: moisture threshold automation loop
//!   - `DashboardService`: current snapshot and change notifications
//!   - `ControlService`: power / mode / pump toggles
//!
//! ## Dependency rule
//! Depends on `plantwatch-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod automation_controller;
pub mod dispatcher;
pub mod ports;
pub mod services;
pub mod subscription;

#[cfg(test)]
pub(crate) mod testing;
