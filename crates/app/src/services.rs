//! Application services: use-case implementations.
//!
//! Each service is built from a port trait implementation (constructor
//! injection), keeping this layer decoupled from concrete adapters.

pub mod control_service;
pub mod dashboard_service;
