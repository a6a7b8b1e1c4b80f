//! # plantwatch-domain
//!
//! Pure domain model for the plantwatch smart-plant monitor.
//!
//! ## Responsibilities
//! - Foundational types: validated store paths, error conventions, timestamps
//! - Tree operations shared by every store adapter (get / set / merge)
//! - Typed views of the remote nodes (**sensors**, **actuators**, **system**,
//!   **history**)
//! - The **automation decision**: moisture threshold → pump command
//! - **Control plans**: which writes a power / mode / pump toggle issues
//! - The **dashboard view**: everything the presentation layer displays
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod path;
pub mod time;
pub mod tree;

pub mod actuator;
pub mod automation;
pub mod control;
pub mod dashboard;
pub mod history;
pub mod sensor;
pub mod system;
