//! Control plans: the writes each user toggle and automation decision issue.
//!
//! Planning is pure: it looks at the last observed nodes and returns the
//! writes to send. Sending them is the dispatcher's job.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::actuator::ActuatorState;
use crate::automation::PumpCommand;
use crate::error::ControlError;
use crate::path::StorePath;
use crate::system::{OperationMode, SystemState};

/// A single write against the remote tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Write {
    /// Merge `fields` into the node at `path`, leaving siblings untouched.
    Merge {
        path: StorePath,
        fields: Map<String, Value>,
    },
    /// Replace the node at `path` entirely.
    Replace { path: StorePath, value: Value },
}

impl Write {
    /// Merge a single field into `path`.
    #[must_use]
    pub fn merge_field(path: StorePath, key: &str, value: Value) -> Self {
        let mut fields = Map::new();
        fields.insert(key.to_string(), value);
        Self::Merge { path, fields }
    }

    /// `actuators { waterPump: on }`.
    #[must_use]
    pub fn pump(on: bool) -> Self {
        Self::merge_field(StorePath::actuators(), "waterPump", Value::Bool(on))
    }

    /// `system { enabled }`.
    #[must_use]
    pub fn enabled(enabled: bool) -> Self {
        Self::merge_field(StorePath::system(), "enabled", Value::Bool(enabled))
    }

    /// `system { mode }`.
    #[must_use]
    pub fn mode(mode: OperationMode) -> Self {
        Self::merge_field(StorePath::system(), "mode", Value::String(mode.to_string()))
    }

    /// The path this write targets.
    #[must_use]
    pub fn path(&self) -> &StorePath {
        match self {
            Self::Merge { path, .. } | Self::Replace { path, .. } => path,
        }
    }
}

impl From<PumpCommand> for Write {
    fn from(command: PumpCommand) -> Self {
        Self::pump(command.pump_on())
    }
}

/// Master switch toggle.
///
/// An absent flag counts as off, so the first press powers the system on.
/// Powering off also forces the pump off in the same plan.
#[must_use]
pub fn toggle_power(system: &SystemState) -> Vec<Write> {
    let enable = !system.powered_on();
    let mut writes = vec![Write::enabled(enable)];
    if !enable {
        writes.push(Write::pump(false));
    }
    writes
}

/// Mode toggle. Only allowed while the system is known to be powered on.
///
/// # Errors
///
/// Returns [`ControlError::SystemDisabled`] unless `enabled` is `true`.
pub fn toggle_mode(system: &SystemState) -> Result<Vec<Write>, ControlError> {
    if !system.powered_on() {
        return Err(ControlError::SystemDisabled);
    }
    let next = system
        .mode
        .map_or(OperationMode::Auto, OperationMode::toggled);
    Ok(vec![Write::mode(next)])
}

/// Pump start/stop from the control card.
///
/// Replaces the `actuators/waterPump` leaf with the opposite of its current
/// value.
///
/// # Errors
///
/// Returns [`ControlError::SystemDisabled`] when the master switch is off.
pub fn toggle_pump(
    system: &SystemState,
    actuators: &ActuatorState,
) -> Result<Vec<Write>, ControlError> {
    if system.powered_off() {
        return Err(ControlError::SystemDisabled);
    }
    Ok(vec![Write::Replace {
        path: StorePath::water_pump(),
        value: Value::Bool(!actuators.pump_on()),
    }])
}
