//! Automation decision: moisture threshold → pump command.
//!
//! The decision is a pure function of the four observed inputs. It never
//! commands the pump into the state it is already in, so re-evaluating the
//! same inputs is a no-op. There is no hysteresis band: a reading hovering
//! around the threshold toggles the pump on every crossing.

use serde::{Deserialize, Serialize};

use crate::actuator::ActuatorState;
use crate::sensor::SensorReading;
use crate::system::{OperationMode, SystemState};

/// Below this moisture (percent) the pump is switched on; at or above it,
/// off.
pub const MOISTURE_THRESHOLD: f64 = 35.0;

/// Everything the decision looks at, as last observed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AutomationInputs {
    pub moisture: Option<f64>,
    pub mode: Option<OperationMode>,
    pub enabled: Option<bool>,
    pub pump_on: Option<bool>,
}

impl AutomationInputs {
    /// Gather inputs from the three decoded nodes (each possibly absent).
    #[must_use]
    pub fn observe(
        sensors: Option<&SensorReading>,
        system: Option<&SystemState>,
        actuators: Option<&ActuatorState>,
    ) -> Self {
        Self {
            moisture: sensors.and_then(|s| s.moisture),
            mode: system.and_then(|s| s.mode),
            enabled: system.and_then(|s| s.enabled),
            pump_on: actuators.and_then(|a| a.water_pump),
        }
    }
}

/// The single write a COMMANDED decision issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PumpCommand {
    TurnOn,
    TurnOff,
}

impl PumpCommand {
    /// Target value of the `waterPump` field.
    #[must_use]
    pub fn pump_on(self) -> bool {
        matches!(self, Self::TurnOn)
    }
}

impl std::fmt::Display for PumpCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TurnOn => f.write_str("pump on"),
            Self::TurnOff => f.write_str("pump off"),
        }
    }
}

/// Decide whether the pump must be commanded. `None` means IDLE.
#[must_use]
pub fn decide(inputs: &AutomationInputs) -> Option<PumpCommand> {
    if inputs.enabled == Some(false) {
        return None;
    }
    let moisture = inputs.moisture?;
    if inputs.mode != Some(OperationMode::Auto) {
        return None;
    }

    let pump_on = inputs.pump_on == Some(true);
    if moisture < MOISTURE_THRESHOLD && !pump_on {
        Some(PumpCommand::TurnOn)
    } else if moisture >= MOISTURE_THRESHOLD && pump_on {
        Some(PumpCommand::TurnOff)
    } else {
        None
    }
}
