//! Actuator state: the irrigation pump.

use serde::{Deserialize, Serialize};

/// The `actuators` node.
///
/// Written both by the automation controller (AUTO mode) and by direct user
/// commands; the last write wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorState {
    #[serde(rename = "waterPump", default)]
    pub water_pump: Option<bool>,
}

impl ActuatorState {
    /// Whether the pump is known to be running.
    #[must_use]
    pub fn pump_on(&self) -> bool {
        self.water_pump == Some(true)
    }
}
