//! System state: master switch and operation mode.

use serde::{Deserialize, Serialize};

/// Who controls the pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationMode {
    /// The automation controller may command the pump.
    Auto,
    /// Only explicit user commands affect the pump.
    Manual,
    /// Any other string found in the store. Treated as "not AUTO".
    #[serde(other)]
    Unknown,
}

impl OperationMode {
    /// The mode a toggle switches to: AUTO → MANUAL, anything else → AUTO.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Auto => Self::Manual,
            Self::Manual | Self::Unknown => Self::Auto,
        }
    }

    /// Label shown on the mode badge.
    #[must_use]
    pub fn badge_label(self) -> &'static str {
        match self {
            Self::Auto => "AUTO MODE",
            Self::Manual => "MANUAL MODE",
            Self::Unknown => "UNKNOWN MODE",
        }
    }
}

impl std::fmt::Display for OperationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => f.write_str("AUTO"),
            Self::Manual => f.write_str("MANUAL"),
            Self::Unknown => f.write_str("UNKNOWN"),
        }
    }
}

/// The `system` node. Mutated only by explicit user toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemState {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub mode: Option<OperationMode>,
}

impl SystemState {
    /// Whether the master switch is explicitly off.
    ///
    /// An absent flag is *not* powered off: the dashboard and automation
    /// both keep running until the flag is written `false`.
    #[must_use]
    pub fn powered_off(&self) -> bool {
        self.enabled == Some(false)
    }

    /// Whether the master switch is explicitly on.
    #[must_use]
    pub fn powered_on(&self) -> bool {
        self.enabled == Some(true)
    }
}
