//! Dashboard view: everything the presentation layer displays, derived from
//! the subscribed nodes. Rendering lives in the HTTP adapter.

use serde::Serialize;

use crate::actuator::ActuatorState;
use crate::automation::MOISTURE_THRESHOLD;
use crate::history::HistoryPoint;
use crate::sensor::SensorReading;
use crate::system::SystemState;

/// Placeholder for a value that has not arrived.
pub const MISSING: &str = "--";

/// Whether sensor data has ever arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Live,
    Waiting,
}

impl ConnectionStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Live => "Live Connection",
            Self::Waiting => "Waiting for Data...",
        }
    }
}

/// Visual flavour of a stat card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Moisture,
    Temperature,
    Humidity,
    Light,
}

/// One of the four reading cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub unit: &'static str,
    pub kind: CardKind,
}

/// The pump control card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PumpCard {
    pub running: bool,
    pub status: &'static str,
    pub button: &'static str,
    pub button_disabled: bool,
}

/// The "system logic" card describing the automation rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicCard {
    pub threshold: f64,
    pub pump_active: bool,
}

/// The decoded subscribed nodes at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlantSnapshot {
    pub sensors: Option<SensorReading>,
    pub actuators: Option<ActuatorState>,
    pub system: Option<SystemState>,
    /// Windowed moisture history, oldest first.
    pub history: Vec<HistoryPoint>,
}

impl PlantSnapshot {
    #[must_use]
    pub fn view(&self) -> DashboardView {
        DashboardView::derive(
            self.sensors.as_ref(),
            self.actuators.as_ref(),
            self.system.as_ref(),
            self.history.clone(),
        )
    }
}

/// Derived dashboard state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub connection: ConnectionStatus,
    /// Master switch explicitly off: render the full-screen disabled view.
    pub powered_off: bool,
    pub mode_label: &'static str,
    pub cards: [StatCard; 4],
    pub pump: PumpCard,
    pub logic: LogicCard,
    pub chart: Vec<HistoryPoint>,
}

impl DashboardView {
    /// Derive the view from the latest nodes (each possibly absent) and the
    /// already-windowed history.
    #[must_use]
    pub fn derive(
        sensors: Option<&SensorReading>,
        actuators: Option<&ActuatorState>,
        system: Option<&SystemState>,
        chart: Vec<HistoryPoint>,
    ) -> Self {
        let system = system.copied().unwrap_or_default();
        let pump_on = actuators.is_some_and(ActuatorState::pump_on);
        let powered_off = system.powered_off();

        Self {
            connection: if sensors.is_some() {
                ConnectionStatus::Live
            } else {
                ConnectionStatus::Waiting
            },
            powered_off,
            mode_label: system.mode.map_or("UNKNOWN MODE", |m| m.badge_label()),
            cards: stat_cards(sensors),
            pump: PumpCard {
                running: pump_on,
                status: if pump_on {
                    "IRRIGATION ACTIVE"
                } else {
                    "SYSTEM STANDBY"
                },
                button: match (powered_off, pump_on) {
                    (true, _) => "DISABLED",
                    (false, true) => "STOP PUMP",
                    (false, false) => "START PUMP",
                },
                button_disabled: powered_off,
            },
            logic: LogicCard {
                threshold: MOISTURE_THRESHOLD,
                pump_active: pump_on,
            },
            chart,
        }
    }
}

fn stat_cards(sensors: Option<&SensorReading>) -> [StatCard; 4] {
    let reading = sensors.copied().unwrap_or_default();
    let light = match sensors {
        None => MISSING.to_string(),
        Some(s) => s.light.map_or("Dark", |l| l.label()).to_string(),
    };

    [
        StatCard {
            title: "Soil Moisture",
            value: format_number(reading.moisture),
            unit: "%",
            kind: CardKind::Moisture,
        },
        StatCard {
            title: "Temperature",
            value: format_number(reading.temperature),
            unit: "\u{b0}C",
            kind: CardKind::Temperature,
        },
        StatCard {
            title: "Air Humidity",
            value: format_number(reading.humidity),
            unit: "%",
            kind: CardKind::Humidity,
        },
        StatCard {
            title: "Light Status",
            value: light,
            unit: "",
            kind: CardKind::Light,
        },
    ]
}

/// Whole numbers print without a fraction; everything else keeps one digit.
fn format_number(value: Option<f64>) -> String {
    match value {
        None => MISSING.to_string(),
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => format!("{v:.1}"),
    }
}
