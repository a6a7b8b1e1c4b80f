//! Simulated plant device for demo mode.
//!
//! Each tick the device publishes a full `sensors` node and appends the
//! moisture reading to `history/moisture`. Moisture falls while the pump is
//! off and rises while it runs, so the automation loop has something to do.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use plantwatch_app::ports::RemoteStore;
use plantwatch_app::subscription::ValueSubscription;
use plantwatch_domain::actuator::ActuatorState;
use plantwatch_domain::error::PlantError;
use plantwatch_domain::history::HistoryPoint;
use plantwatch_domain::path::StorePath;
use plantwatch_domain::sensor::{LightLevel, SensorReading};
use plantwatch_domain::system::SystemState;
use plantwatch_domain::time::{clock_label, now};
use serde_json::{Map, Value, json};
use tokio::time::MissedTickBehavior;

/// Maximum number of history points the device keeps.
pub const HISTORY_LIMIT: usize = 100;

const DRYING_RATE: f64 = 2.5;
const WATERING_RATE: f64 = 6.0;
const INITIAL_MOISTURE: f64 = 50.0;

/// Initial tree for demo mode: powered on, AUTO, pump off.
#[must_use]
pub fn seed() -> Value {
    json!({
        "system": {"enabled": true, "mode": "AUTO"},
        "actuators": {"waterPump": false},
    })
}

/// A fake plant writing to any [`RemoteStore`].
pub struct SimulatedDevice<S> {
    store: Arc<S>,
    actuators: ValueSubscription,
    system: ValueSubscription,
    moisture: f64,
    tick: u32,
    history: VecDeque<String>,
}

impl<S: RemoteStore> SimulatedDevice<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            actuators: store.subscribe(&StorePath::actuators()),
            system: store.subscribe(&StorePath::system()),
            store,
            moisture: INITIAL_MOISTURE,
            tick: 0,
            history: VecDeque::new(),
        }
    }

    /// Start from a given soil moisture instead of the default.
    #[must_use]
    pub fn with_moisture(mut self, moisture: f64) -> Self {
        self.moisture = moisture.clamp(0.0, 100.0);
        self
    }

    fn next_reading(&mut self) -> SensorReading {
        let pump_on = self
            .actuators
            .decode::<ActuatorState>()
            .is_some_and(|a| a.pump_on());
        let powered_off = self
            .system
            .decode::<SystemState>()
            .is_some_and(|s| s.powered_off());

        let delta = if pump_on && !powered_off {
            WATERING_RATE
        } else {
            -DRYING_RATE
        };
        self.moisture = (self.moisture + delta).clamp(0.0, 100.0);
        self.tick = self.tick.wrapping_add(1);

        let t = f64::from(self.tick);
        SensorReading {
            moisture: Some(round1(self.moisture)),
            temperature: Some(round1(22.0 + 2.0 * (t / 10.0).sin())),
            humidity: Some(round1(55.0 + 5.0 * (t / 7.0).cos())),
            light: Some(LightLevel::from((self.tick / 30) % 2 == 0)),
        }
    }

    /// Publish one reading and its history point.
    ///
    /// # Errors
    ///
    /// Returns the store error if any of the writes fails.
    pub async fn tick(&mut self) -> Result<SensorReading, PlantError> {
        let reading = self.next_reading();
        self.store
            .set(&StorePath::sensors(), encode(&reading)?)
            .await?;

        let key = format!("-{:010}", self.tick);
        let point = HistoryPoint {
            time: clock_label(now()),
            value: reading.moisture.unwrap_or_default(),
        };
        let mut fields = Map::new();
        fields.insert(key.clone(), encode(&point)?);
        self.store
            .update(&StorePath::moisture_history(), fields)
            .await?;
        self.history.push_back(key);

        if self.history.len() > HISTORY_LIMIT {
            let mut expired = Map::new();
            while self.history.len() > HISTORY_LIMIT {
                if let Some(oldest) = self.history.pop_front() {
                    expired.insert(oldest, Value::Null);
                }
            }
            self.store
                .update(&StorePath::moisture_history(), expired)
                .await?;
        }

        Ok(reading)
    }

    /// Tick every `interval` until `shutdown` resolves.
    pub async fn run(mut self, interval: Duration, shutdown: impl Future<Output = ()>) {
        tracing::info!(interval_secs = interval.as_secs(), "simulated device started");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut shutdown = std::pin::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => match self.tick().await {
                    Ok(reading) => tracing::debug!(moisture = ?reading.moisture, "simulated reading published"),
                    Err(err) => tracing::warn!(error = %err, "simulated reading failed"),
                },
            }
        }

        tracing::info!("simulated device stopped");
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Value, PlantError> {
    serde_json::to_value(value).map_err(|err| PlantError::Store(Box::new(err)))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
