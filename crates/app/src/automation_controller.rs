//! Automation controller: keeps the pump in line with the moisture threshold.
//!
//! The controller watches `sensors`, `system` and `actuators`. Whenever any of
//! them changes it re-reads all three, and if the combined inputs differ from
//! the last evaluated ones it runs [`decide`] and dispatches the resulting
//! pump write. The write is echoed back through the `actuators` subscription,
//! after which the decision settles to idle.

use std::future::Future;

use plantwatch_domain::actuator::ActuatorState;
use plantwatch_domain::automation::{AutomationInputs, PumpCommand, decide};
use plantwatch_domain::control::Write;
use plantwatch_domain::path::StorePath;
use plantwatch_domain::sensor::SensorReading;
use plantwatch_domain::system::SystemState;

use crate::dispatcher::CommandDispatcher;
use crate::ports::RemoteStore;
use crate::subscription::ValueSubscription;

/// Evaluates the automation rule against live store data.
pub struct AutomationController<S> {
    sensors: ValueSubscription,
    system: ValueSubscription,
    actuators: ValueSubscription,
    dispatcher: CommandDispatcher<S>,
    last: Option<AutomationInputs>,
}

impl<S: RemoteStore + 'static> AutomationController<S> {
    /// Subscribe to the three observed nodes through `store` and send pump
    /// commands through `dispatcher`.
    pub fn new(store: &S, dispatcher: CommandDispatcher<S>) -> Self {
        Self {
            sensors: store.subscribe(&StorePath::sensors()),
            system: store.subscribe(&StorePath::system()),
            actuators: store.subscribe(&StorePath::actuators()),
            dispatcher,
            last: None,
        }
    }

    /// The inputs as currently observed.
    #[must_use]
    pub fn inputs(&self) -> AutomationInputs {
        AutomationInputs::observe(
            self.sensors.decode::<SensorReading>().as_ref(),
            self.system.decode::<SystemState>().as_ref(),
            self.actuators.decode::<ActuatorState>().as_ref(),
        )
    }

    /// Evaluate the rule once and dispatch the command, if any.
    ///
    /// Inputs identical to the previous evaluation are skipped, so repeated
    /// notifications for an unchanged state never issue a second write.
    pub async fn evaluate(&mut self) -> Option<PumpCommand> {
        let inputs = self.inputs();
        if self.last == Some(inputs) {
            return None;
        }
        self.last = Some(inputs);

        let command = decide(&inputs)?;
        tracing::info!(
            moisture = ?inputs.moisture,
            command = %command,
            "automation commanding pump"
        );
        self.dispatcher.apply(Write::from(command)).await;
        Some(command)
    }

    /// Evaluate now, then after every change, until `shutdown` resolves or
    /// the store stops delivering changes.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) {
        tracing::info!("automation controller started");
        let mut shutdown = std::pin::pin!(shutdown);
        self.evaluate().await;

        loop {
            let alive = tokio::select! {
                () = &mut shutdown => break,
                alive = self.sensors.changed() => alive,
                alive = self.system.changed() => alive,
                alive = self.actuators.changed() => alive,
            };
            if !alive {
                tracing::warn!("store subscription closed");
                break;
            }
            self.evaluate().await;
        }

        tracing::info!("automation controller stopped");
    }
}
