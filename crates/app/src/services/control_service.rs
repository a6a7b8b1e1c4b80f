//! Control use-case: the power, mode and pump toggles behind the dashboard
//! buttons.
//!
//! Each toggle plans its writes from the last observed `system` and
//! `actuators` nodes, submits them without waiting, and returns the plan.

use plantwatch_domain::actuator::ActuatorState;
use plantwatch_domain::control::{self, Write};
use plantwatch_domain::error::ControlError;
use plantwatch_domain::path::StorePath;
use plantwatch_domain::system::SystemState;

use crate::dispatcher::CommandDispatcher;
use crate::ports::RemoteStore;
use crate::subscription::ValueSubscription;

/// Plans and submits user toggles.
pub struct ControlService<S> {
    system: ValueSubscription,
    actuators: ValueSubscription,
    dispatcher: CommandDispatcher<S>,
}

impl<S: RemoteStore + 'static> ControlService<S> {
    pub fn new(store: &S, dispatcher: CommandDispatcher<S>) -> Self {
        Self {
            system: store.subscribe(&StorePath::system()),
            actuators: store.subscribe(&StorePath::actuators()),
            dispatcher,
        }
    }

    fn system_state(&self) -> SystemState {
        self.system.decode().unwrap_or_default()
    }

    /// Flip the master switch. Never rejected.
    pub fn toggle_power(&self) -> Vec<Write> {
        let writes = control::toggle_power(&self.system_state());
        tracing::info!(writes = writes.len(), "power toggled");
        self.dispatcher.submit(writes.clone());
        writes
    }

    /// Switch between AUTO and MANUAL.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::SystemDisabled`] unless the system is powered on.
    pub fn toggle_mode(&self) -> Result<Vec<Write>, ControlError> {
        let writes = control::toggle_mode(&self.system_state())?;
        tracing::info!("mode toggled");
        self.dispatcher.submit(writes.clone());
        Ok(writes)
    }

    /// Start or stop the pump by hand.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::SystemDisabled`] while the system is powered off.
    pub fn toggle_pump(&self) -> Result<Vec<Write>, ControlError> {
        let actuators: ActuatorState = self.actuators.decode().unwrap_or_default();
        let writes = control::toggle_pump(&self.system_state(), &actuators)?;
        tracing::info!("pump toggled");
        self.dispatcher.submit(writes.clone());
        Ok(writes)
    }
}
