//! Dashboard use-case: the current plant snapshot and its change feed.

use plantwatch_domain::dashboard::{DashboardView, PlantSnapshot};
use plantwatch_domain::history::{self, CHART_WINDOW};
use plantwatch_domain::path::StorePath;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};

use crate::ports::RemoteStore;
use crate::subscription::ValueSubscription;

/// Holds the four subscriptions the dashboard renders from.
#[derive(Debug, Clone)]
pub struct DashboardService {
    sensors: ValueSubscription,
    actuators: ValueSubscription,
    system: ValueSubscription,
    history: ValueSubscription,
}

impl DashboardService {
    /// Subscribe to `sensors`, `actuators`, `system` and `history/moisture`.
    pub fn new<S: RemoteStore>(store: &S) -> Self {
        Self {
            sensors: store.subscribe(&StorePath::sensors()),
            actuators: store.subscribe(&StorePath::actuators()),
            system: store.subscribe(&StorePath::system()),
            history: store.subscribe(&StorePath::moisture_history()),
        }
    }

    /// Decode the latest value of every node.
    #[must_use]
    pub fn snapshot(&self) -> PlantSnapshot {
        PlantSnapshot {
            sensors: self.sensors.decode(),
            actuators: self.actuators.decode(),
            system: self.system.decode(),
            history: history::recent_window(self.history.latest().as_ref(), CHART_WINDOW),
        }
    }

    #[must_use]
    pub fn view(&self) -> DashboardView {
        self.snapshot().view()
    }

    /// Yields once per change to any of the four nodes. Changes that land
    /// close together may be coalesced into a single item.
    pub fn changes(&self) -> impl Stream<Item = ()> + Send + use<> {
        ticks(&self.sensors)
            .merge(ticks(&self.actuators))
            .merge(ticks(&self.system))
            .merge(ticks(&self.history))
    }
}

fn ticks(subscription: &ValueSubscription) -> impl Stream<Item = ()> + Send + use<> {
    WatchStream::from_changes(subscription.watch()).map(|_| ())
}
