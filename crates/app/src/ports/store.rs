//! Remote store port: live subscriptions and writes against the shared tree.

use std::future::Future;

use plantwatch_domain::error::PlantError;
use plantwatch_domain::path::StorePath;
use serde_json::{Map, Value};

use crate::subscription::ValueSubscription;

/// A hierarchical key/value store shared with the plant device.
///
/// Implementations push every change under a subscribed path to the returned
/// [`ValueSubscription`]. A write made through the same store is eventually
/// echoed back to its own subscribers.
pub trait RemoteStore: Send + Sync {
    /// Start observing `path`. The subscription holds the current value
    /// (`None` while the node is absent) and is updated until dropped.
    fn subscribe(&self, path: &StorePath) -> ValueSubscription;

    /// Merge `fields` into the node at `path`. Keys not named are left alone;
    /// a `null` value deletes its key.
    fn update(
        &self,
        path: &StorePath,
        fields: Map<String, Value>,
    ) -> impl Future<Output = Result<(), PlantError>> + Send;

    /// Replace the node at `path` with `value`.
    fn set(
        &self,
        path: &StorePath,
        value: Value,
    ) -> impl Future<Output = Result<(), PlantError>> + Send;
}

impl<T: RemoteStore> RemoteStore for std::sync::Arc<T> {
    fn subscribe(&self, path: &StorePath) -> ValueSubscription {
        (**self).subscribe(path)
    }

    fn update(
        &self,
        path: &StorePath,
        fields: Map<String, Value>,
    ) -> impl Future<Output = Result<(), PlantError>> + Send {
        (**self).update(path, fields)
    }

    fn set(
        &self,
        path: &StorePath,
        value: Value,
    ) -> impl Future<Output = Result<(), PlantError>> + Send {
        (**self).set(path, value)
    }
}
