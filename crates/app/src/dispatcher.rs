//! Command dispatcher: fire-and-forget writes against the remote store.
//!
//! Writes are never retried and never reported to the caller. A failed write
//! is logged at `warn` and the caller carries on; the next change observed
//! through a subscription is the only feedback.

use std::sync::Arc;

use plantwatch_domain::control::Write;
use plantwatch_domain::path::StorePath;
use serde_json::{Map, Value};
use tokio::task::JoinHandle;

use crate::ports::RemoteStore;

/// Sends writes to a [`RemoteStore`].
pub struct CommandDispatcher<S> {
    store: Arc<S>,
}

impl<S> Clone for CommandDispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RemoteStore + 'static> CommandDispatcher<S> {
    /// Create a new dispatcher backed by the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Merge `fields` into the node at `path`.
    pub async fn set_field(&self, path: &StorePath, fields: Map<String, Value>) {
        match self.store.update(path, fields).await {
            Ok(()) => tracing::debug!(%path, "merge applied"),
            Err(err) => tracing::warn!(%path, error = %err, "merge failed"),
        }
    }

    /// Replace the node at `path` with `value`.
    pub async fn set_value(&self, path: &StorePath, value: Value) {
        match self.store.set(path, value).await {
            Ok(()) => tracing::debug!(%path, "set applied"),
            Err(err) => tracing::warn!(%path, error = %err, "set failed"),
        }
    }

    /// Send a single planned write.
    pub async fn apply(&self, write: Write) {
        match write {
            Write::Merge { path, fields } => self.set_field(&path, fields).await,
            Write::Replace { path, value } => self.set_value(&path, value).await,
        }
    }

    /// Send `writes` in order on a background task and return immediately.
    ///
    /// The handle is only useful to tests; callers are expected to drop it.
    pub fn submit(&self, writes: Vec<Write>) -> JoinHandle<()> {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            for write in writes {
                dispatcher.apply(write).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeStore;
    use plantwatch_domain::system::OperationMode;
    use serde_json::json;

    fn dispatcher(store: &FakeStore) -> CommandDispatcher<FakeStore> {
        CommandDispatcher::new(Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn should_merge_without_touching_siblings() {
        let store = FakeStore::with_tree(json!({"system": {"enabled": true, "mode": "AUTO"}}));
        dispatcher(&store).apply(Write::mode(OperationMode::Manual)).await;
        assert_eq!(
            store.get("system"),
            Some(json!({"enabled": true, "mode": "MANUAL"}))
        );
    }

    #[tokio::test]
    async fn should_replace_leaf_value() {
        let store = FakeStore::with_tree(json!({"actuators": {"waterPump": false}}));
        dispatcher(&store)
            .set_value(&StorePath::water_pump(), json!(true))
            .await;
        assert_eq!(store.get("actuators/waterPump"), Some(json!(true)));
    }

    #[tokio::test]
    async fn should_swallow_write_failures() {
        let store = FakeStore::default();
        store.fail_writes();
        dispatcher(&store).apply(Write::pump(true)).await;
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn should_send_submitted_writes_in_order() {
        let store = FakeStore::default();
        let writes = vec![Write::enabled(false), Write::pump(false)];
        dispatcher(&store).submit(writes.clone()).await.unwrap();
        assert_eq!(store.writes(), writes);
        assert_eq!(store.get("system/enabled"), Some(json!(false)));
        assert_eq!(store.get("actuators/waterPump"), Some(json!(false)));
    }
}
