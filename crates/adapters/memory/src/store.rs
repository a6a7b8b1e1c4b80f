//! Mutex-guarded JSON tree with per-path watchers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use plantwatch_app::ports::RemoteStore;
use plantwatch_app::subscription::ValueSubscription;
use plantwatch_domain::error::{PathError, PlantError};
use plantwatch_domain::path::StorePath;
use plantwatch_domain::tree;
use serde_json::{Map, Value};
use tokio::sync::watch;

struct Watcher {
    path: StorePath,
    tx: watch::Sender<Option<Value>>,
}

#[derive(Default)]
struct Inner {
    tree: Value,
    watchers: Vec<Watcher>,
}

impl Inner {
    /// Push the new value to every live watcher whose path overlaps `changed`.
    fn notify(&mut self, changed: &StorePath) {
        self.watchers.retain(|w| !w.tx.is_closed());
        for watcher in &self.watchers {
            if !watcher.path.overlaps(changed) {
                continue;
            }
            let current = tree::get(&self.tree, &watcher.path).cloned();
            watcher.tx.send_if_modified(|slot| {
                if *slot == current {
                    false
                } else {
                    *slot = current;
                    true
                }
            });
        }
    }
}

/// In-process [`RemoteStore`].
///
/// Cheap to clone; all clones share the same tree.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `tree`.
    #[must_use]
    pub fn with_tree(tree: Value) -> Self {
        let store = Self::default();
        store.lock().tree = tree;
        store
    }

    /// Current value at `path`, without subscribing.
    #[must_use]
    pub fn snapshot(&self, path: &StorePath) -> Option<Value> {
        tree::get(&self.lock().tree, path).cloned()
    }

    /// Number of subscriptions still held by someone.
    #[must_use]
    pub fn watcher_count(&self) -> usize {
        let mut inner = self.lock();
        inner.watchers.retain(|w| !w.tx.is_closed());
        inner.watchers.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(
        &self,
        path: &StorePath,
        apply: impl FnOnce(&mut Value) -> Result<(), PathError>,
    ) -> Result<(), PlantError> {
        let mut inner = self.lock();
        apply(&mut inner.tree)?;
        inner.notify(path);
        Ok(())
    }
}

impl RemoteStore for MemoryStore {
    fn subscribe(&self, path: &StorePath) -> ValueSubscription {
        let mut inner = self.lock();
        let current = tree::get(&inner.tree, path).cloned();
        let (tx, subscription) = ValueSubscription::with_initial(path.clone(), current);
        inner.watchers.push(Watcher {
            path: path.clone(),
            tx,
        });
        tracing::debug!(%path, "subscribed");
        subscription
    }

    async fn update(&self, path: &StorePath, fields: Map<String, Value>) -> Result<(), PlantError> {
        self.write(path, |root| tree::merge(root, path, &fields))
    }

    async fn set(&self, path: &StorePath, value: Value) -> Result<(), PlantError> {
        self.write(path, |root| {
            tree::set(root, path, value);
            Ok(())
        })
    }
}
