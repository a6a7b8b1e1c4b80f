//! In-process store used by the use-case tests.

use std::sync::{Arc, Mutex};

use plantwatch_domain::control::Write;
use plantwatch_domain::error::PlantError;
use plantwatch_domain::path::StorePath;
use plantwatch_domain::tree;
use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::ports::RemoteStore;
use crate::subscription::ValueSubscription;

#[derive(Default)]
struct Inner {
    tree: Value,
    watchers: Vec<(StorePath, watch::Sender<Option<Value>>)>,
    writes: Vec<Write>,
    fail_writes: bool,
}

/// Tree-backed store that records every write it accepts.
#[derive(Clone, Default)]
pub(crate) struct FakeStore {
    inner: Arc<Mutex<Inner>>,
}

impl FakeStore {
    pub(crate) fn with_tree(tree: Value) -> Self {
        let store = Self::default();
        store.inner.lock().unwrap().tree = tree;
        store
    }

    pub(crate) fn fail_writes(&self) {
        self.inner.lock().unwrap().fail_writes = true;
    }

    pub(crate) fn writes(&self) -> Vec<Write> {
        self.inner.lock().unwrap().writes.clone()
    }

    pub(crate) fn clear_writes(&self) {
        self.inner.lock().unwrap().writes.clear();
    }

    /// Change the tree as the device would, without recording a write.
    pub(crate) fn external_set(&self, path: &str, value: Value) {
        let path = StorePath::parse(path).unwrap();
        let mut inner = self.inner.lock().unwrap();
        tree::set(&mut inner.tree, &path, value);
        Self::notify(&inner);
    }

    pub(crate) fn get(&self, path: &str) -> Option<Value> {
        let path = StorePath::parse(path).unwrap();
        tree::get(&self.inner.lock().unwrap().tree, &path).cloned()
    }

    fn notify(inner: &Inner) {
        for (path, tx) in &inner.watchers {
            let current = tree::get(&inner.tree, path).cloned();
            tx.send_if_modified(|slot| {
                if *slot == current {
                    false
                } else {
                    *slot = current;
                    true
                }
            });
        }
    }

    fn record(&self, write: Write) -> Result<(), PlantError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            return Err(PlantError::Store("store unreachable".into()));
        }
        match &write {
            Write::Merge { path, fields } => tree::merge(&mut inner.tree, path, fields)?,
            Write::Replace { path, value } => tree::set(&mut inner.tree, path, value.clone()),
        }
        inner.writes.push(write);
        Self::notify(&inner);
        Ok(())
    }
}

impl RemoteStore for FakeStore {
    fn subscribe(&self, path: &StorePath) -> ValueSubscription {
        let mut inner = self.inner.lock().unwrap();
        let current = tree::get(&inner.tree, path).cloned();
        let (tx, sub) = ValueSubscription::with_initial(path.clone(), current);
        inner.watchers.push((path.clone(), tx));
        sub
    }

    async fn update(&self, path: &StorePath, fields: Map<String, Value>) -> Result<(), PlantError> {
        self.record(Write::Merge {
            path: path.clone(),
            fields,
        })
    }

    async fn set(&self, path: &StorePath, value: Value) -> Result<(), PlantError> {
        self.record(Write::Replace {
            path: path.clone(),
            value,
        })
    }
}
