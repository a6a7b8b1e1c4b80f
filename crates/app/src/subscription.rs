//! Live value subscription.
//!
//! Every subscribed path is backed by a `tokio::sync::watch` channel: the
//! store adapter keeps the sender and updates it as changes arrive, consumers
//! hold the receiving side. Dropping every clone of a [`ValueSubscription`]
//! closes the channel, which is how adapters notice an unsubscribe.

use plantwatch_domain::path::StorePath;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;

/// The latest value at a store path, plus change notification.
#[derive(Debug, Clone)]
pub struct ValueSubscription {
    path: StorePath,
    rx: watch::Receiver<Option<Value>>,
}

impl ValueSubscription {
    /// Create a subscription starting out absent, along with the sender the
    /// store adapter drives.
    #[must_use]
    pub fn channel(path: StorePath) -> (watch::Sender<Option<Value>>, Self) {
        Self::with_initial(path, None)
    }

    /// Create a subscription that already holds `initial`.
    #[must_use]
    pub fn with_initial(
        path: StorePath,
        initial: Option<Value>,
    ) -> (watch::Sender<Option<Value>>, Self) {
        let (tx, rx) = watch::channel(initial);
        (tx, Self { path, rx })
    }

    #[must_use]
    pub fn path(&self) -> &StorePath {
        &self.path
    }

    /// Clone of the latest raw value. `None` while the node is absent.
    #[must_use]
    pub fn latest(&self) -> Option<Value> {
        self.rx.borrow().clone()
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.rx.borrow().is_none()
    }

    /// Decode the latest value. An absent node, or one that does not match
    /// `T`, yields `None`; decode failures are logged.
    #[must_use]
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        let current = self.rx.borrow();
        let value = current.as_ref()?;
        match T::deserialize(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!(path = %self.path, error = %err, "ignoring malformed node");
                None
            }
        }
    }

    /// Wait for the next change. Returns `false` once the store side is gone
    /// and no further changes can arrive.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// A fresh receiver over the same channel, for stream adapters.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Option<Value>> {
        self.rx.clone()
    }

    /// Stop observing. Equivalent to dropping the subscription.
    pub fn unsubscribe(self) {
        tracing::trace!(path = %self.path, "unsubscribed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantwatch_domain::system::SystemState;
    use serde_json::json;

    #[test]
    fn should_start_absent() {
        let (_tx, sub) = ValueSubscription::channel(StorePath::system());
        assert!(sub.is_absent());
        assert_eq!(sub.latest(), None);
        assert_eq!(sub.decode::<SystemState>(), None);
    }

    #[test]
    fn should_decode_latest_value() {
        let (tx, sub) = ValueSubscription::channel(StorePath::system());
        tx.send_replace(Some(json!({"enabled": true})));
        let state: SystemState = sub.decode().unwrap();
        assert_eq!(state.enabled, Some(true));
    }

    #[test]
    fn should_yield_none_when_value_malformed() {
        let (tx, sub) = ValueSubscription::channel(StorePath::system());
        tx.send_replace(Some(json!("not an object")));
        assert_eq!(sub.decode::<SystemState>(), None);
        assert!(!sub.is_absent());
    }

    #[tokio::test]
    async fn should_notify_change() {
        let (tx, mut sub) = ValueSubscription::channel(StorePath::sensors());
        tx.send_replace(Some(json!({"moisture": 40})));
        assert!(sub.changed().await);
        assert_eq!(sub.latest(), Some(json!({"moisture": 40})));
    }

    #[tokio::test]
    async fn should_report_closed_when_sender_dropped() {
        let (tx, mut sub) = ValueSubscription::channel(StorePath::sensors());
        drop(tx);
        assert!(!sub.changed().await);
    }

    #[test]
    fn should_close_sender_when_unsubscribed() {
        let (tx, sub) = ValueSubscription::channel(StorePath::sensors());
        let clone = sub.clone();
        sub.unsubscribe();
        assert!(!tx.is_closed());
        drop(clone);
        assert!(tx.is_closed());
    }
}
