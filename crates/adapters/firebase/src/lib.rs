//! # plantwatch-adapter-firebase
//!
//! `RemoteStore` implementation over the Firebase Realtime Database REST API.
//!
//! ## Wire protocol
//!
//! | Operation | Request |
//! |-----------|---------|
//! | merge (`update`) | `PATCH {database_url}/{root}/{path}.json` |
//! | replace (`set`) | `PUT {database_url}/{root}/{path}.json` |
//! | subscribe | `GET {database_url}/{root}/{path}.json` with `Accept: text/event-stream` |
//!
//! The access token, when configured, is passed as the `auth` query parameter.
//!
//! Each subscription runs its own streaming request on a background task.
//! `put` and `patch` events are applied to a local mirror of the subscribed
//! node, and the mirror is published to the subscription. When the stream
//! drops, is cancelled or has its auth revoked, the task reconnects with
//! exponential backoff. It stops once the subscription is dropped.
//!
//! ## Dependency rule
//!
//! Depends on `plantwatch-app` (port traits) and `plantwatch-domain` only.

mod client;
mod config;
mod error;
mod sse;
mod stream;

use std::sync::Arc;

use plantwatch_app::ports::RemoteStore;
use plantwatch_app::subscription::ValueSubscription;
use plantwatch_domain::error::PlantError;
use plantwatch_domain::path::StorePath;
use serde_json::{Map, Value};

pub use config::{FirebaseConfig, ReconnectConfig};
pub use error::FirebaseError;

use client::FirebaseClient;

/// [`RemoteStore`] backed by a Firebase Realtime Database.
#[derive(Clone)]
pub struct FirebaseStore {
    client: Arc<FirebaseClient>,
    reconnect: ReconnectConfig,
}

impl FirebaseStore {
    /// Build a store from `config`. No request is made until the first
    /// subscription or write.
    ///
    /// # Errors
    ///
    /// Returns [`FirebaseError`] if the database URL or root path is invalid
    /// or the HTTP client cannot be built.
    pub fn new(config: &FirebaseConfig) -> Result<Self, FirebaseError> {
        Ok(Self {
            client: Arc::new(FirebaseClient::new(config)?),
            reconnect: config.reconnect.clone(),
        })
    }
}

impl RemoteStore for FirebaseStore {
    fn subscribe(&self, path: &StorePath) -> ValueSubscription {
        let (tx, subscription) = ValueSubscription::channel(path.clone());
        stream::spawn(
            Arc::clone(&self.client),
            path.clone(),
            tx,
            self.reconnect.clone(),
        );
        subscription
    }

    async fn update(&self, path: &StorePath, fields: Map<String, Value>) -> Result<(), PlantError> {
        self.client
            .patch(path, &fields)
            .await
            .map_err(FirebaseError::into_domain)
    }

    async fn set(&self, path: &StorePath, value: Value) -> Result<(), PlantError> {
        self.client
            .put(path, &value)
            .await
            .map_err(FirebaseError::into_domain)
    }
}
