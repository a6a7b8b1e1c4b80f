//! Firebase adapter configuration.

use std::time::Duration;

use serde::Deserialize;

/// Connection settings for a Firebase Realtime Database.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    /// Database base URL, e.g. `https://my-plant-default-rtdb.firebaseio.com`.
    pub database_url: String,
    /// Database secret or ID token sent as the `auth` query parameter.
    pub auth: Option<String>,
    /// Path prefix every store path is resolved under. Empty for the
    /// database root.
    pub root: String,
    /// Backoff between stream reconnections.
    pub reconnect: ReconnectConfig,
}

impl FirebaseConfig {
    /// Config for `database_url` with no token, no root prefix and the
    /// default backoff.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }
}

/// Exponential backoff for stream reconnection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt.
    pub initial_delay_ms: u64,
    /// Upper bound on the delay.
    pub max_delay_ms: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1_000,
            max_delay_ms: 30_000,
        }
    }
}

impl ReconnectConfig {
    /// `min(initial * 2^attempt, max)`
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1_u64 << attempt.min(32);
        let delay = self.initial_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.max_delay_ms))
    }
}
