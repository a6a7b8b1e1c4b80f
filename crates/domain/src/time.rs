//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for snapshot receipt times and history labels.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Format a timestamp the way history points label it (`HH:MM:SS`).
#[must_use]
pub fn clock_label(ts: Timestamp) -> String {
    ts.format("%H:%M:%S").to_string()
}
