//! Moisture history: an externally appended series, read as a capped window.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of most-recent points the dashboard charts.
pub const CHART_WINDOW: usize = 20;

/// A single charted sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Label as written by the device (usually `HH:MM:SS`).
    pub time: String,
    pub value: f64,
}

/// Extract history points from the raw `history/moisture` node.
///
/// The node is either an object keyed by push ids, whose key order is
/// chronological, or an array. A sparse array arrives as an object with
/// integer keys; those sort numerically, ahead of any other key. Entries
/// that do not decode are skipped.
#[must_use]
pub fn points(node: Option<&Value>) -> Vec<HistoryPoint> {
    let entries: Vec<&Value> = match node {
        Some(Value::Object(map)) => {
            let mut keyed: Vec<(&String, &Value)> = map.iter().collect();
            keyed.sort_by(|a, b| key_order(a.0, b.0));
            keyed.into_iter().map(|(_, v)| v).collect()
        }
        Some(Value::Array(items)) => items.iter().collect(),
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| HistoryPoint::deserialize(entry).ok())
        .collect()
}

fn key_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// The last `limit` points, oldest first.
#[must_use]
pub fn recent_window(node: Option<&Value>, limit: usize) -> Vec<HistoryPoint> {
    let mut all = points(node);
    let skip = all.len().saturating_sub(limit);
    all.drain(..skip);
    all
}
