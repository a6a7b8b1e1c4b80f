//! Per-subscription streaming task.

use std::sync::Arc;

use futures_util::StreamExt;
use plantwatch_domain::path::StorePath;
use plantwatch_domain::tree;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::FirebaseClient;
use crate::config::ReconnectConfig;
use crate::error::FirebaseError;
use crate::sse::{Change, SseDecoder, StreamEvent};

/// Follow `path` until every receiver of `tx` is gone.
pub(crate) fn spawn(
    client: Arc<FirebaseClient>,
    path: StorePath,
    tx: watch::Sender<Option<Value>>,
    reconnect: ReconnectConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        follow(&client, &path, &tx, &reconnect).await;
        tracing::debug!(%path, "subscription closed");
    })
}

async fn follow(
    client: &FirebaseClient,
    path: &StorePath,
    tx: &watch::Sender<Option<Value>>,
    reconnect: &ReconnectConfig,
) {
    let mut attempt: u32 = 0;

    loop {
        tokio::select! {
            biased;
            () = tx.closed() => return,
            result = read_stream(client, path, tx) => match result {
                Ok(true) => {
                    tracing::info!(%path, "event stream ended, reconnecting");
                    attempt = 0;
                }
                Ok(false) => {
                    tracing::info!(%path, "event stream ended before any event");
                }
                Err(err) => {
                    tracing::warn!(%path, error = %err, attempt, "event stream failed");
                }
            },
        }

        let delay = reconnect.backoff(attempt);
        tracing::debug!(%path, ?delay, attempt, "waiting before reconnect");
        tokio::select! {
            biased;
            () = tx.closed() => return,
            () = tokio::time::sleep(delay) => {}
        }
        attempt = attempt.saturating_add(1);
    }
}

/// Read one streaming response to its end. Returns whether any data event
/// was applied.
async fn read_stream(
    client: &FirebaseClient,
    path: &StorePath,
    tx: &watch::Sender<Option<Value>>,
) -> Result<bool, FirebaseError> {
    let response = client.open_stream(path).await?;
    tracing::info!(%path, "event stream connected");

    let mut body = response.bytes_stream();
    let mut decoder = SseDecoder::default();
    let mut mirror = Value::Null;
    let mut delivered = false;

    while let Some(chunk) = body.next().await {
        for frame in decoder.push(&chunk?) {
            match StreamEvent::parse(&frame)? {
                StreamEvent::Put(change) => {
                    apply_put(&mut mirror, change)?;
                    publish(tx, &mirror);
                    delivered = true;
                }
                StreamEvent::Patch(change) => {
                    apply_patch(&mut mirror, &change)?;
                    publish(tx, &mirror);
                    delivered = true;
                }
                StreamEvent::KeepAlive => tracing::trace!(%path, "keep-alive"),
                StreamEvent::Cancel(reason) => return Err(FirebaseError::Cancelled(reason)),
                StreamEvent::AuthRevoked => return Err(FirebaseError::AuthRevoked),
                StreamEvent::Other(event) => {
                    tracing::debug!(%path, event = %event, "ignoring unknown stream event");
                }
            }
        }
    }

    Ok(delivered)
}

fn event_path(raw: &str) -> Result<StorePath, FirebaseError> {
    StorePath::parse(raw).map_err(FirebaseError::EventPath)
}

fn apply_put(mirror: &mut Value, change: Change) -> Result<(), FirebaseError> {
    tree::set(mirror, &event_path(&change.path)?, change.data);
    Ok(())
}

fn apply_patch(mirror: &mut Value, change: &Change) -> Result<(), FirebaseError> {
    let at = event_path(&change.path)?;
    match &change.data {
        Value::Object(fields) => tree::merge(mirror, &at, fields).map_err(FirebaseError::EventPath),
        Value::Null => Ok(()),
        other => {
            tree::set(mirror, &at, other.clone());
            Ok(())
        }
    }
}

fn publish(tx: &watch::Sender<Option<Value>>, mirror: &Value) {
    let current = tree::get(mirror, &StorePath::root()).cloned();
    tx.send_if_modified(|slot| {
        if *slot == current {
            false
        } else {
            *slot = current;
            true
        }
    });
}
