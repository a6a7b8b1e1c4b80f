//! REST client for the realtime database.

use std::time::Duration;

use plantwatch_domain::path::StorePath;
use reqwest::header::ACCEPT;
use serde::Serialize;
use url::Url;

use crate::config::FirebaseConfig;
use crate::error::FirebaseError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper around `reqwest` that knows how database URLs are built.
pub(crate) struct FirebaseClient {
    http: reqwest::Client,
    base_url: Url,
    root: StorePath,
    auth: Option<String>,
}

impl FirebaseClient {
    pub(crate) fn new(config: &FirebaseConfig) -> Result<Self, FirebaseError> {
        let base_url = Url::parse(&config.database_url).map_err(FirebaseError::InvalidUrl)?;
        if base_url.cannot_be_a_base() {
            return Err(FirebaseError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        let root = StorePath::parse(&config.root).map_err(FirebaseError::InvalidRoot)?;

        // No overall timeout: subscriptions hold their response open.
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url,
            root,
            auth: config.auth.clone().filter(|token| !token.is_empty()),
        })
    }

    /// `{base}/{root}/{path}.json?auth=...`
    pub(crate) fn url(&self, path: &StorePath) -> Result<Url, FirebaseError> {
        let full = self.root.join(path);
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                FirebaseError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase)
            })?;
            segments.pop_if_empty();
            match full.segments().split_last() {
                None => {
                    segments.push(".json");
                }
                Some((last, parents)) => {
                    segments.extend(parents);
                    segments.push(&format!("{last}.json"));
                }
            }
        }
        if let Some(auth) = &self.auth {
            url.query_pairs_mut().append_pair("auth", auth);
        }
        Ok(url)
    }

    /// Merge `fields` into the node at `path`.
    pub(crate) async fn patch<T: Serialize + ?Sized>(
        &self,
        path: &StorePath,
        fields: &T,
    ) -> Result<(), FirebaseError> {
        let url = self.url(path)?;
        tracing::debug!(%path, "PATCH");
        let response = self.http.patch(url).json(fields).send().await?;
        check_status(response).await.map(drop)
    }

    /// Replace the node at `path`.
    pub(crate) async fn put<T: Serialize + ?Sized>(
        &self,
        path: &StorePath,
        value: &T,
    ) -> Result<(), FirebaseError> {
        let url = self.url(path)?;
        tracing::debug!(%path, "PUT");
        let response = self.http.put(url).json(value).send().await?;
        check_status(response).await.map(drop)
    }

    /// Open a streaming `GET` on `path`. The caller reads the body as
    /// server-sent events.
    pub(crate) async fn open_stream(
        &self,
        path: &StorePath,
    ) -> Result<reqwest::Response, FirebaseError> {
        let url = self.url(path)?;
        tracing::debug!(%path, "opening event stream");
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;
        check_status(response).await
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, FirebaseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(FirebaseError::Status {
        status: status.as_u16(),
        body,
    })
}
