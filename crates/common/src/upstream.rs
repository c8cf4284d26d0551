//! JSON client for the external backend API.
//!
//! Appends path segments to a configured base URL and classifies failures into
//! [`CoreError`]: transport problems, undecodable bodies, and non-success
//! statuses carrying the backend's `{ "detail": ... }` payload.

use std::time::Duration;

use reqwest::{Client, Method, Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::types::UpstreamErrorBody;
use crate::CoreError;

#[derive(Clone, Debug)]
pub struct UpstreamClient {
    base: Url,
    http: Client,
}

impl UpstreamClient {
    pub fn new(base_url: &str, connect_timeout: Duration, request_timeout: Duration) -> Result<Self, CoreError> {
        let base = Url::parse(base_url).map_err(|e| CoreError::Parse(format!("base URL `{base_url}`: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(CoreError::Parse(format!("base URL `{base_url}` cannot carry a path")));
        }
        let http = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| CoreError::Network(e.to_string()))?;
        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Absolute URL for `segments` below the base path. Each segment is
    /// percent-encoded; a trailing `""` yields a trailing slash.
    pub fn url(&self, segments: &[&str]) -> Result<Url, CoreError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| CoreError::Parse(format!("base URL `{}` cannot carry a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET the resource at `path` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T, CoreError> {
        let resp = self.send(Method::GET, path, None::<&()>).await?;
        let resp = ensure_success(resp).await?;
        decode(resp).await
    }

    /// GET `path`; a 404 becomes `Ok(None)`.
    pub async fn get_json_opt<T: DeserializeOwned>(&self, path: &[&str]) -> Result<Option<T>, CoreError> {
        let resp = self.send(Method::GET, path, None::<&()>).await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = ensure_success(resp).await?;
        decode(resp).await.map(Some)
    }

    /// POST a JSON body to `path` and decode the JSON reply.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &[&str], body: &B) -> Result<T, CoreError> {
        let resp = self.send(Method::POST, path, Some(body)).await?;
        let resp = ensure_success(resp).await?;
        decode(resp).await
    }

    /// DELETE `path`, ignoring any reply body.
    pub async fn delete(&self, path: &[&str]) -> Result<(), CoreError> {
        let resp = self.send(Method::DELETE, path, None::<&()>).await?;
        ensure_success(resp).await?;
        Ok(())
    }

    async fn send<B: Serialize + ?Sized>(&self, method: Method, path: &[&str], body: Option<&B>) -> Result<Response, CoreError> {
        let url = self.url(path)?;
        debug!(%method, %url, "upstream request");
        let mut req = self.http.request(method, url);
        if let Some(body) = body {
            req = req.json(body);
        }
        req.send().await.map_err(|e| CoreError::Network(e.to_string()))
    }
}

async fn ensure_success(resp: Response) -> Result<Response, CoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<UpstreamErrorBody>(&text) {
        Ok(body) => body.messages(),
        Err(_) if text.trim().is_empty() => Vec::new(),
        Err(_) => vec![text],
    };
    Err(CoreError::Status { status: status.as_u16(), detail })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, CoreError> {
    let bytes = resp.bytes().await.map_err(|e| CoreError::Network(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| CoreError::Parse(e.to_string()))
}
