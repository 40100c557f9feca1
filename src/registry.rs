//! Access to a remote API Registry.
//!
//! [`RegistryApi`] is the seam the rest of the crate talks to: one paged list
//! operation and one get operation per [`ResourceKind`]. [`HttpRegistryClient`]
//! implements it over the registry's JSON/HTTP surface.

use crate::config::{AuthConfig, FlameConfig};
use crate::error::{Error, Result};
use crate::names::ResourceKind;
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashSet, VecDeque};
use std::env;
use std::sync::Arc;
use std::time::Duration;

/// A product, version, spec or file record.
///
/// Only `name` is guaranteed; everything else the registry sends is kept in
/// `fields` so it can be rendered without loss. Timestamps are passed through
/// as the registry formats them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Resource {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// One page of a list response.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Resource>,
    pub next_page_token: Option<String>,
}

#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Fetch one page of the `kind` children of `parent`.
    async fn list_page(
        &self,
        kind: ResourceKind,
        parent: &str,
        page_token: Option<&str>,
    ) -> Result<Page>;

    /// Fetch a single resource by its full name.
    async fn get(&self, kind: ResourceKind, name: &str) -> Result<Resource>;
}

/// Lazy sequence over every child of a parent, fetched one page at a time.
///
/// `next` yields `Ok(Some(_))` per record and `Ok(None)` once the registry has
/// no more pages. After an error the pager yields nothing further. A page token
/// the registry already handed out is an error, since following it would
/// never end.
pub struct Pager {
    api: Arc<dyn RegistryApi>,
    kind: ResourceKind,
    parent: String,
    buffer: VecDeque<Resource>,
    next_token: Option<String>,
    seen_tokens: HashSet<String>,
    repeated: Option<String>,
    started: bool,
    finished: bool,
}

impl Pager {
    pub fn new(api: Arc<dyn RegistryApi>, kind: ResourceKind, parent: impl Into<String>) -> Self {
        Self {
            api,
            kind,
            parent: parent.into(),
            buffer: VecDeque::new(),
            next_token: None,
            seen_tokens: HashSet::new(),
            repeated: None,
            started: false,
            finished: false,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn parent(&self) -> &str {
        &self.parent
    }

    pub async fn next(&mut self) -> Result<Option<Resource>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            if let Some(token) = self.repeated.take() {
                self.finished = true;
                return Err(Error::RepeatedPageToken(token));
            }
            if self.finished || (self.started && self.next_token.is_none()) {
                return Ok(None);
            }
            let token = self.next_token.take();
            self.started = true;
            let page = match self
                .api
                .list_page(self.kind, &self.parent, token.as_deref())
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    self.finished = true;
                    return Err(e);
                }
            };
            tracing::debug!(
                kind = %self.kind,
                parent = %self.parent,
                items = page.items.len(),
                more = page.next_page_token.is_some(),
                "fetched page"
            );
            self.buffer.extend(page.items);
            // An empty token means the same as no token.
            self.next_token = page.next_page_token.filter(|t| !t.is_empty());
            if let Some(token) = &self.next_token {
                if !self.seen_tokens.insert(token.clone()) {
                    self.repeated = self.next_token.take();
                }
            }
        }
    }
}

/// JSON/HTTP client for the registry.
pub struct HttpRegistryClient {
    pub base_url: String,
    pub page_size: Option<u32>,
    client: Client,
}

impl HttpRegistryClient {
    pub fn new(cfg: &FlameConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(value) = auth_header(&cfg.auth)? {
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("flame/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .build()?;
        Ok(HttpRegistryClient {
            base_url: cfg.address.trim_end_matches('/').to_string(),
            page_size: cfg.page_size,
            client,
        })
    }

    pub fn collection_url(&self, kind: ResourceKind, parent: &str) -> Result<String> {
        Ok(format!(
            "{}/v1/{}/{}",
            self.base_url,
            url_path(parent)?,
            kind.collection()
        ))
    }

    pub fn resource_url(&self, name: &str) -> Result<String> {
        Ok(format!("{}/v1/{}", self.base_url, url_path(name)?))
    }

    async fn fetch(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(remote_error(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl RegistryApi for HttpRegistryClient {
    async fn list_page(
        &self,
        kind: ResourceKind,
        parent: &str,
        page_token: Option<&str>,
    ) -> Result<Page> {
        let url = self.collection_url(kind, parent)?;
        tracing::debug!("GET {} (pageToken={:?})", url, page_token);

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(size) = self.page_size {
            query.push(("pageSize", size.to_string()));
        }
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }
        let body = self.fetch(self.client.get(&url).query(&query)).await?;

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ApiPage {
            #[serde(default)]
            next_page_token: Option<String>,
            #[serde(flatten)]
            rest: Map<String, Value>,
        }

        let api_page: ApiPage = serde_json::from_value(body)?;
        let items = match api_page.rest.get(kind.collection()) {
            Some(list) => serde_json::from_value(list.clone())?,
            None => Vec::new(),
        };
        Ok(Page {
            items,
            next_page_token: api_page.next_page_token,
        })
    }

    async fn get(&self, kind: ResourceKind, name: &str) -> Result<Resource> {
        let url = self.resource_url(name)?;
        tracing::debug!(%kind, "GET {}", url);
        let body = self.fetch(self.client.get(&url)).await?;
        Ok(serde_json::from_value(body)?)
    }
}

/// URL parsing collapses `.` and `..` path segments, which would send the
/// request to a different resource than the one named.
fn url_path(path: &str) -> Result<&str> {
    if path.split('/').any(|part| part == "." || part == "..") {
        return Err(Error::UnaddressableName(path.to_string()));
    }
    Ok(path)
}

fn auth_header(auth: &AuthConfig) -> Result<Option<HeaderValue>> {
    let value = match auth {
        AuthConfig::None => return Ok(None),
        AuthConfig::Basic {
            username,
            password_env,
        } => {
            let pw = read_secret(password_env)?;
            let token = base64::encode_config(format!("{}:{}", username, pw), base64::STANDARD);
            format!("Basic {}", token)
        }
        AuthConfig::Token { token_env } => read_secret(token_env)?,
        AuthConfig::Bearer { token_env } => format!("Bearer {}", read_secret(token_env)?),
    };
    HeaderValue::from_str(&value)
        .map(Some)
        .map_err(|e| Error::Config(format!("invalid credential header: {e}")))
}

fn read_secret(var: &str) -> Result<String> {
    env::var(var).map_err(|_| Error::Config(format!("environment variable {var} is not set")))
}

/// Turn a non-success response into an error carrying the server's message.
fn remote_error(status: StatusCode, body: &str) -> Error {
    #[derive(Deserialize)]
    struct Envelope {
        error: ApiError,
    }
    #[derive(Deserialize)]
    struct ApiError {
        message: String,
    }

    let message = serde_json::from_str::<Envelope>(body)
        .map(|e| e.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    tracing::debug!(%status, %message, "registry returned an error");
    Error::Remote {
        status: status.as_u16(),
        message,
    }
}
