use crate::{ClientError, Result};
use async_trait::async_trait;
use dune_core::{TransportConfig, BASE_URL};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Error raised by a transport, passed to callers untouched
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// An outgoing request, relative to the transport's base URL.
///
/// Method and path are fixed at construction; headers, query params and body
/// can still be edited by a pre-send hook.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    path: String,
    params: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub(crate) fn new(method: Method, path: String) -> Self {
        Self {
            method,
            path,
            params: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Vec<(String, String)> {
        &mut self.params
    }

    /// Per-call headers, sent on top of the transport defaults
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn set_body(&mut self, body: Option<Vec<u8>>) {
        self.body = body;
    }
}

/// A response as received from the wire
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Body decoded as UTF-8, lossily
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Transport sends requests to a base URL with a fixed set of default headers.
///
/// Swap in a different implementation to route calls through another HTTP
/// stack or to record requests in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    fn base_url(&self) -> &str;
    fn default_headers(&self) -> &HeaderMap;
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl ReqwestTransport {
    /// Build the HTTP client from merged settings. Performs no network I/O.
    pub fn new(config: &TransportConfig) -> Result<Self> {
        Self::from_builder(config, reqwest::Client::builder())
    }

    /// Apply `config` on top of a caller-prepared reqwest builder
    pub fn from_builder(config: &TransportConfig, builder: reqwest::ClientBuilder) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| BASE_URL.to_string());
        let headers = header_map(&config.headers)?;

        let mut builder = builder.default_headers(headers.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        if config.insecure_skip_verify.unwrap_or(false) {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            headers,
        })
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn default_headers(&self) -> &HeaderMap {
        &self.headers
    }

    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let url = self.url(request.path());
        tracing::trace!(method = %request.method(), %url, "sending request");

        let mut builder = self
            .client
            .request(request.method().clone(), &url)
            .headers(request.headers);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        tracing::trace!(status, %url, bytes = body.len(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub(crate) fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ClientError::InvalidHeader(name.to_string()))?;
    let header_value =
        HeaderValue::from_str(value).map_err(|_| ClientError::InvalidHeader(name.to_string()))?;
    Ok((header_name, header_value))
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let (name, value) = header_pair(name, value)?;
        map.insert(name, value);
    }
    Ok(map)
}
