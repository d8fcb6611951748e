use crate::logger::{Logger, NoopLogger};
use crate::transport::{header_pair, HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::{ClientError, DuneError, Result};
use dune_core::TransportConfig;
use reqwest::Method;
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;

/// Hook run on the outgoing request right before it is sent
pub type RequestHook = Box<dyn Fn(&mut HttpRequest) + Send + Sync>;

/// Construction parameters for [`Client`]
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    /// Merged over the defaults; values set here win
    pub transport: Option<TransportConfig>,
    /// Defaults to [`NoopLogger`]
    pub logger: Option<Arc<dyn Logger>>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            transport: None,
            logger: None,
        }
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }
}

impl From<dune_core::Config> for ClientConfig {
    fn from(config: dune_core::Config) -> Self {
        Self::new(config.api_key).with_transport(config.transport)
    }
}

/// Per-call extras: body, query params, headers and a pre-send hook
#[derive(Default)]
pub struct RequestOptions {
    body: Option<Vec<u8>>,
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    hook: Option<RequestHook>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw body, sent verbatim
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body
    pub fn json_body<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(value)?);
        Ok(self)
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn hook(mut self, hook: impl Fn(&mut HttpRequest) + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    fn into_request(self, method: Method, path: String) -> Result<HttpRequest> {
        let mut request = HttpRequest::new(method, path);
        for (name, value) in &self.headers {
            let (name, value) = header_pair(name, value)?;
            request.headers_mut().insert(name, value);
        }
        *request.params_mut() = self.params;
        request.set_body(self.body);

        if let Some(hook) = self.hook {
            hook(&mut request);
        }
        Ok(request)
    }
}

/// Dune API client.
///
/// Every operation sends exactly one request and returns the decoded JSON
/// body unchanged. Non-2xx replies become [`ClientError::Api`]. The client
/// holds no per-call state and can be shared across tasks.
pub struct Client {
    api_key: String,
    transport: Arc<dyn Transport>,
    logger: Arc<dyn Logger>,
}

impl Client {
    /// Create a client backed by reqwest. No network I/O happens here.
    pub fn new(config: ClientConfig) -> Result<Self> {
        validate_api_key(&config.api_key)?;

        let settings = transport_settings(&config.api_key, config.transport);
        let transport = ReqwestTransport::new(&settings)?;

        Ok(Self {
            api_key: config.api_key,
            transport: Arc::new(transport),
            logger: config.logger.unwrap_or_else(|| Arc::new(NoopLogger)),
        })
    }

    /// Create a client around an already configured transport. The key is
    /// checked like in [`Client::new`] but is not added to the transport's
    /// headers; that is the transport's job.
    pub fn with_transport(
        api_key: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        validate_api_key(&api_key)?;

        Ok(Self {
            api_key,
            transport,
            logger: Arc::new(NoopLogger),
        })
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn set_transport(&mut self, transport: Arc<dyn Transport>) {
        self.transport = transport;
    }

    /// Start executing a stored query
    pub async fn query(&self, id: impl Display) -> Result<serde_json::Value> {
        self.query_with(id, RequestOptions::default()).await
    }

    pub async fn query_with(
        &self,
        id: impl Display,
        options: RequestOptions,
    ) -> Result<serde_json::Value> {
        self.logger.debug(&format!("dune client query with {id}"));
        self.call(Method::POST, format!("query/{id}/execute"), options)
            .await
    }

    /// Fetch the current state of an execution
    pub async fn execution_status(&self, id: impl Display) -> Result<serde_json::Value> {
        self.execution_status_with(id, RequestOptions::default())
            .await
    }

    pub async fn execution_status_with(
        &self,
        id: impl Display,
        options: RequestOptions,
    ) -> Result<serde_json::Value> {
        self.logger
            .debug(&format!("dune client execution_status with {id}"));
        self.call(Method::GET, format!("execution/{id}/status"), options)
            .await
    }

    /// Fetch the result set of an execution
    pub async fn execution(&self, id: impl Display) -> Result<serde_json::Value> {
        self.execution_with(id, RequestOptions::default()).await
    }

    pub async fn execution_with(
        &self,
        id: impl Display,
        options: RequestOptions,
    ) -> Result<serde_json::Value> {
        self.logger.debug(&format!("dune client execution with {id}"));
        self.call(Method::GET, format!("execution/{id}/results"), options)
            .await
    }

    /// Ask the server to cancel a running execution
    pub async fn cancel(&self, id: impl Display) -> Result<serde_json::Value> {
        self.cancel_with(id, RequestOptions::default()).await
    }

    pub async fn cancel_with(
        &self,
        id: impl Display,
        options: RequestOptions,
    ) -> Result<serde_json::Value> {
        self.logger.debug(&format!("dune client cancel with {id}"));
        self.call(Method::POST, format!("execution/{id}/cancel"), options)
            .await
    }

    async fn call(
        &self,
        method: Method,
        path: String,
        options: RequestOptions,
    ) -> Result<serde_json::Value> {
        let request = options.into_request(method, path)?;
        let response = self
            .transport
            .send(request)
            .await
            .map_err(ClientError::Transport)?;
        self.parse(response)
    }

    fn parse(&self, response: HttpResponse) -> Result<serde_json::Value> {
        if response.is_success() {
            return Ok(serde_json::from_slice(&response.body)?);
        }

        let error = DuneError::from_response(response);
        self.logger.error(error.message());
        Err(error.into())
    }
}

fn validate_api_key(api_key: &str) -> Result<()> {
    if api_key.is_empty() {
        return Err(ClientError::InvalidConfig(
            "API key must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Default transport settings for `api_key` with caller overrides on top
pub(crate) fn transport_settings(
    api_key: &str,
    overrides: Option<TransportConfig>,
) -> TransportConfig {
    let defaults = TransportConfig::defaults(api_key)
        .with_header("User-Agent", format!("dune-rs/{}", crate::VERSION));
    match overrides {
        Some(overrides) => defaults.merge(overrides),
        None => defaults,
    }
}
