//! Dune Client Library
//!
//! HTTP client for the Dune query-execution API: submit a stored query,
//! poll its execution status, fetch results and cancel running executions.
//!
//! ```rust,no_run
//! use dune_rs::{Client, ClientConfig};
//!
//! # async fn run() -> dune_rs::Result<()> {
//! let client = Client::new(ClientConfig::new("my-api-key"))?;
//! let submitted = client.query(312527).await?;
//! let execution_id = submitted["execution_id"].as_str().unwrap_or_default();
//! let status = client.execution_status(execution_id).await?;
//! println!("{}", status["state"]);
//! # Ok(())
//! # }
//! ```

mod client;
mod logger;
mod transport;

pub use client::{Client, ClientConfig, RequestHook, RequestOptions};
pub use dune_core::{Config, ExecutionState, QueryParameters, TransportConfig, BASE_URL};
pub use logger::{Logger, NoopLogger, TracingLogger};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};

/// Crate version, also sent in the default `User-Agent`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// DuneError is produced when the API answers with a non-2xx status.
///
/// The full response is kept so callers can inspect the status, headers and
/// the error body the server sent back.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct DuneError {
    message: String,
    response: HttpResponse,
}

impl DuneError {
    pub(crate) fn from_response(response: HttpResponse) -> Self {
        Self {
            message: format!("Dune API replied with status {}", response.status),
            response,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn response(&self) -> &HttpResponse {
        &self.response
    }

    pub fn status(&self) -> u16 {
        self.response.status
    }

    pub fn into_response(self) -> HttpResponse {
        self.response
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] DuneError),

    #[error("HTTP request failed: {0}")]
    Transport(#[source] TransportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// The offending response, when the API rejected the request
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ClientError::Api(err) => Some(err.response()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
