//! The seam between operations and the network.
//!
//! Operations build an [`ApiRequest`], hand it to a [`Transport`], and get
//! back the status and body. Nothing above this layer retries.

mod http;

use std::future::Future;

use serde_json::Value;

use crate::version::ApiVersion;

pub use http::HttpTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// One Kraken request, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub version: ApiVersion,
    pub access_token: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>, version: ApiVersion) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            version,
            access_token: None,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn bearer(mut self, access_token: &str) -> Self {
        self.access_token = Some(access_token.to_string());
        self
    }
}

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

/// Executes Kraken requests.
///
/// Implementations own connection handling, TLS and timeouts. They report
/// every response they receive, successful or not, as `Ok`.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send;
}
