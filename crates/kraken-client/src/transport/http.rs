use reqwest::header::{ACCEPT, AUTHORIZATION};

use super::*;
use crate::config::ClientConfig;

/// reqwest-backed transport that injects the Kraken headers.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    client_id: String,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            client_id: config.client_id.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Join the base URL and the request path. Each path segment is
    /// percent-encoded on its own.
    fn url(&self, request: &ApiRequest) -> Result<url::Url, TransportError> {
        let mut url = url::Url::parse(&self.base_url)?;
        let not_a_base =
            || TransportError::Other(format!("{} cannot be a base URL", self.base_url));
        url.path_segments_mut()
            .map_err(|_| not_a_base())?
            .pop_if_empty()
            .extend(request.path.trim_start_matches('/').split('/'));
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url(&request)?;
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };
        tracing::debug!(method = request.method.as_str(), %url, "Sending Kraken request");

        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, request.version.accept_header())
            .header("Client-ID", &self.client_id);
        if let Some(token) = &request.access_token {
            builder = builder.header(AUTHORIZATION, format!("OAuth {token}"));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Http(e)
            }
        })?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(ApiResponse { status, body })
    }
}
