//! Transport layer
//!
//! Every pipeline operation is one request against the pipelines resource.
//! Requests carry their own header list, built fresh per call; nothing is
//! shared between calls except the HTTP client handle.
//!
//! The trait exists so the client can be exercised without a network.

use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;

use crate::config::PIPELINES_RESOURCE;
use crate::error::Result;

/// A single request against the pipelines resource
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn json_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self.header("Content-type", "application/json")
    }

    /// Value of the first header called `name`
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status code and full body text
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

/// Sends requests to the pipelines resource
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and reads the whole response body
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// reqwest implementation of [`Transport`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Base URL of the service (e.g., "https://example.com")
    base_url: String,
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the given per-request timeout
    ///
    /// Idle connections are not pooled, so each request's connection is
    /// closed once its body has been read.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self::with_client(base_url, client))
    }

    /// Creates a transport with a custom HTTP client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resource_url(&self) -> String {
        format!("{}{}", self.base_url, PIPELINES_RESOURCE)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.resource_url();
        tracing::debug!("{} {}", request.method, url);

        let mut builder = self.client.request(request.method, &url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!("Response status {} ({} bytes)", status, body.len());

        Ok(ApiResponse { status, body })
    }
}
