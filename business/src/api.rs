//! Authenticated calls to the dashboard backend.
//!
//! Commands never build requests themselves. They go through an
//! [`ApiTransport`] held in [`TransportState`], so tests can swap the network
//! for a recording mock. The bearer token is always passed in by the caller.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dashboard_states::State;

use crate::http::{Client, HttpResult, Method, Response};

/// A fully resolved outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    /// JSON body, `None` for body-less requests.
    pub body: Option<Vec<u8>>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            bearer: None,
        }
    }

    pub fn with_json_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_bearer(mut self, token: Option<&str>) -> Self {
        self.bearer = token.map(str::to_owned);
        self
    }
}

#[async_trait]
pub trait ApiTransport: Send + Sync + Debug {
    async fn send(&self, request: ApiRequest) -> HttpResult<Response>;
}

/// Sends requests over the network with reqwest.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTransport;

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> HttpResult<Response> {
        let mut builder = Client::request(request.method, request.url);
        if let Some(token) = request.bearer.as_deref() {
            builder = builder.bearer(token);
        }
        if let Some(body) = request.body {
            builder = builder
                .header("Content-Type", "application/json")
                .body(body);
        }
        builder.send().await
    }
}

/// The transport shared by every command of one dashboard.
#[derive(Debug, Clone)]
pub struct TransportState(pub Arc<dyn ApiTransport>);

impl TransportState {
    pub fn new(transport: impl ApiTransport + 'static) -> Self {
        Self(Arc::new(transport))
    }

    pub fn transport(&self) -> Arc<dyn ApiTransport> {
        Arc::clone(&self.0)
    }
}

impl Default for TransportState {
    fn default() -> Self {
        Self::new(HttpTransport)
    }
}

impl State for TransportState {
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}
