//! Shared fixtures for the business integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dashboard_business::http::{HttpResult, Response};
use dashboard_business::{
    ApiRequest, ApiTransport, BusinessConfig, ByteSource, EnvIdentity, IdentityState,
    TransportState, build_state_ctx,
};
use dashboard_states::StateCtx;
use wiremock::MockServer;

pub const TOKEN: &str = "test_token";
pub const ACCOUNT: &str = "Ada Lovelace";

/// Answers every request with a fixed status and remembers what it was sent.
#[derive(Debug)]
pub struct MockTransport {
    status: AtomicU16,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn responding(status: u16) -> Arc<Self> {
        Arc::new(Self {
            status: AtomicU16::new(status),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn respond_with(&self, status: u16) {
        self.status.store(status, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }

    /// Body of the `index`th request parsed as JSON.
    pub fn json_body(&self, index: usize) -> serde_json::Value {
        let requests = self.requests();
        let body = requests[index].body.as_deref().expect("request has a body");
        serde_json::from_slice(body).expect("body is JSON")
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> HttpResult<Response> {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(request);
        Ok(Response::with_status(self.status.load(Ordering::SeqCst)))
    }
}

/// A byte source that takes `delay` to produce its bytes.
#[derive(Debug)]
pub struct SlowSource {
    pub delay: Duration,
    pub bytes: Vec<u8>,
}

#[async_trait]
impl ByteSource for SlowSource {
    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        tokio::time::sleep(self.delay).await;
        Ok(self.bytes.clone())
    }
}

pub fn signed_in_identity() -> Arc<EnvIdentity> {
    Arc::new(EnvIdentity::new(
        Some(ACCOUNT.to_owned()),
        Some(TOKEN.to_owned()),
    ))
}

/// A context whose requests go to `transport`.
pub fn mock_ctx(transport: Arc<MockTransport>) -> StateCtx {
    build_state_ctx(
        BusinessConfig::default(),
        IdentityState(signed_in_identity()),
        TransportState(transport),
    )
}

/// Applies pending updates and re-derives computes, like one frame would.
pub fn settle(ctx: &mut StateCtx) {
    ctx.sync_computes();
    ctx.run_computed();
    ctx.sync_computes();
}

/// Holds a context wired to a wiremock server over real HTTP.
pub struct TestContext {
    pub mock_server: MockServer,
    pub identity: Arc<EnvIdentity>,
    pub ctx: StateCtx,
}

impl TestContext {
    pub async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let identity = signed_in_identity();
        let ctx = build_state_ctx(
            BusinessConfig::new(mock_server.uri()),
            IdentityState(identity.clone()),
            TransportState::default(),
        );

        Self {
            mock_server,
            identity,
            ctx,
        }
    }

    /// Flushes the queue and waits for every spawned task to finish.
    pub async fn flush_and_wait(&mut self) {
        self.ctx.sync_computes();
        self.ctx.flush_commands();

        let timeout = Duration::from_secs(5);
        let start = std::time::Instant::now();

        while self.ctx.task_count() > 0 {
            assert!(
                start.elapsed() < timeout,
                "timed out waiting for {} pending tasks",
                self.ctx.task_count()
            );
            if self.ctx.task_set_mut().join_next().await.is_some() {
                self.ctx.sync_computes();
            }
        }

        settle(&mut self.ctx);
    }

    /// Syncs until `done` holds, for tasks that keep running afterwards.
    pub async fn sync_until(&mut self, done: impl Fn(&StateCtx) -> bool) {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        loop {
            settle(&mut self.ctx);
            if done(&self.ctx) {
                return;
            }
            assert!(
                std::time::Instant::now() < deadline,
                "condition not reached in time"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}
