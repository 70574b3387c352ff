//! Spawns the gateway on an ephemeral port for black-box HTTP tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use assessor::{
    AssessmentPolicy, Assessor, CriterionCatalog, EntailmentBackend, MockEntailment, NliModel,
};
use assessor_server::gateway::{GatewayOptions, HandlerState, create_router_with_state};

const READY_TIMEOUT: Duration = Duration::from_secs(5);
const READY_POLL: Duration = Duration::from_millis(25);

/// Which entailment backend the spawned server uses.
pub enum TestBackend {
    /// Deterministic lexical stub (same as running without a model).
    Stub,
    Mock(MockEntailment),
}

impl TestBackend {
    fn build(self) -> anyhow::Result<Arc<dyn EntailmentBackend>> {
        Ok(match self {
            TestBackend::Stub => Arc::new(NliModel::stub()?),
            TestBackend::Mock(mock) => Arc::new(mock),
        })
    }
}

pub struct TestServerConfig {
    pub backend: TestBackend,
    pub policy: AssessmentPolicy,
    pub options: GatewayOptions,
    pub max_concurrent: usize,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            backend: TestBackend::Stub,
            policy: AssessmentPolicy::default(),
            options: GatewayOptions::default(),
            max_concurrent: 2,
        }
    }
}

/// A running gateway. Dropping it triggers graceful shutdown.
pub struct TestServer {
    pub addr: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

/// Starts a server with the built-in catalog and waits until `/healthz` answers.
///
/// No model files are needed: the backend is either the stub or a scripted mock.
pub async fn spawn_test_server(config: TestServerConfig) -> anyhow::Result<TestServer> {
    let catalog = Arc::new(CriterionCatalog::o1a()?);
    let assessor = Assessor::new(catalog, config.backend.build()?, config.policy)?;
    let app = create_router_with_state(
        HandlerState::new(Arc::new(assessor), config.max_concurrent),
        config.options,
    );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("binding ephemeral port")?;
    let addr = listener.local_addr()?;

    let (stop, stopped) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let shutdown = async {
            let _ = stopped.await;
        };
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
        {
            eprintln!("test server on {addr} exited: {e}");
        }
    });

    let server = TestServer {
        addr,
        stop: Some(stop),
    };
    wait_until_healthy(&server).await?;
    Ok(server)
}

async fn wait_until_healthy(server: &TestServer) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let health_url = format!("{}/healthz", server.url());
    let deadline = Instant::now() + READY_TIMEOUT;

    loop {
        if let Ok(response) = client.get(&health_url).send().await
            && response.status().is_success()
        {
            return Ok(());
        }
        if Instant::now() >= deadline {
            bail!("server on {} not healthy after {READY_TIMEOUT:?}", server.addr);
        }
        tokio::time::sleep(READY_POLL).await;
    }
}
