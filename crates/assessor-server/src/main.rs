//! Assessor HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use assessor::config::Config;
use assessor::{Assessor, CriterionCatalog, EntailmentBackend, NliModel};
use assessor_server::gateway::{GatewayOptions, HandlerState, create_router_with_state};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
 █████╗ ███████╗███████╗███████╗███████╗███████╗ ██████╗ ██████╗
██╔══██╗██╔════╝██╔════╝██╔════╝██╔════╝██╔════╝██╔═══██╗██╔══██╗
███████║███████╗███████╗█████╗  ███████╗███████╗██║   ██║██████╔╝
██╔══██║╚════██║╚════██║██╔══╝  ╚════██║╚════██║██║   ██║██╔══██╗
██║  ██║███████║███████║███████╗███████║███████║╚██████╔╝██║  ██║
╚═╝  ╚═╝╚══════╝╚══════╝╚══════╝╚══════╝╚══════╝ ╚═════╝ ╚═╝  ╚═╝

        READ. WEIGH. RATE.
                                        AGPL-3.0
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        failure_policy = %config.policy.failure_policy,
        "Assessor starting"
    );

    let (model, assessor) = build_assessor(&config)?;
    let state = HandlerState::new(assessor, config.max_concurrent_assessments);
    let app = create_router_with_state(state, GatewayOptions::from(&config));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!(
        outstanding_refs = Arc::strong_count(&model) - 1,
        "Releasing NLI model handle"
    );
    drop(model);

    tracing::info!("Assessor shutdown complete");
    Ok(())
}

/// Loads the catalog and the model, returning the model handle alongside the assessor so it can
/// be released explicitly after shutdown.
fn build_assessor(config: &Config) -> anyhow::Result<(Arc<NliModel>, Arc<Assessor>)> {
    let catalog = match &config.catalog_path {
        Some(path) => CriterionCatalog::from_path(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => CriterionCatalog::o1a()?,
    };

    if config.nli.model_path.is_none() {
        tracing::warn!("No ASSESSOR_NLI_MODEL_PATH configured, running entailment in stub mode");
    }
    let model = Arc::new(NliModel::load(config.nli.clone()).context("loading NLI model")?);
    let backend: Arc<dyn EntailmentBackend> = model.clone();

    tracing::info!(
        mode = backend.mode().as_str(),
        device = %config.nli.device,
        hypotheses = catalog.hypothesis_count(),
        "Entailment backend ready"
    );

    let assessor = Assessor::new(Arc::new(catalog), backend, config.policy)?;
    Ok((model, Arc::new(assessor)))
}

fn run_health_check() -> i32 {
    let port = std::env::var("ASSESSOR_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
