//! Credlens HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use credlens::config::Config;
use credlens::gateway::{HandlerState, create_router_with_state};
use credlens::jobs::JobTracker;
use credlens::oracle::{AzureOracleClient, OracleClient};
use credlens::pipeline::Pipeline;
use credlens::storage::{AzureBlobStore, BlobStore};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// How often expired jobs are swept out of the tracker.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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
        deployment = %config.oracle_deployment,
        "Credlens starting"
    );

    let oracle = build_oracle(&config)?;
    let store: Arc<dyn BlobStore> = Arc::new(AzureBlobStore::from_config(&config));

    let tracker = Arc::new(JobTracker::new());
    let pipeline = Arc::new(Pipeline::new(
        tracker.clone(),
        oracle,
        store,
        config.upload_container.clone(),
        config.report_container.clone(),
    ));

    spawn_job_sweeper(tracker.clone(), config.job_max_age);

    let state = HandlerState::new(tracker, pipeline, config.max_upload_bytes as u64);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Credlens shutdown complete");
    Ok(())
}

fn build_oracle(config: &Config) -> anyhow::Result<Arc<dyn OracleClient>> {
    #[cfg(feature = "mock")]
    if std::env::var_os("CREDLENS_MOCK_ORACLE").is_some_and(|v| !v.is_empty()) {
        tracing::warn!("CREDLENS_MOCK_ORACLE set, serving canned oracle completions");
        return Ok(Arc::new(
            credlens::oracle::MockOracleClient::with_default_response(
                r#"{"overall_score": 50, "verdict": "QUESTIONABLE"}"#,
            ),
        ));
    }

    Ok(Arc::new(AzureOracleClient::from_config(config)?))
}

/// Periodically drops jobs older than `max_age` so the in-memory tracker
/// cannot grow without bound.
fn spawn_job_sweeper(tracker: Arc<JobTracker>, max_age: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = tracker.sweep(max_age);
            if removed > 0 {
                tracing::info!(removed, "Expired jobs swept");
            }
        }
    });
}

fn run_health_check() -> i32 {
    let port = std::env::var("CREDLENS_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/health", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
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
