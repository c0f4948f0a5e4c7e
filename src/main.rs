//! Credence HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use credence::classifier::{BertFakeNewsModel, ClassifierConfig, LocalClassifierAdapter};
use credence::config::Config;
use credence::gateway::{HandlerState, create_router_with_state};
use credence::judge::JudgePool;
use credence::pipeline::DetectionService;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
 ██████╗██████╗ ███████╗██████╗ ███████╗███╗   ██╗ ██████╗███████╗
██╔════╝██╔══██╗██╔════╝██╔══██╗██╔════╝████╗  ██║██╔════╝██╔════╝
██║     ██████╔╝█████╗  ██║  ██║█████╗  ██╔██╗ ██║██║     █████╗
██║     ██╔══██╗██╔══╝  ██║  ██║██╔══╝  ██║╚██╗██║██║     ██╔══╝
╚██████╗██║  ██║███████╗██████╔╝███████╗██║ ╚████║╚██████╗███████╗
 ╚═════╝╚═╝  ╚═╝╚══════╝╚═════╝ ╚══════╝╚═╝  ╚═══╝ ╚═════╝╚══════╝

        ASK. WEIGH. DECIDE.
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
        judges = config.judges.len(),
        "Credence starting"
    );

    let local = load_local_classifier(&config).await;

    let judges = match JudgePool::from_config(&config) {
        Ok(pool) => Some(pool),
        Err(e) => {
            tracing::warn!(error = %e, "Judge verification disabled");
            None
        }
    };

    let service = match DetectionService::new(local, judges, config.weights) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!(error = %e, "Cannot serve detections");
            return Err(e.into());
        }
    };

    let state = HandlerState::new(service, config.admin_token.clone());
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Credence shutdown complete");
    Ok(())
}

async fn load_local_classifier(config: &Config) -> LocalClassifierAdapter {
    let Some(path) = config.model_path.clone() else {
        tracing::warn!("No CREDENCE_MODEL_PATH configured, local classifier disabled");
        return LocalClassifierAdapter::unavailable("no model path configured");
    };

    let loaded = tokio::task::spawn_blocking(move || {
        BertFakeNewsModel::load(&ClassifierConfig::new(path))
    })
    .await;

    match loaded {
        Ok(Ok(model)) => LocalClassifierAdapter::new(Arc::new(model)),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Local classifier failed to load, continuing without it");
            LocalClassifierAdapter::unavailable(e.to_string())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Local classifier load task failed");
            LocalClassifierAdapter::unavailable(e.to_string())
        }
    }
}

fn run_health_check() -> i32 {
    let port = std::env::var("CREDENCE_PORT")
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
