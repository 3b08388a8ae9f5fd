use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use opsdeck_api::config::ServerConfig;
use opsdeck_api::router::build_app_router;
use opsdeck_api::state::AppState;

const DEFAULT_LOG_FILTER: &str = "opsdeck_api=debug,opsdeck_db=debug,tower_http=debug";

fn init_tracing(json_logs: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;
    init_tracing(config.json_logs);
    let addr = config.bind_addr()?;
    tracing::info!(
        %addr,
        db_max_connections = config.db_max_connections,
        cors_origins = ?config.cors_origins,
        "Configuration loaded",
    );

    let pool = opsdeck_db::create_pool(&config.database_url, config.db_max_connections).await?;
    opsdeck_db::health_check(&pool).await?;
    opsdeck_db::run_migrations(&pool).await?;
    tracing::info!("Database ready");

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Shut down cleanly");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl-C handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Ctrl-C received, draining connections"),
        () = terminate => tracing::info!("SIGTERM received, draining connections"),
    }
}
