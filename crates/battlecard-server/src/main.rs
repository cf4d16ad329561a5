mod api;
mod middleware;

use std::sync::Arc;

use battlecard_dashboard::Dashboard;
use battlecard_gemini::GeminiClient;
use battlecard_store::FileStorage;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(battlecard_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        data_dir = %config.data_dir.display(),
        model = %config.gemini_model,
        "starting battlecard server"
    );

    let storage = Arc::new(FileStorage::open(config.data_dir.clone())?);
    let generator = Arc::new(GeminiClient::from_config(&config)?);
    let dashboard = Arc::new(Dashboard::new(storage, generator, config.brand.clone()));

    let startup = Arc::clone(&dashboard);
    tokio::spawn(async move {
        if let Some(report) = startup.run_startup_refresh().await {
            tracing::info!(
                refreshed = report.refreshed.len(),
                failed = report.failed.len(),
                skipped = report.skipped.len(),
                "startup refresh complete"
            );
        }
    });

    let app = build_app(AppState { dashboard });
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
