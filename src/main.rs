//! pick-a-brain server entrypoint wiring configuration, storage and the REST API.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use pick_a_brain::{
    build_router,
    config::AppConfig,
    dao::quiz_store::sql::SqlQuizStore,
    state::{AppState, SharedState},
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    init_tracing();
    if let Err(err) = dotenv {
        if !err.not_found() {
            warn!(error = %err, "failed to load .env file");
        }
    }

    let config = AppConfig::load();
    let port = config.port;
    let app_state = AppState::new(config);
    connect_store(&app_state).await;

    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Connect once. On failure the server keeps running in degraded mode, where the data
/// endpoints answer 500.
async fn connect_store(state: &SharedState) {
    let Some(database) = state.config().database.clone() else {
        error!("no database configured (set DATABASE_URL or DB_HOST/DB_NAME); running degraded");
        return;
    };

    let store = match SqlQuizStore::connect(&database).await {
        Ok(store) => store,
        Err(err) => {
            error!(error = ?err, "error connecting to the database; running degraded");
            return;
        }
    };

    match store.ensure_leaderboard_table().await {
        Ok(()) => info!("leaderboard table created or already exists"),
        Err(err) => error!(error = ?err, "error creating leaderboard table"),
    }

    state.install_quiz_store(Arc::new(store)).await;
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
