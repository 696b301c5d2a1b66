use std::path::PathBuf;

use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use eta_server::cache::CachedProvider;
use eta_server::config::{Settings, SourceSettings};
use eta_server::provider::{DataSource, FeedClient, FixtureProvider};
use eta_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(2);
        }
    };

    let source = match &settings.source {
        SourceSettings::Fixture { dir } => {
            info!(dir = %dir.display(), "Serving transit data from fixtures");
            DataSource::Fixture(FixtureProvider::load(dir).expect("Failed to load fixtures"))
        }
        SourceSettings::Live { endpoint, .. } => {
            info!(%endpoint, "Serving transit data from live feed");
            let config = settings
                .source
                .feed_config()
                .expect("Live source has a feed config");
            DataSource::Live(FeedClient::new(config).expect("Failed to create feed client"))
        }
    };

    let provider = CachedProvider::new(source, &settings.cache);
    let state = AppState::new(provider, settings.estimator.clone());
    if let SourceSettings::Fixture { dir } = &settings.source {
        spawn_fixture_reloader(state.clone(), dir.clone());
    }
    let app = create_router(state, settings.request_timeout);

    let addr = settings.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    info!(%addr, "Bus arrival estimator listening");
    info!("  GET  /health                  - Health check");
    info!("  GET  /api/busLines            - Routes with stops and paths");
    info!("  GET  /api/busPosition/:route  - Vehicle positions on a route");
    info!("  GET  /api/busStop/:stop       - Arrival estimates for a stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("Shut down");
}

/// Reload fixtures from `dir` on every SIGHUP.
#[cfg(unix)]
fn spawn_fixture_reloader(state: AppState, dir: PathBuf) {
    let mut hangup = signal::unix::signal(signal::unix::SignalKind::hangup())
        .expect("Failed to install SIGHUP handler");
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            if let Err(e) = state.reload_fixtures(&dir).await {
                warn!(error = %e, "Fixture reload failed, keeping current data");
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_fixture_reloader(_state: AppState, _dir: PathBuf) {}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
