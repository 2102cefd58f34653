use fittrack::ids::RandomIds;
use fittrack::seed::{self, SeedData};
use fittrack::{resolve_data_path, router, AppState, EventBus, FileBackend, Repository, Store};
use std::{env, net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let data_dir = resolve_data_path();
    fs::create_dir_all(&data_dir).await?;
    info!(path = %data_dir.display(), "using data directory");

    let store = Arc::new(Store::new(FileBackend::new(data_dir), Arc::new(EventBus::new())));
    let repo = Repository::open(store, SeedData::bundled(), RandomIds)?;
    let state = AppState::new(repo, seed::wellness_goals(), seed::weekly_series());

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
    info!("shutting down");
}
