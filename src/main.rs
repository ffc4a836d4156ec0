use pollution_dashboard::{AppState, Config, router};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let state = AppState::new(&config);

    // Warm the cache so the first page render does not pay for the read.
    let loaded = state.dataset.get().await;
    info!(
        rows = loaded.dataset.len(),
        path = %state.dataset.path().display(),
        "dataset ready"
    );

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
