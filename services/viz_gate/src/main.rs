use tokio::net::TcpListener;
use tracing::{info, Level};
use viz_gate::{AppState, GateConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()),
        )
        .with_target(false)
        .compact()
        .init();

    let config = GateConfig::from_env();
    let bind_addr = config.bind_addr;
    info!(grid = ?config.grid, map = %config.grid_map, "starting viz_gate");
    let app = viz_gate::app(AppState::from_config(config)?);
    let listener = TcpListener::bind(bind_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
