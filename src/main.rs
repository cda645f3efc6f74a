use std::sync::Arc;

use rockfall::api::{self, AppState};
use rockfall::config::Config;
use rockfall::image::RandomImageHeuristics;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 1. Configuration; SMS problems only disable alerts
    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    // 2. Placeholder image analysis until a real analyzer exists
    let images = Arc::new(RandomImageHeuristics::new());
    let shared_state = Arc::new(AppState::new(config, images));

    // 3. Router (CORS included)
    let app = api::router(shared_state);

    tracing::info!("Rockfall API running on http://{}", bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
