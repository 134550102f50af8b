// Social feed server

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use social_feed::{app_state::AppState, config::Config, routes::create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("social_feed=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let app_state = AppState::new(config.clone())?;
    let app = create_router(app_state);

    let addr = config.server_address();
    info!("Social feed listening on http://{}", addr);
    info!("Data directory: {}", config.storage.data_dir.display());

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
