use maksijatsi::{
    build_router,
    config::AppConfig,
    event::EventBus,
    game::{InMemoryGameRepository, RandomDiceProvider},
    shared::AppState,
    user::InMemoryUserRepository,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maksijatsi=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Maksi-Jatsi game server");

    let config = AppConfig::from_env()?;
    info!(config = ?config, "Configuration loaded");

    let event_bus = EventBus::new(config.event_capacity);
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState::new(
        Arc::new(InMemoryGameRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(RandomDiceProvider::new()),
        event_bus,
        config,
    );

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server running on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
