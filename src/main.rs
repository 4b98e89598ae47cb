use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reel_finder::{
    api::{create_router, AppState},
    catalog::{MovieCatalog, TmdbCatalog},
    config::Config,
    services::ViewSettings,
    store::{InMemoryUserStore, RedisUserStore, UserStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reel_finder=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog: Arc<dyn MovieCatalog> = Arc::new(TmdbCatalog::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));

    let store: Arc<dyn UserStore> = match &config.redis_url {
        Some(redis_url) => Arc::new(
            RedisUserStore::connect(redis_url)
                .await
                .context("Failed to connect to Redis")?,
        ),
        None => {
            tracing::warn!("REDIS_URL not set, user records will not survive a restart");
            Arc::new(InMemoryUserStore::new())
        }
    };

    tracing::info!(
        catalog = catalog.name(),
        store = store.name(),
        "Clients initialized"
    );

    let state = AppState::new(catalog, store, ViewSettings::from(&config));
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server running");

    axum::serve(listener, app).await?;

    Ok(())
}
