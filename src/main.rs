//! Organizer agent service binary

use anyhow::Context;
use organizer_agent::agent::{ModelDispatcher, OrganizerAgent, ProviderRegistry};
use organizer_agent::api::{build_router, AppState};
use organizer_agent::config::AppConfig;
use organizer_agent::store::MongoStore;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::default().from_env();

    let store = MongoStore::connect(&config.mongodb_uri, &config.mongodb_db)
        .await
        .context("failed to connect to MongoDB")?;

    let registry =
        ProviderRegistry::from_config(&config.agent).context("failed to build AI backends")?;
    match registry.preferred() {
        Ok(provider) => info!("Preferred AI provider: {}", provider),
        Err(_) => warn!(
            "No AI provider configured; agent operations will fail until a credential is set"
        ),
    }

    let dispatcher = ModelDispatcher::new(Arc::new(registry), &config.agent);
    let agent = OrganizerAgent::new(Arc::new(store), dispatcher);
    let app = build_router(AppState {
        agent: Arc::new(agent),
    });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Organizer agent service listening on {}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
