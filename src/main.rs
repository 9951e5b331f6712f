use axum::routing::{get, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use awesome_search::api;
use awesome_search::config::Config;
use awesome_search::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("GitHub API: {}", config.github.api_url);
    tracing::info!("LLM: {} ({})", config.llm.model, config.llm.base_url);
    if config.github.token.is_none() {
        tracing::warn!("No GITHUB_TOKEN set; unauthenticated search rate limits are low");
    }

    let state = AppState::new(config.clone())?;

    let app = Router::new()
        .route("/api/awesome_search", post(api::search::awesome_search))
        .route(
            "/api/awesome_search_logic",
            post(api::search::awesome_search_logic),
        )
        .route("/api/health", get(api::search::health))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
