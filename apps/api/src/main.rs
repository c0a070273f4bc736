mod admin;
mod auth;
mod config;
mod db;
mod enhance;
mod entitlement;
mod errors;
mod extract;
mod leads;
mod llm_client;
mod models;
mod render;
mod resumes;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::TokenService;
use crate::config::Config;
use crate::db::create_pool;
use crate::enhance::LlmRewriter;
use crate::llm_client::LlmClient;
use crate::resumes::purge::spawn_purge_task;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::postgres::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first; fails on missing required env vars
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    let store = Arc::new(PgStore::new(pool));

    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let purge = spawn_purge_task(
        store.clone(),
        Duration::from_secs(config.purge_interval_secs),
    );
    info!(
        "Trash purge sweep scheduled every {}s",
        config.purge_interval_secs
    );

    let state = AppState {
        accounts: store.clone(),
        resumes: store.clone(),
        download_logs: store.clone(),
        leads: store,
        tokens: TokenService::new(&config.jwt_secret),
        rewriter: Arc::new(LlmRewriter(llm)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    purge.abort();
    Ok(())
}
