use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use marketplace_api::adapters::http::{api_router, AppState, AuthState};
use marketplace_api::adapters::ids::RandomServiceIdGenerator;
use marketplace_api::adapters::postgres::PostgresStore;
use marketplace_api::adapters::search::{DisabledSearchIndex, HttpSearchIndex, HttpSearchIndexConfig};
use marketplace_api::adapters::validation::JsonSchemaValidator;
use marketplace_api::config::{AppConfig, SearchConfig, ServerConfig};
use marketplace_api::ports::SearchIndex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config);
    config.validate().context("Invalid configuration")?;

    info!("Connecting to database...");
    let db = &config.database;
    let pool = db
        .pool_options()
        .connect_with(db.connect_options()?)
        .await
        .context("Failed to connect to database")?;

    if db.run_migrations {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let state = AppState::new(
        Arc::new(PostgresStore::new(pool)),
        Arc::new(JsonSchemaValidator::new()),
        search_index(&config.search)?,
        Arc::new(RandomServiceIdGenerator::new()),
        config.api.page_size,
    );

    let auth = AuthState::new(config.api.auth_tokens_list());
    if !auth.is_enabled() {
        tracing::warn!("No API tokens configured; authentication is disabled");
    }

    let app = api_router(state, auth).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(config.server.request_timeout()))
            .layer(CompressionLayer::new())
            .layer(cors_layer(&config.server)),
    );

    let addr = config.server.socket_addr()?;
    info!(%addr, environment = ?config.server.environment, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(&config.server.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    if config.server.environment.is_deployed() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn search_index(config: &SearchConfig) -> anyhow::Result<Arc<dyn SearchIndex>> {
    let Some(base_url) = config.base_url.as_deref() else {
        tracing::warn!("No search API configured; services will not be indexed");
        return Ok(Arc::new(DisabledSearchIndex));
    };

    let mut client_config =
        HttpSearchIndexConfig::new(base_url, config.index.clone()).with_timeout(config.timeout());
    if let Some(token) = &config.auth_token {
        client_config = client_config.with_auth_token(token.clone());
    }
    Ok(Arc::new(HttpSearchIndex::new(client_config)?))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new().allow_origin(AllowOrigin::list(origins))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
