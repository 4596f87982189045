//! Axum-based HTTP gateway over the pantry and the recipe pipeline.
//!
//! Request bodies are capped at 64KB and every request shares one timeout
//! taken from `[gateway] request_timeout_secs`. The completion call runs on
//! a shorter budget so its failure still reaches the caller.

mod events;
mod handlers;
mod websocket;

pub use events::{ClientMessage, ServerMessage};

use handlers::{
    handle_add_ingredient, handle_catalog, handle_commit_notes, handle_edit_notes_draft,
    handle_generate_from_pantry, handle_generate_recipe, handle_get_notes_draft,
    handle_get_preferences, handle_health, handle_list_ingredients, handle_remove_ingredient,
    handle_set_notes, handle_suggest, handle_toggle_cuisine, handle_toggle_restriction,
};
use websocket::ws_handler;

use crate::config::{Config, GatewayConfig};
use crate::pantry::Pantry;
use crate::providers::{GenerationParams, create_provider};
use crate::recipe::{RecipeDesk, RecipePipeline};
use crate::store::{StoreAdapter, create_store};
use anyhow::Result;
use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    routing::{delete, get, post, put},
};
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64KB)
pub const MAX_BODY_SIZE: usize = 65_536;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub pantry: Pantry,
    /// Stateless generation for `/api/generate-recipe`
    pub pipeline: RecipePipeline,
    /// One-at-a-time generation from the stored pantry
    pub desk: RecipeDesk,
}

impl AppState {
    pub fn new(pantry: Pantry, pipeline: RecipePipeline) -> Self {
        let desk = RecipeDesk::new(pipeline.clone());
        Self {
            pantry,
            pipeline,
            desk,
        }
    }

    /// Open the configured store and provider.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let backend = create_store(&config.store, &config.workspace_dir).await?;
        let pantry = Pantry::load(StoreAdapter::new(backend)).await;
        let provider = create_provider(config)?;
        let pipeline = RecipePipeline::new(provider, GenerationParams::from_config(config));
        Ok(Self::new(pantry, pipeline))
    }
}

pub fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Run the HTTP gateway on `host:port`.
pub async fn run_gateway(host: &str, port: u16, config: Config) -> Result<()> {
    if is_public_bind(host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host}: the gateway has no authentication.\n\
             Fix: use --host 127.0.0.1 (default), or set\n\
             [gateway] allow_public_bind = true in config.toml (NOT recommended)."
        );
    }

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    run_gateway_with_listener(host, listener, config).await
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Config,
) -> Result<()> {
    let state = AppState::from_config(&config).await?;
    serve(host, listener, state, &config.gateway).await
}

/// Serve an already-built state. Watchers for external changes run for the
/// lifetime of the server.
pub async fn serve(
    host: &str,
    listener: tokio::net::TcpListener,
    state: AppState,
    gateway: &GatewayConfig,
) -> Result<()> {
    let actual_port = listener.local_addr()?.port();
    let watchers = state.pantry.watch();

    tracing::info!(
        addr = %format!("{host}:{actual_port}"),
        store = state.pantry.store.backend_name(),
        "gateway listening"
    );

    let app = router(state, gateway);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    for watcher in watchers {
        watcher.abort();
    }
    served?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {error}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down gateway");
}

pub fn router(state: AppState, gateway: &GatewayConfig) -> Router {
    let mut app = Router::new()
        .route("/health", get(handle_health))
        .route("/api/generate-recipe", post(handle_generate_recipe))
        .route(
            "/api/ingredients",
            get(handle_list_ingredients).post(handle_add_ingredient),
        )
        .route("/api/ingredients/suggest", get(handle_suggest))
        .route("/api/ingredients/{index}", delete(handle_remove_ingredient))
        .route("/api/preferences", get(handle_get_preferences))
        .route(
            "/api/preferences/restrictions/toggle",
            post(handle_toggle_restriction),
        )
        .route("/api/preferences/cuisines/toggle", post(handle_toggle_cuisine))
        .route("/api/preferences/notes", put(handle_set_notes))
        .route(
            "/api/preferences/notes/draft",
            get(handle_get_notes_draft).put(handle_edit_notes_draft),
        )
        .route("/api/preferences/notes/commit", post(handle_commit_notes))
        .route("/api/recipes", post(handle_generate_from_pantry))
        .route("/api/catalog", get(handle_catalog))
        .route("/ws", get(ws_handler))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            gateway.request_timeout(),
        ));

    if let Some(cors) = cors_layer(&gateway.cors_origins) {
        app = app.layer(cors);
    }
    app
}

/// `None` when no valid origin is configured.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if allowed.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]),
    )
}
