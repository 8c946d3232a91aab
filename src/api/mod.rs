// src/api/mod.rs — HTTP API over the session registry

pub mod extract;
pub mod handlers;
pub mod types;

use std::future::Future;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::infra::config::ServerConfig;
use crate::recorder::VisitRecorder;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub recorder: VisitRecorder,
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the axum router with all API routes.
pub fn build_router(state: ApiState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/api/register", post(handlers::register))
        .route("/api/sessions/{id}", get(handlers::get_session))
        .route("/api/sessions/{id}/visits", post(handlers::record_visit))
        .route(
            "/api/sessions/{id}/visits/latest/enrich",
            post(handlers::enrich_last_visit),
        )
        .route("/api/admin/sessions", get(handlers::list_sessions))
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}

/// Serve until `shutdown` resolves.
pub async fn start_server<F>(config: &ServerConfig, state: ApiState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.bind_addr();
    let router = build_router(state, config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("visitlog listening on http://{addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
