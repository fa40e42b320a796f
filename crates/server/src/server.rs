use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{expenses, health};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/health/", get(health::check))
        .route("/api/expenses/", get(expenses::list))
        .route("/api/expenses/add/", post(expenses::add))
        .route("/api/expenses/total/", get(expenses::total))
        .route("/api/expenses/monthly/", get(expenses::monthly))
        .route("/api/expenses/categories/", get(expenses::categories))
        .route("/api/expenses/reset/", delete(expenses::reset))
        .route("/api/expenses/{id}/update/", put(expenses::update))
        .route("/api/expenses/{id}/delete/", delete(expenses::delete_one))
        .layer(TraceLayer::new_for_http())
        // The dashboard is served from another origin.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The full HTTP application for `engine`.
pub fn app(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {} ({} store)", addr, engine.backend());

    axum::serve(listener, app(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
