use std::sync::Arc;

use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::api;
use crate::backend;
use crate::config::AppConfig;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = "static";

/// Full application router: pages, actions, fragments, static assets and,
/// when enabled, the embedded backend REST surface under `/backend`.
pub fn build_router(state: AppState) -> Router {
    let timeout = state.config.server.request_timeout();

    let mut app = api::router();
    if state.config.backend.serve_embedded {
        app = app.nest(
            "/backend",
            api::backend::build_router().with_state(state.client.clone()),
        );
    }

    app.nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| async move {
                match tokio::time::timeout(timeout, next.run(req)).await {
                    Ok(res) => res,
                    Err(_elapsed) => {
                        (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response()
                    }
                }
            },
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let backend = backend::from_config(&config.backend)?;
    info!(
        name: "backend.config.loaded",
        provider = %config.backend.provider,
        base_url = config.backend.base_url.as_deref().unwrap_or("-"),
        serve_embedded = config.backend.serve_embedded,
        "Backend configuration loaded"
    );

    let state = AppState::new(backend, Arc::clone(&config));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
