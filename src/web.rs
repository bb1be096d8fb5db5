use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::{self, AppState};
use crate::config::AppConfig;

pub async fn run(state: Arc<AppState>, config: &AppConfig) {
    let app = build_app(state, &config.static_dir);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("Web server running at http://localhost:{}", config.port);
    axum::serve(listener, app).await.unwrap();
}

pub fn build_app(state: Arc<AppState>, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router(state))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
}
