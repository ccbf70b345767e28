//! Application router — mounts the public pages, subscriber flows,
//! dashboard, and operational endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{dashboard, pages, WebState};

/// Build the full application router.
pub fn web_router(state: WebState) -> Router {
    Router::new()
        // Public
        .route("/", get(pages::home))
        .route("/subscribers", post(pages::subscribe))
        .route("/subscribers/:key/verify", get(pages::subscriber_verify))
        .route("/subscribers/:key/manage", get(pages::subscriber_manage))
        .route(
            "/subscribers/:key/unsubscribe",
            get(pages::unsubscribe_page).post(pages::unsubscribe),
        )
        // Dashboard
        .route("/dashboard", get(dashboard::dashboard_home))
        .route(
            "/dashboard/login",
            get(dashboard::login_page).post(dashboard::login),
        )
        .route("/dashboard/logout", post(dashboard::logout))
        .route("/dashboard/metrics", get(dashboard::metrics_page))
        .route(
            "/dashboard/api/tables/metrics",
            get(dashboard::metric_table_spec),
        )
        // Operational endpoints
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        .route("/live", get(liveness))
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

/// GET /health — health check endpoint.
async fn health_check(State(state): State<WebState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready — readiness probe.
async fn readiness(State(state): State<WebState>) -> StatusCode {
    if state.store.visible_component_groups().is_empty() && state.store.list_metrics().is_empty() {
        // Nothing loaded yet; still serving, but not meaningfully ready.
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

/// GET /live — liveness probe.
async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use statuspage_core::config::SiteConfig;
    use statuspage_store::StatusStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn router_builds_with_seeded_store() {
        let state = WebState::new(Arc::new(StatusStore::new()), SiteConfig::default());
        let _router = web_router(state);
    }

    #[tokio::test]
    async fn readiness_reflects_store_content() {
        let empty = WebState::new(Arc::new(StatusStore::empty()), SiteConfig::default());
        assert_eq!(readiness(State(empty)).await, StatusCode::SERVICE_UNAVAILABLE);

        let seeded = WebState::new(Arc::new(StatusStore::new()), SiteConfig::default());
        assert_eq!(readiness(State(seeded)).await, StatusCode::OK);
    }
}
