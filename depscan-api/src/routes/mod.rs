// ---------------------------------------------------------------------------
// Route registration
// ---------------------------------------------------------------------------

mod scans;
mod system;
mod vulns;

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

use crate::auth::auth_middleware;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let health_route = Router::new().route("/api/system/health", get(system::health_check));

    let api_routes = Router::new()
        .route(
            "/api/scans",
            axum::routing::post(scans::trigger_scan).get(scans::list_scans),
        )
        .route(
            "/api/scans/{id}",
            get(scans::get_scan).delete(scans::delete_scan),
        )
        .route(
            "/api/scans/{id}/vulnerabilities",
            get(vulns::list_vulnerabilities),
        )
        .route("/api/projects/{name}/scans", get(scans::project_scans));

    // Apply auth middleware only if an API key is configured
    let api_routes = if state.api_key_hash.is_some() {
        api_routes.layer(from_fn_with_state(state.clone(), auth_middleware))
    } else {
        api_routes
    };

    // Any origin may call. The API uses no cookies or implicit credentials;
    // the bearer token must be attached explicitly, so cross-origin callers
    // pass the same auth gate as everyone else. Deployments that need an
    // origin allowlist front this with a reverse proxy.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ]);

    health_route
        .merge(api_routes)
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(64 * 1024)) // scan requests are tiny
        .with_state(state)
}
