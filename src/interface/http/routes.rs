use std::sync::Arc;

use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::ports::HostStore;

use super::auth::{require_token, AuthTokens};
use super::handlers::{
    get_host_handler, get_stats_handler, health_handler, insert_stats_handler,
    list_hosts_handler, AppState,
};

/// Assembles the full HTTP surface.
///
/// The /hosts subtree sits behind token auth when tokens are configured;
/// /health never does, so probes keep working without credentials.
pub fn create_router(store: Arc<dyn HostStore>, auth_tokens: Vec<String>) -> Router {
    let state = AppState { store };

    let mut hosts = Router::new()
        .route("/hosts", get(list_hosts_handler))
        .route("/hosts/{hostname}", get(get_host_handler))
        .route(
            "/hosts/{hostname}/stats",
            get(get_stats_handler).post(insert_stats_handler),
        );

    if !auth_tokens.is_empty() {
        hosts = hosts.layer(middleware::from_fn_with_state(
            AuthTokens::new(auth_tokens),
            require_token,
        ));
    }

    Router::new()
        .merge(hosts)
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
