// HTTP routes: /stats and friends behind the peer allow-list, everything
// else served from the static root.

mod http;

use axum::{Router, middleware, routing::get};
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::stats_repo::StatsRepo;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) stats_repo: Arc<StatsRepo>,
    pub(crate) allowed_peers: Arc<HashSet<IpAddr>>,
}

pub fn app(
    stats_repo: Arc<StatsRepo>,
    allowed_peers: HashSet<IpAddr>,
    static_root: &str,
) -> Router {
    let state = AppState {
        stats_repo,
        allowed_peers: Arc::new(allowed_peers),
    };
    Router::new()
        .route("/stats", get(http::stats_handler)) // GET /stats
        .route("/version", get(http::version_handler)) // GET /version
        .route("/test", get(http::test_handler)) // GET /test (diagnostic)
        .fallback_service(ServeDir::new(static_root))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            http::require_allowed_peer,
        ))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
