// GET handlers: stats, version, test diagnostic; peer allow-list middleware.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Query, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::AppState;
use crate::compress;
use crate::error::ApiError;
use crate::filter::StatsFilter;
use crate::version::{NAME, VERSION};

/// Rejects peers outside the configured allow-list with 400 before any
/// handler runs. Static paths are covered too.
pub(super) async fn require_allowed_peer(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.allowed_peers.contains(&peer.ip()) {
        tracing::warn!(peer = %peer.ip(), "rejected request from unlisted peer");
        return Err(ApiError::InvalidParameter(format!(
            "peer not allowed: {}",
            peer.ip()
        )));
    }
    Ok(next.run(request).await)
}

/// GET /stats?machine_id=<int>&from=<date>&to=<date> — gzip-compressed JSON
/// bundle of all eight tables for one machine. Each step returns early on
/// failure; nothing runs after an error response is produced.
pub(super) async fn stats_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let filter = StatsFilter::parse(&params)?;
    let bundle = state.stats_repo.get_machine_stats(&filter).await?;
    let json = serde_json::to_vec(&bundle)
        .map_err(|e| ApiError::Encoding(format!("serialize stats bundle: {e}")))?;
    let payload = compress::compress(&json)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CONTENT_ENCODING, "gzip"),
        ],
        payload.data,
    )
        .into_response())
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// How many machines the /test diagnostic samples per run.
const TEST_SAMPLE_SIZE: u32 = 10;

/// GET /test — diagnostic: times a full unbounded aggregation for a sample
/// of machines and reports mean ± stddev as a small HTML page.
pub(super) async fn test_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let machine_ids = state.stats_repo.sample_machine_ids(TEST_SAMPLE_SIZE).await?;

    let mut times_ms = Vec::with_capacity(machine_ids.len());
    for machine_id in machine_ids {
        let start = Instant::now();
        state
            .stats_repo
            .get_machine_stats(&StatsFilter::unbounded(machine_id))
            .await?;
        let elapsed = start.elapsed().as_millis() as u64;
        tracing::info!(machine_id, elapsed_ms = elapsed, "sampled machine stats");
        times_ms.push(elapsed as f64);
    }

    let (mean, std) = mean_std(&times_ms);
    let body = format!(
        "<html><body>Sampled {} machines in {:.0} &plusmn; {:.0}ms</body></html>",
        times_ms.len(),
        mean,
        std
    );
    Ok((
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        body,
    )
        .into_response())
}

fn mean_std(samples: &[f64]) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 0.0);
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}
