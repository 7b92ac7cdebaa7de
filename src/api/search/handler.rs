// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API endpoint handler

use axum::{extract::State, http::StatusCode, Json};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::request::SearchApiRequest;
use super::response::{SearchApiError, SearchApiResponse};
use crate::api::http_server::AppState;
use crate::scan::ScanError;

/// POST /v1/search - Scan targets for a term
///
/// # Request
/// - `term`: Term to look for (required, max 500 chars)
/// - `targets`: Hostnames or URLs (default: server's target list)
/// - `concurrency`: Concurrent fetches (default: server setting)
/// - `deadlineSecs`: Collection deadline (default: server setting)
///
/// # Response
/// - `term`: Original term
/// - `results`: One `{target, found, error?}` per target, in input order
/// - `resultCount`, `foundCount`, `errorCount`
/// - `searchTimeMs`: Time taken for the scan
/// - `concurrency`: Concurrent fetches actually used
///
/// # Errors
/// - 400 Bad Request: Invalid term, targets or parameters
/// - 504 Gateway Timeout: Deadline elapsed; `partial` holds what arrived
/// - 500 Internal Server Error: Worker pool failure
pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchApiRequest>,
) -> Result<Json<SearchApiResponse>, SearchApiError> {
    debug!("Search request: {:?}", request.term);

    if let Err(e) = request.validate() {
        warn!("Search validation failed: {}", e);
        return Err(SearchApiError::new(StatusCode::BAD_REQUEST, e));
    }

    let config = request
        .pool_config(state.scanner.config())
        .map_err(|e| SearchApiError::new(StatusCode::BAD_REQUEST, e))?;

    let targets = match &request.targets {
        Some(targets) => targets.as_slice(),
        None => state.default_targets.as_slice(),
    };

    // Abandon the scan if the client goes away and this future is dropped
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let results = state
        .scanner
        .run_with(targets, &request.term, &config, cancel)
        .await
        .map_err(|e| scan_error(&request.term, e))?;

    info!(
        "Search complete: {} of {} targets contain '{}' in {}ms",
        results.found_count(),
        results.len(),
        request.term,
        results.elapsed().as_millis()
    );

    Ok(Json(SearchApiResponse::new(request.term, &results)))
}

fn scan_error(term: &str, error: ScanError) -> SearchApiError {
    let status = match &error {
        ScanError::Configuration { .. } => StatusCode::BAD_REQUEST,
        ScanError::DeadlineExceeded { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!("Search for '{}' failed: {}", term, error);

    let message = error.to_string();
    match error.into_partial() {
        Some(partial) => SearchApiError::new(status, message)
            .with_partial(SearchApiResponse::new(term.to_string(), &partial)),
        None => SearchApiError::new(status, message),
    }
}
