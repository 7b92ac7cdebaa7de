// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API response types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::scan::{ResultSet, ScanResult};

/// Outcome for one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetResult {
    pub target: String,
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&ScanResult> for TargetResult {
    fn from(result: &ScanResult) -> Self {
        Self {
            target: result.target.clone(),
            found: result.found,
            error: result.error.as_ref().map(ToString::to_string),
        }
    }
}

/// Response body for POST /v1/search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchApiResponse {
    /// The term as submitted
    pub term: String,

    /// One entry per submitted target, in submission order
    pub results: Vec<TargetResult>,

    pub result_count: usize,
    pub found_count: usize,
    pub error_count: usize,

    /// Time taken for the scan in milliseconds
    pub search_time_ms: u64,

    /// Number of concurrent fetches actually used
    pub concurrency: usize,
}

impl SearchApiResponse {
    pub fn new(term: String, results: &ResultSet) -> Self {
        Self {
            term,
            results: results.iter().map(TargetResult::from).collect(),
            result_count: results.len(),
            found_count: results.found_count(),
            error_count: results.error_count(),
            search_time_ms: u64::try_from(results.elapsed().as_millis()).unwrap_or(u64::MAX),
            concurrency: results.concurrency(),
        }
    }
}

/// Error body, with whatever results arrived before an interruption
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchApiError {
    #[serde(skip)]
    pub status: u16,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial: Option<SearchApiResponse>,
}

impl SearchApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            error: error.into(),
            partial: None,
        }
    }

    pub fn with_partial(mut self, partial: SearchApiResponse) -> Self {
        self.partial = Some(partial);
        self
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for SearchApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
