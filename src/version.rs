// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for termscan

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-bounded-scan-2026-10-19";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2026-10-19";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "bounded-concurrency",
    "rendezvous-dispatch",
    "www-fallback",
    "html-text-extraction",
    "collection-deadline",
    "cancellation",
    "csv-targets",
    "tab-report",
    "http-api",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("termscan {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
