// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod report;
pub mod scan;
pub mod targets;
pub mod version;

// Re-export the scan pipeline surface
pub use scan::{
    run, FallbackPolicy, HtmlTextExtractor, HttpTransport, ItemError, NoFallback, PoolConfig,
    ResultSet, ScanError, ScanResult, Scanner, TextExtractor, TransformError, Transport,
    TransportError, WwwPrefix,
};
pub use report::{render_report, write_report};
pub use targets::{load_targets, parse_targets, TargetsError, TargetsOptions};
