// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounded-concurrency fetch and search pipeline
//!
//! Fetches each target over HTTP, extracts its text and reports whether a
//! term occurs in it, with at most `concurrency` requests in flight.
//!
//! ## Architecture
//!
//! ```text
//! targets → Dispatcher ──rendezvous──► N × ScanUnit ──► Collector → ResultSet
//!                                        │
//!                             Transport (shared client)
//!                             FallbackPolicy (www. retry)
//!                             TextExtractor (HTML → text)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let scanner = Scanner::new(PoolConfig::from_env()?)?;
//! let results = scanner.run(&["example.com", "rust-lang.org"], "rust").await?;
//! for result in &results {
//!     println!("{} {}", result.target, result.found);
//! }
//! ```

mod collector;
pub mod config;
mod dispatcher;
pub mod extractor;
pub mod fallback;
mod pool;
pub mod service;
pub mod transport;
pub mod types;
pub mod unit;

pub use config::{
    PoolConfig, DEFAULT_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT_SECS, MAX_COLLECTION_DEADLINE_SECS,
};
pub use extractor::{HtmlTextExtractor, TextExtractor};
pub use fallback::{FallbackPolicy, NoFallback, WwwPrefix};
pub use service::{run, Scanner};
pub use transport::{HttpTransport, Transport};
pub use types::{
    ItemError, ResultSet, ScanError, ScanResult, TransformError, TransportError, WorkItem,
};
pub use unit::{contains_term, target_url, ScanUnit};
