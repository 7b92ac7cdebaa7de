// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scan orchestration
//!
//! Validates input, sizes the pool, wires dispatcher, units and collector
//! together and makes sure every unit has exited before returning.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::collector::{Collection, Collector};
use super::config::PoolConfig;
use super::dispatcher::handoff;
use super::extractor::{HtmlTextExtractor, TextExtractor};
use super::fallback::{FallbackPolicy, WwwPrefix};
use super::pool::WorkerPool;
use super::transport::{HttpTransport, Transport};
use super::types::{ResultSet, ScanError, WorkItem};
use super::unit::ScanUnit;

/// Runs scans against one long-lived transport
///
/// Cheap to clone; clones share the transport, extractor and fallback policy.
#[derive(Clone)]
pub struct Scanner {
    transport: Arc<dyn Transport>,
    extractor: Arc<dyn TextExtractor>,
    fallback: Arc<dyn FallbackPolicy>,
    config: PoolConfig,
}

impl Scanner {
    /// Create a scanner with an HTTP transport bound by the per-request timeout
    pub fn new(config: PoolConfig) -> Result<Self, ScanError> {
        config.validate()?;
        let transport = HttpTransport::new(config.per_request_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a scanner over any transport
    pub fn with_transport(config: PoolConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            extractor: Arc::new(HtmlTextExtractor),
            fallback: Arc::new(WwwPrefix),
            config,
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackPolicy>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Search every target for `term` using the scanner's configuration
    pub async fn run<S: AsRef<str>>(&self, targets: &[S], term: &str) -> Result<ResultSet, ScanError> {
        self.run_with(targets, term, &self.config, CancellationToken::new())
            .await
    }

    /// Like [`run`](Self::run), stopping early when `cancel` fires
    pub async fn run_with_cancel<S: AsRef<str>>(
        &self,
        targets: &[S],
        term: &str,
        cancel: CancellationToken,
    ) -> Result<ResultSet, ScanError> {
        self.run_with(targets, term, &self.config, cancel).await
    }

    /// Run with a per-call pool configuration
    ///
    /// The per-request timeout stays the one the transport was built with.
    pub async fn run_with<S: AsRef<str>>(
        &self,
        targets: &[S],
        term: &str,
        config: &PoolConfig,
        cancel: CancellationToken,
    ) -> Result<ResultSet, ScanError> {
        if term.trim().is_empty() {
            return Err(ScanError::configuration("no search term was provided"));
        }
        if targets.is_empty() {
            return Err(ScanError::configuration("no targets were provided"));
        }
        config.validate()?;

        let started = Instant::now();
        let expected = targets.len();
        let concurrency = config.effective_concurrency(expected);
        if concurrency < config.concurrency {
            info!(
                "Using {} units instead of {}: only {} targets",
                concurrency, config.concurrency, expected
            );
        }

        let items: Vec<WorkItem> = targets
            .iter()
            .enumerate()
            .map(|(slot, target)| WorkItem {
                slot,
                target: target.as_ref().to_string(),
            })
            .collect();

        info!(
            "Scanning {} targets for '{}' with {} units",
            expected, term, concurrency
        );

        let run_cancel = cancel.child_token();
        let (dispatcher, work) = handoff(concurrency, run_cancel.clone());
        let (results_tx, results_rx) = mpsc::channel(1);

        let unit = ScanUnit::new(
            self.transport.clone(),
            self.extractor.clone(),
            self.fallback.clone(),
        );
        let pool = WorkerPool::start(
            concurrency,
            unit,
            Arc::from(term.to_lowercase()),
            work,
            results_tx,
            run_cancel.clone(),
        )?;

        let dispatch = tokio::spawn(dispatcher.dispatch(items));

        let collection = Collector::new(
            results_rx,
            expected,
            config.collection_deadline,
            run_cancel.clone(),
        )
        .collect()
        .await;

        if !matches!(collection, Collection::Complete(_)) {
            // Abandon whatever is still in flight
            run_cancel.cancel();
        }

        let dispatched = dispatch.await;
        let joined = pool.join().await;
        let elapsed = started.elapsed();

        let dispatched = dispatched
            .map_err(|e| ScanError::lifecycle(format!("dispatcher terminated abnormally: {}", e)))?;
        joined?;

        match collection {
            Collection::Complete(completed) => {
                let set = ResultSet::from_completed(completed, concurrency, elapsed);
                info!(
                    "Scan complete: {} results ({} found, {} errors) in {}ms",
                    set.len(),
                    set.found_count(),
                    set.error_count(),
                    elapsed.as_millis()
                );
                Ok(set)
            }
            Collection::DeadlineExceeded(completed) => Err(ScanError::DeadlineExceeded {
                deadline: config.collection_deadline.unwrap_or_default(),
                expected,
                partial: ResultSet::from_completed(completed, concurrency, elapsed),
            }),
            Collection::Cancelled(completed) => {
                warn!("Scan cancelled after dispatching {} of {} targets", dispatched, expected);
                Err(ScanError::Cancelled {
                    expected,
                    partial: ResultSet::from_completed(completed, concurrency, elapsed),
                })
            }
            Collection::Starved(completed) => {
                error!(
                    "Units exited with {} of {} results delivered",
                    completed.len(),
                    expected
                );
                Err(ScanError::lifecycle(format!(
                    "units exited with {} of {} results delivered",
                    completed.len(),
                    expected
                )))
            }
        }
    }
}

/// Search `targets` for `term` with a fresh HTTP client
///
/// Convenience for one-off scans; long-lived callers should keep a
/// [`Scanner`] so the client and its connection pool are reused.
pub async fn run<S: AsRef<str>>(
    targets: &[S],
    term: &str,
    config: PoolConfig,
) -> Result<ResultSet, ScanError> {
    // Validate before building the client so bad input never touches the network
    if term.trim().is_empty() {
        return Err(ScanError::configuration("no search term was provided"));
    }
    Scanner::new(config)?.run(targets, term).await
}
