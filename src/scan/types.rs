// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for the scan pipeline

use std::time::Duration;
use thiserror::Error;

/// A single target handed to exactly one unit
///
/// `slot` is the position in the caller's input, so duplicate identifiers
/// stay distinct all the way through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Submission slot (zero-based position in the input)
    pub slot: usize,
    /// Hostname or URL naming the remote document
    pub target: String,
}

/// Outcome for one target
///
/// `found` only carries meaning when `error` is `None`: a failed fetch is
/// `found == false` with an error, a fetched page without the term is
/// `found == false` without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// The identifier exactly as submitted
    pub target: String,
    /// Whether the term occurs in the extracted text
    pub found: bool,
    /// Why the target could not be searched, if it could not
    pub error: Option<ItemError>,
}

impl ScanResult {
    pub fn found(target: impl Into<String>, found: bool) -> Self {
        Self {
            target: target.into(),
            found,
            error: None,
        }
    }

    pub fn failed(target: impl Into<String>, error: ItemError) -> Self {
        Self {
            target: target.into(),
            found: false,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A result tagged with the slot it answers
#[derive(Debug)]
pub(crate) struct Completed {
    pub slot: usize,
    pub result: ScanResult,
}

/// Transport-level failure of a single GET
///
/// Non-2xx statuses are not failures; only the request itself failing is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Request exceeded the per-request timeout
    #[error("Timeout fetching: {url}")]
    Timeout { url: String },

    /// Could not connect (DNS failure, connection refused, TLS)
    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    /// Any other request or body-read failure
    #[error("HTTP error for {url}: {message}")]
    Request { url: String, message: String },
}

/// Payload could not be turned into searchable text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Could not convert payload to text: {reason}")]
pub struct TransformError {
    pub reason: String,
}

impl TransformError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Per-item failure, folded into that item's [`ScanResult`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    /// The primary fetch failed and so did the fallback (if there was one)
    #[error("{}", describe_transport(.primary, .fallback.as_ref()))]
    Transport {
        primary: TransportError,
        fallback: Option<TransportError>,
    },

    /// The page was fetched but its text could not be extracted
    #[error(transparent)]
    Transform(#[from] TransformError),
}

fn describe_transport(primary: &TransportError, fallback: Option<&TransportError>) -> String {
    match fallback {
        Some(fallback) => format!("{}; fallback: {}", primary, fallback),
        None => primary.to_string(),
    }
}

/// Errors that end a whole scan call
#[derive(Debug, Error)]
pub enum ScanError {
    /// Rejected before any network activity
    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },

    /// The worker pool did not start or did not shut down cleanly
    #[error("Worker pool failure: {reason}")]
    Lifecycle { reason: String },

    /// Collection deadline elapsed; `partial` holds what arrived in time
    #[error(
        "Collection deadline of {}ms exceeded with {} of {} results",
        .deadline.as_millis(),
        .partial.len(),
        .expected
    )]
    DeadlineExceeded {
        deadline: Duration,
        expected: usize,
        partial: ResultSet,
    },

    /// Cancelled by the caller; `partial` holds what arrived before
    #[error("Scan cancelled with {} of {} results", .partial.len(), .expected)]
    Cancelled { expected: usize, partial: ResultSet },
}

impl ScanError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub fn lifecycle(reason: impl Into<String>) -> Self {
        Self::Lifecycle {
            reason: reason.into(),
        }
    }

    /// Results gathered before an interruption, if this error carries any
    pub fn partial(&self) -> Option<&ResultSet> {
        match self {
            Self::DeadlineExceeded { partial, .. } | Self::Cancelled { partial, .. } => {
                Some(partial)
            }
            _ => None,
        }
    }

    pub fn into_partial(self) -> Option<ResultSet> {
        match self {
            Self::DeadlineExceeded { partial, .. } | Self::Cancelled { partial, .. } => {
                Some(partial)
            }
            _ => None,
        }
    }
}

/// Every result produced by one scan, in submission order
#[derive(Debug, Clone)]
pub struct ResultSet {
    results: Vec<ScanResult>,
    concurrency: usize,
    elapsed: Duration,
}

impl ResultSet {
    /// Assemble from results already in submission order
    pub fn new(results: Vec<ScanResult>, concurrency: usize, elapsed: Duration) -> Self {
        Self {
            results,
            concurrency,
            elapsed,
        }
    }

    /// Build from results tagged with their submission slot
    pub(crate) fn from_completed(
        mut completed: Vec<Completed>,
        concurrency: usize,
        elapsed: Duration,
    ) -> Self {
        completed.sort_by_key(|c| c.slot);
        Self {
            results: completed.into_iter().map(|c| c.result).collect(),
            concurrency,
            elapsed,
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScanResult> {
        self.results.iter()
    }

    pub fn results(&self) -> &[ScanResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<ScanResult> {
        self.results
    }

    /// First result for `target`; duplicates are kept, use [`iter`](Self::iter) to see all
    pub fn get(&self, target: &str) -> Option<&ScanResult> {
        self.results.iter().find(|r| r.target == target)
    }

    pub fn found_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.found && r.error.is_none())
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_error()).count()
    }

    /// Number of units the pool actually ran with
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Wall time from validation to the last unit exiting
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ScanResult;
    type IntoIter = std::slice::Iter<'a, ScanResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
