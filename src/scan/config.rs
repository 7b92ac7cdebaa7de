// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Worker pool configuration
//!
//! Loaded from `TERMSCAN_*` environment variables or built directly.

use std::env;
use std::time::Duration;

use super::types::ScanError;

/// Default upper bound on concurrently in-flight requests
pub const DEFAULT_CONCURRENCY: usize = 20;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Longest accepted collection deadline (one week)
pub const MAX_COLLECTION_DEADLINE_SECS: u64 = 7 * 24 * 60 * 60;

/// Configuration for one scan pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of concurrent units (default: 20)
    pub concurrency: usize,
    /// Timeout applied to every GET (default: 10s)
    pub per_request_timeout: Duration,
    /// Optional deadline for the whole collection phase (default: none)
    pub collection_deadline: Option<Duration>,
}

impl PoolConfig {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency,
            ..Self::default()
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.per_request_timeout = timeout;
        self
    }

    pub fn with_collection_deadline(mut self, deadline: Duration) -> Self {
        self.collection_deadline = Some(deadline);
        self
    }

    /// Load configuration from environment variables
    ///
    /// - `TERMSCAN_CONCURRENCY`
    /// - `TERMSCAN_REQUEST_TIMEOUT_SECS`
    /// - `TERMSCAN_COLLECTION_DEADLINE_SECS`
    pub fn from_env() -> Result<Self, ScanError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ScanError> {
        let concurrency = match lookup("TERMSCAN_CONCURRENCY") {
            Some(raw) => {
                let value = raw.trim().parse::<i64>().map_err(|_| {
                    ScanError::configuration(format!(
                        "TERMSCAN_CONCURRENCY must be an integer, got '{}'",
                        raw
                    ))
                })?;
                Self::concurrency_from_signed(value)?
            }
            None => DEFAULT_CONCURRENCY,
        };

        let per_request_timeout = secs_from_lookup(&lookup, "TERMSCAN_REQUEST_TIMEOUT_SECS")?
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
        let collection_deadline =
            secs_from_lookup(&lookup, "TERMSCAN_COLLECTION_DEADLINE_SECS")?;

        let config = Self {
            concurrency,
            per_request_timeout,
            collection_deadline,
        };
        config.validate()?;
        Ok(config)
    }

    /// Convert a possibly negative count from an outer surface (CLI, env, JSON)
    pub fn concurrency_from_signed(value: i64) -> Result<usize, ScanError> {
        if value <= 0 {
            return Err(ScanError::configuration(format!(
                "concurrency must be a positive integer, got {}",
                value
            )));
        }
        usize::try_from(value)
            .map_err(|_| ScanError::configuration(format!("concurrency {} is too large", value)))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.concurrency == 0 {
            return Err(ScanError::configuration(
                "concurrency must be a positive integer, got 0",
            ));
        }
        if self.per_request_timeout.is_zero() {
            return Err(ScanError::configuration(
                "per-request timeout must be greater than zero",
            ));
        }
        if self.collection_deadline.is_some_and(|d| d.is_zero()) {
            return Err(ScanError::configuration(
                "collection deadline must be greater than zero",
            ));
        }
        if self
            .collection_deadline
            .is_some_and(|d| d > Duration::from_secs(MAX_COLLECTION_DEADLINE_SECS))
        {
            return Err(ScanError::configuration(format!(
                "collection deadline must be at most {} seconds",
                MAX_COLLECTION_DEADLINE_SECS
            )));
        }
        Ok(())
    }

    /// Pool size for `work_items` items: never more units than there is work
    pub fn effective_concurrency(&self, work_items: usize) -> usize {
        self.concurrency.min(work_items)
    }
}

/// Whole seconds from `key`, if set
fn secs_from_lookup(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, ScanError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| {
                ScanError::configuration(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    key, raw
                ))
            }),
        None => Ok(None),
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            per_request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            collection_deadline: None,
        }
    }
}
