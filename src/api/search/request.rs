// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API request types

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::scan::PoolConfig;

/// Longest accepted search term
pub const MAX_TERM_LEN: usize = 500;

/// Request body for POST /v1/search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchApiRequest {
    /// Term to look for (required, max 500 chars, case-insensitive)
    pub term: String,

    /// Hostnames or URLs to scan (default: the server's target list)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<String>>,

    /// Override for the number of concurrent fetches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<i64>,

    /// Deadline for collecting all results, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_secs: Option<u64>,
}

impl SearchApiRequest {
    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        if self.term.trim().is_empty() {
            return Err("Term cannot be empty".to_string());
        }
        if self.term.chars().count() > MAX_TERM_LEN {
            return Err(format!("Term too long (max {} characters)", MAX_TERM_LEN));
        }
        if let Some(targets) = &self.targets {
            if targets.is_empty() {
                return Err("targets cannot be an empty list".to_string());
            }
            if targets.iter().any(|t| t.trim().is_empty()) {
                return Err("targets cannot contain blank entries".to_string());
            }
        }
        if let Some(concurrency) = self.concurrency {
            if concurrency <= 0 {
                return Err("concurrency must be at least 1".to_string());
            }
        }
        if self.deadline_secs == Some(0) {
            return Err("deadlineSecs must be at least 1".to_string());
        }
        Ok(())
    }

    /// Pool configuration for this request, starting from the server's
    pub fn pool_config(&self, base: &PoolConfig) -> Result<PoolConfig, String> {
        let mut config = base.clone();
        if let Some(concurrency) = self.concurrency {
            config.concurrency =
                PoolConfig::concurrency_from_signed(concurrency).map_err(|e| e.to_string())?;
        }
        if let Some(secs) = self.deadline_secs {
            config.collection_deadline = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }
}
