// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fetch-transform-match unit
//!
//! Turns one target into exactly one [`ScanResult`]. Every failure is
//! captured in the result; nothing here can abort the pipeline.

use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, warn};

use super::extractor::TextExtractor;
use super::fallback::FallbackPolicy;
use super::transport::Transport;
use super::types::{ItemError, ScanResult};

/// Shared, read-only collaborators of every unit
#[derive(Clone)]
pub struct ScanUnit {
    transport: Arc<dyn Transport>,
    extractor: Arc<dyn TextExtractor>,
    fallback: Arc<dyn FallbackPolicy>,
}

impl ScanUnit {
    pub fn new(
        transport: Arc<dyn Transport>,
        extractor: Arc<dyn TextExtractor>,
        fallback: Arc<dyn FallbackPolicy>,
    ) -> Self {
        Self {
            transport,
            extractor,
            fallback,
        }
    }

    /// Fetch `target`, extract its text and look for `term`
    ///
    /// `term` is expected lowercase already; it is folded again anyway.
    pub async fn process(&self, target: &str, term: &str) -> ScanResult {
        let body = match self.fetch_with_fallback(target).await {
            Ok(body) => body,
            Err(error) => {
                warn!("Fetch failed for {}, returning an error", target);
                return ScanResult::failed(target, error);
            }
        };

        let text = match self.extractor.extract(&body) {
            Ok(text) => text,
            Err(error) => {
                warn!("Text extraction failed for {}: {}", target, error);
                return ScanResult::failed(target, ItemError::Transform(error));
            }
        };

        let found = contains_term(&text, term);
        debug!("site:{} found:{}", target, found);
        ScanResult::found(target, found)
    }

    async fn fetch_with_fallback(&self, target: &str) -> Result<Bytes, ItemError> {
        let primary = match self.transport.get(&target_url(target)).await {
            Ok(body) => return Ok(body),
            Err(error) => error,
        };

        warn!("{}", primary);
        let Some(alternate) = self.fallback.alternate(target) else {
            return Err(ItemError::Transport {
                primary,
                fallback: None,
            });
        };

        warn!(
            "Initial request failed for {}, attempting {} ({})",
            target,
            alternate,
            self.fallback.name()
        );

        self.transport
            .get(&target_url(&alternate))
            .await
            .map_err(|fallback| ItemError::Transport {
                primary,
                fallback: Some(fallback),
            })
    }
}

/// URL for a target: identifiers without a scheme are fetched over plain HTTP
pub fn target_url(target: &str) -> String {
    if target.contains("://") {
        target.to_string()
    } else {
        format!("http://{}", target)
    }
}

/// Case-insensitive substring test
pub fn contains_term(text: &str, term: &str) -> bool {
    text.to_lowercase().contains(&term.to_lowercase())
}
