// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP transport for fetching target pages
//!
//! One client is built per scanner and shared read-only by every unit;
//! reqwest's connection pool is safe for concurrent use.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::types::{ScanError, TransportError};

#[cfg(test)]
use mockall::automock;

/// A single GET against a fully-formed URL
///
/// Only transport-level failures are errors; any HTTP status returns the
/// body.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` and read the whole body
    async fn get(&self, url: &str) -> Result<Bytes, TransportError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a client bound by `timeout` for every request
    pub fn new(timeout: Duration) -> Result<Self, ScanError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("termscan/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| ScanError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn classify(url: &str, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            TransportError::Connect {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else {
            TransportError::Request {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Bytes, TransportError> {
        debug!("Fetching content from: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!("HTTP {} for {}, searching body anyway", status.as_u16(), url);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::classify(url, e))?;

        debug!("Fetched {} bytes from: {}", body.len(), url);
        Ok(body)
    }
}
