// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server configuration

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

use crate::targets::{load_targets, TargetsOptions};

/// Default listen address
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the router is served on (default: 0.0.0.0:3000)
    pub listen_addr: SocketAddr,
    /// CSV file supplying targets when a request names none
    pub targets_file: Option<PathBuf>,
    /// How to read `targets_file`
    pub targets: TargetsOptions,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// - `TERMSCAN_LISTEN_ADDR`
    /// - `TERMSCAN_TARGETS_FILE`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_addr = lookup("TERMSCAN_LISTEN_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .with_context(|| format!("TERMSCAN_LISTEN_ADDR is not a socket address: '{}'", raw_addr))?;

        let targets_file = lookup("TERMSCAN_TARGETS_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            listen_addr,
            targets_file,
            targets: TargetsOptions::default(),
        })
    }

    /// Load the default target list, empty when no file is configured
    pub fn load_default_targets(&self) -> Result<Vec<String>> {
        match &self.targets_file {
            Some(path) => {
                let targets = load_targets(path, &self.targets)
                    .with_context(|| format!("loading default targets from {}", path.display()))?;
                Ok(targets)
            }
            None => {
                info!("No TERMSCAN_TARGETS_FILE set; requests must name their targets");
                Ok(Vec::new())
            }
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            targets_file: None,
            targets: TargetsOptions::default(),
        }
    }
}
