// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::report::write_report;
use crate::scan::{PoolConfig, ResultSet, ScanError, Scanner, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::targets::{load_targets, TargetsOptions};

/// Arguments for the scan command
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Comma-delimited file listing the targets
    #[arg(long, default_value = "urls.txt")]
    pub input: PathBuf,

    /// Term to look for (case-insensitive)
    #[arg(long)]
    pub search: String,

    /// Zero-based column holding the hostname or URL
    #[arg(long, default_value_t = 1)]
    pub column: usize,

    /// The input has no header row
    #[arg(long)]
    pub no_header: bool,

    /// Where to write the tab-aligned report
    #[arg(long, default_value = "results.txt")]
    pub output: PathBuf,

    /// Maximum concurrent fetches (can also be set via TERMSCAN_CONCURRENCY)
    #[arg(long, env = "TERMSCAN_CONCURRENCY", allow_negative_numbers = true)]
    pub concurrency: Option<i64>,

    /// Per-request timeout in seconds
    #[arg(long, env = "TERMSCAN_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Deadline for collecting every result, in seconds
    #[arg(long, env = "TERMSCAN_COLLECTION_DEADLINE_SECS")]
    pub deadline_secs: Option<u64>,
}

impl ScanArgs {
    /// Pool configuration described by these arguments
    pub fn pool_config(&self) -> Result<PoolConfig, ScanError> {
        let mut config = PoolConfig::default()
            .with_request_timeout(Duration::from_secs(self.timeout_secs));
        if let Some(concurrency) = self.concurrency {
            config.concurrency = PoolConfig::concurrency_from_signed(concurrency)?;
        }
        if let Some(secs) = self.deadline_secs {
            config = config.with_collection_deadline(Duration::from_secs(secs));
        }
        config.validate()?;
        Ok(config)
    }

    pub fn targets_options(&self) -> TargetsOptions {
        TargetsOptions {
            column: self.column,
            has_header: !self.no_header,
        }
    }
}

/// Load targets, scan them and write the report
///
/// Ctrl+C cancels the scan; whatever arrived before a cancellation or an
/// elapsed deadline is still written to the report before the error is
/// returned.
pub async fn run_scan(args: ScanArgs) -> Result<()> {
    let started = Instant::now();

    if args.search.trim().is_empty() {
        return Err(anyhow!(
            "No search term was provided. Expected arguments: '--search <TERM>'"
        ));
    }

    let config = args.pool_config()?;
    let targets = load_targets(&args.input, &args.targets_options())?;
    let scanner = Scanner::new(config)?;

    let cancel = CancellationToken::new();
    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; stopping scan");
                cancel.cancel();
            }
        }
    });

    let outcome = scanner
        .run_with_cancel(&targets, &args.search, cancel)
        .await;
    ctrl_c.abort();

    let result = match outcome {
        Ok(results) => {
            report(&args, &results)?;
            Ok(())
        }
        Err(e) => {
            if let Some(partial) = e.partial() {
                report(&args, partial)?;
            }
            Err(e.into())
        }
    };

    info!("Search took {:?}", started.elapsed());
    result
}

fn report(args: &ScanArgs, results: &ResultSet) -> Result<()> {
    write_report(&args.output, results)
        .with_context(|| format!("writing report to {}", args.output.display()))?;
    info!(
        "{} of {} targets contain '{}' ({} errors)",
        results.found_count(),
        results.len(),
        args.search,
        results.error_count()
    );
    Ok(())
}
