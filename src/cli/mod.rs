// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod scan;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// termscan CLI
#[derive(Parser, Debug)]
#[command(name = "termscan-cli")]
#[command(version)]
#[command(about = "Search a list of websites for a term", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every target in a CSV file and report which ones contain a term
    Scan(scan::ScanArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan(args) => scan::run_scan(args).await,
    }
}
