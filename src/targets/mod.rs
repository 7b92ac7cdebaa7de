// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Target list loading
//!
//! Reads one column of a comma-delimited file (the second column by default,
//! below a header row) into the ordered target list the scanner consumes.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// How to pick targets out of a delimited file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetsOptions {
    /// Zero-based column holding the hostname or URL (default: 1)
    pub column: usize,
    /// Skip the first non-blank row (default: true)
    pub has_header: bool,
}

impl Default for TargetsOptions {
    fn default() -> Self {
        Self {
            column: 1,
            has_header: true,
        }
    }
}

/// Errors reading a target list
#[derive(Debug, Error)]
pub enum TargetsError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line} has no column {column}")]
    MissingColumn { line: usize, column: usize },

    #[error("Line {line} has an unterminated quoted field")]
    UnterminatedQuote { line: usize },
}

/// Load targets from the file at `path`
pub fn load_targets(
    path: impl AsRef<Path>,
    options: &TargetsOptions,
) -> Result<Vec<String>, TargetsError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| TargetsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let targets = parse_targets(&contents, options)?;
    info!("Loaded {} targets from {}", targets.len(), path.display());
    Ok(targets)
}

/// Parse targets from delimited text
///
/// Blank lines are ignored, values are trimmed and empty values skipped.
pub fn parse_targets(contents: &str, options: &TargetsOptions) -> Result<Vec<String>, TargetsError> {
    let mut targets = Vec::new();
    let mut header_pending = options.has_header;

    for (index, line) in contents.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_fields(line, line_number)?;
        if header_pending {
            header_pending = false;
            debug!("Skipping header row: {:?}", fields);
            continue;
        }

        let value = fields
            .get(options.column)
            .ok_or(TargetsError::MissingColumn {
                line: line_number,
                column: options.column,
            })?
            .trim();

        if !value.is_empty() {
            targets.push(value.to_string());
        }
    }

    Ok(targets)
}

/// Split one line on commas, honouring double quotes and `""` escapes
fn split_fields(line: &str, line_number: usize) -> Result<Vec<String>, TargetsError> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(TargetsError::UnterminatedQuote { line: line_number });
    }
    fields.push(current);
    Ok(fields)
}
