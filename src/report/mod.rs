// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tab-aligned result report
//!
//! Renders a [`ResultSet`] as three columns (`Site`, `Found`, `Error`) padded
//! with tabs to a tab stop of 4, so the file lines up in a text editor.

use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

use crate::scan::{ResultSet, ScanResult};

/// Tab stop the columns are aligned to
pub const TAB_WIDTH: usize = 4;

/// Placeholder written in the error column when a target was searched cleanly
pub const NO_ERROR: &str = "<nil>";

const HEADER: [&str; 3] = ["Site", "Found", "Error"];

/// Render the report text for `results`
pub fn render_report(results: &ResultSet) -> String {
    let rows: Vec<[String; 3]> = results.iter().map(row).collect();

    let site_width = column_width(
        rows.iter()
            .map(|r| r[0].as_str())
            .chain(std::iter::once(HEADER[0])),
    );
    let found_width = column_width(
        rows.iter()
            .map(|r| r[1].as_str())
            .chain(std::iter::once(HEADER[1])),
    );

    let mut out = String::new();
    push_line(&mut out, HEADER.map(String::from), site_width, found_width);
    for cells in rows {
        push_line(&mut out, cells, site_width, found_width);
    }
    out
}

/// Write the report to `path`, returning the number of bytes written
///
/// Each result is logged at `info` as it is rendered.
pub fn write_report(path: impl AsRef<Path>, results: &ResultSet) -> io::Result<usize> {
    let path = path.as_ref();

    for result in results {
        match &result.error {
            Some(error) => info!(
                "site:{} found:{} err:{}",
                result.target, result.found, error
            ),
            None => info!(
                "site:{} found:{} err:{}",
                result.target, result.found, NO_ERROR
            ),
        }
    }

    let contents = render_report(results);
    fs::write(path, contents.as_bytes())?;

    info!("{} bytes written to {}", contents.len(), path.display());
    Ok(contents.len())
}

fn row(result: &ScanResult) -> [String; 3] {
    let error = match &result.error {
        Some(error) => error.to_string(),
        None => NO_ERROR.to_string(),
    };
    [result.target.clone(), result.found.to_string(), error]
}

/// Smallest multiple of the tab stop leaving at least one tab after the widest cell
fn column_width<'a>(cells: impl Iterator<Item = &'a str>) -> usize {
    let widest = cells.map(|c| c.chars().count()).max().unwrap_or(0);
    (widest + 1).div_ceil(TAB_WIDTH) * TAB_WIDTH
}

fn push_line(out: &mut String, cells: [String; 3], site_width: usize, found_width: usize) {
    let [site, found, error] = cells;
    push_padded(out, &site, site_width);
    push_padded(out, &found, found_width);
    out.push_str(&error);
    out.push('\n');
}

fn push_padded(out: &mut String, cell: &str, width: usize) {
    let len = cell.chars().count();
    out.push_str(cell);
    let tabs = (width - len).div_ceil(TAB_WIDTH);
    out.extend(std::iter::repeat('\t').take(tabs));
}
