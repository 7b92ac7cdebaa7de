// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Payload to searchable text
//!
//! The pipeline treats conversion as opaque: anything implementing
//! [`TextExtractor`] can be plugged in. [`HtmlTextExtractor`] is the default.

use scraper::{ElementRef, Html};

use super::types::TransformError;

/// Converts a fetched payload into plain text
pub trait TextExtractor: Send + Sync {
    fn extract(&self, payload: &[u8]) -> Result<String, TransformError>;
}

/// Elements whose contents are never rendered as text
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "svg"];

/// Extracts all visible text from an HTML document
///
/// Unlike a reader-mode extractor this keeps the whole document (navigation,
/// footers, title) so no occurrence of the term is hidden.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTextExtractor;

impl TextExtractor for HtmlTextExtractor {
    fn extract(&self, payload: &[u8]) -> Result<String, TransformError> {
        let html = std::str::from_utf8(payload)
            .map_err(|e| TransformError::new(format!("payload is not valid UTF-8: {}", e)))?;

        let document = Html::parse_document(html);
        let mut fragments = Vec::new();
        collect_text(document.root_element(), &mut fragments);

        Ok(clean_text(&fragments.join(" ")))
    }
}

/// Walk `element` depth-first, skipping non-rendered subtrees
fn collect_text<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push(&**text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !SKIPPED_ELEMENTS.contains(&child_element.value().name()) {
                collect_text(child_element, out);
            }
        }
    }
}

/// Normalize whitespace
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
