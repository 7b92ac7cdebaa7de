// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Single-step fallback for targets whose primary fetch fails

use url::{Host, Url};

/// Produces the alternate form of a target for the one retry a unit makes
pub trait FallbackPolicy: Send + Sync {
    /// Alternate identifier, or `None` when there is nothing different to try
    fn alternate(&self, target: &str) -> Option<String>;

    /// Policy name for logging
    fn name(&self) -> &'static str;
}

/// Retry against the `www.` host
///
/// `example.com` becomes `www.example.com`; `https://example.com/a` becomes
/// `https://www.example.com/a`. Hosts already starting with `www.` and IP
/// literals in URLs have no alternate.
#[derive(Debug, Clone, Copy, Default)]
pub struct WwwPrefix;

impl FallbackPolicy for WwwPrefix {
    fn alternate(&self, target: &str) -> Option<String> {
        if !target.contains("://") {
            if target.starts_with("www.") {
                return None;
            }
            return Some(format!("www.{}", target));
        }

        let mut url = Url::parse(target).ok()?;
        let host = match url.host() {
            Some(Host::Domain(domain)) if !domain.starts_with("www.") => domain.to_string(),
            _ => return None,
        };
        url.set_host(Some(&format!("www.{}", host))).ok()?;
        Some(url.to_string())
    }

    fn name(&self) -> &'static str {
        "www-prefix"
    }
}

/// Never retry
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl FallbackPolicy for NoFallback {
    fn alternate(&self, _target: &str) -> Option<String> {
        None
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
