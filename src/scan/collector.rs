// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Result collection
//!
//! Receives exactly one result per dispatched item, in whatever order units
//! finish.

use std::future::pending;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::types::Completed;

/// How collection ended, with everything gathered so far
#[derive(Debug)]
pub(crate) enum Collection {
    /// All expected results arrived
    Complete(Vec<Completed>),
    /// The collection deadline elapsed first
    DeadlineExceeded(Vec<Completed>),
    /// The cancellation token fired first
    Cancelled(Vec<Completed>),
    /// Every unit dropped its sender before all results arrived
    Starved(Vec<Completed>),
}

pub(crate) struct Collector {
    results: mpsc::Receiver<Completed>,
    expected: usize,
    deadline: Option<Duration>,
    cancel: CancellationToken,
}

impl Collector {
    pub fn new(
        results: mpsc::Receiver<Completed>,
        expected: usize,
        deadline: Option<Duration>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            results,
            expected,
            deadline,
            cancel,
        }
    }

    pub async fn collect(mut self) -> Collection {
        let mut gathered = Vec::with_capacity(self.expected);

        // A deadline too far out to represent never fires
        let deadline = self.deadline.and_then(|d| Instant::now().checked_add(d));
        let expiry = async move {
            match deadline {
                Some(at) => sleep_until(at).await,
                None => pending::<()>().await,
            }
        };
        tokio::pin!(expiry);

        while gathered.len() < self.expected {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!("Collection cancelled with {} of {} results", gathered.len(), self.expected);
                    return Collection::Cancelled(gathered);
                }
                _ = &mut expiry => {
                    warn!("Collection deadline exceeded with {} of {} results", gathered.len(), self.expected);
                    return Collection::DeadlineExceeded(gathered);
                }
                next = self.results.recv() => match next {
                    Some(completed) => {
                        debug!("receiving result: {}", completed.result.target);
                        gathered.push(completed);
                    }
                    None => return Collection::Starved(gathered),
                },
            }
        }

        Collection::Complete(gathered)
    }
}
