// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Worker pool lifecycle
//!
//! Starts a fixed number of units, each looping
//! `RUNNING -> (item -> process -> RUNNING) | (hand-off closed -> TERMINATED)`,
//! and waits for every one of them to exit.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::dispatcher::WorkReceiver;
use super::types::{Completed, ScanError};
use super::unit::ScanUnit;

/// A started pool of units
pub(crate) struct WorkerPool {
    workers: JoinSet<usize>,
    size: usize,
}

impl WorkerPool {
    /// Start exactly `size` units
    ///
    /// `results` is moved in; once every unit has exited the result channel
    /// closes.
    pub fn start(
        size: usize,
        unit: ScanUnit,
        term: Arc<str>,
        work: WorkReceiver,
        results: mpsc::Sender<Completed>,
        cancel: CancellationToken,
    ) -> Result<Self, ScanError> {
        if size == 0 {
            return Err(ScanError::lifecycle("cannot start a pool with zero units"));
        }

        info!("Starting {} scan units", size);

        let mut workers = JoinSet::new();
        for worker_id in 0..size {
            workers.spawn(worker_loop(
                worker_id,
                unit.clone(),
                term.clone(),
                work.clone(),
                results.clone(),
                cancel.clone(),
            ));
        }

        if workers.len() != size {
            workers.abort_all();
            return Err(ScanError::lifecycle(format!(
                "expected {} units, started {}",
                size,
                workers.len()
            )));
        }

        Ok(Self { workers, size })
    }

    /// Wait until every unit has terminated
    ///
    /// Returns the number of items processed, or a lifecycle error if any
    /// unit panicked.
    pub async fn join(mut self) -> Result<usize, ScanError> {
        let mut processed = 0;
        let mut failure = None;

        while let Some(joined) = self.workers.join_next().await {
            match joined {
                Ok(count) => processed += count,
                Err(e) => {
                    error!("Scan unit terminated abnormally: {}", e);
                    failure.get_or_insert_with(|| format!("scan unit terminated abnormally: {}", e));
                }
            }
        }

        match failure {
            Some(reason) => Err(ScanError::lifecycle(reason)),
            None => {
                debug!("All {} scan units terminated", self.size);
                Ok(processed)
            }
        }
    }
}

/// Main loop of one unit
///
/// Cancellation is observed while waiting for work and during I/O; a unit
/// that is cancelled mid-item abandons it without emitting a result.
async fn worker_loop(
    worker_id: usize,
    unit: ScanUnit,
    term: Arc<str>,
    work: WorkReceiver,
    results: mpsc::Sender<Completed>,
    cancel: CancellationToken,
) -> usize {
    debug!("Unit {} started", worker_id);
    let mut processed = 0;

    loop {
        let item = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = work.next() => match next {
                Some(item) => item,
                None => break,
            },
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Unit {} abandoned {}", worker_id, item.target);
                break;
            }
            result = unit.process(&item.target, &term) => result,
        };

        if results
            .send(Completed {
                slot: item.slot,
                result,
            })
            .await
            .is_err()
        {
            // Collector is gone; nothing left to report to
            break;
        }
        processed += 1;
    }

    debug!("Unit {} terminated after {} items", worker_id, processed);
    processed
}
