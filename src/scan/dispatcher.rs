// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Rendezvous work hand-off between the dispatcher and the units
//!
//! A unit announces it is idle by sending a one-shot slot on the ready
//! channel; the dispatcher only takes an item out of the work source once it
//! holds such a slot. Nothing is ever queued ahead of a waiting unit, so
//! in-flight work is bounded by the pool size.
//!
//! ```text
//! unit ──ready(slot)──► Dispatcher ──item via slot──► unit
//! ```
//!
//! Dropping the dispatcher closes the ready channel, which every unit
//! observes as "no more work".

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::types::WorkItem;

type Slot = oneshot::Sender<WorkItem>;

/// Create the hand-off for a pool of `units` workers
pub(crate) fn handoff(units: usize, cancel: CancellationToken) -> (Dispatcher, WorkReceiver) {
    // At most one outstanding readiness signal per unit
    let (ready_tx, ready_rx) = mpsc::channel(units.max(1));
    (
        Dispatcher {
            ready: ready_rx,
            cancel,
        },
        WorkReceiver { ready: ready_tx },
    )
}

/// Unit-side end of the hand-off
#[derive(Clone)]
pub(crate) struct WorkReceiver {
    ready: mpsc::Sender<Slot>,
}

impl WorkReceiver {
    /// Wait for the next item; `None` once the dispatcher is done
    pub async fn next(&self) -> Option<WorkItem> {
        let (slot, item) = oneshot::channel();
        self.ready.send(slot).await.ok()?;
        item.await.ok()
    }
}

/// Producer side: feeds items in work-source order
pub(crate) struct Dispatcher {
    ready: mpsc::Receiver<Slot>,
    cancel: CancellationToken,
}

impl Dispatcher {
    /// Hand every item to a ready unit, returning how many were handed off
    ///
    /// Stops early on cancellation or when every unit has gone away. The
    /// hand-off is closed when this returns.
    pub async fn dispatch(mut self, items: Vec<WorkItem>) -> usize {
        let total = items.len();
        let mut dispatched = 0;

        'items: for item in items {
            let mut item = item;
            loop {
                let slot = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        debug!("Dispatch cancelled after {} of {} items", dispatched, total);
                        break 'items;
                    }
                    slot = self.ready.recv() => match slot {
                        Some(slot) => slot,
                        None => {
                            warn!("All units exited with {} of {} items undispatched", total - dispatched, total);
                            break 'items;
                        }
                    },
                };

                debug!("sending target: {} (slot {})", item.target, item.slot);
                match slot.send(item) {
                    Ok(()) => {
                        dispatched += 1;
                        continue 'items;
                    }
                    // The unit stopped waiting; offer the item to the next one
                    Err(returned) => item = returned,
                }
            }
        }

        debug!("Dispatcher finished: {} of {} items handed off", dispatched, total);
        dispatched
    }
}
