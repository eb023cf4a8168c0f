//! Cancellation plumbing for a bulk ingestion call.
//!
//! One cancellation pair is scoped to one ingestion operation. Raising the
//! flag stops new batch submissions and new retries promptly; in-flight
//! requests complete naturally and their outcomes are still reported.

use tokio::sync::watch;

/// Handle used to cancel an in-progress ingestion operation.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Raise the cancellation flag.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Signal observed by batch workers before issuing new work.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// A signal that can never be cancelled.
    pub fn none() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }
}

/// Create a linked cancellation handle and signal for one ingestion call.
pub fn cancellation() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}
