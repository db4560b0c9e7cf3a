//! Single-write response handoff between the handler and its processing task.

use axum::response::Response;
use tokio::sync::oneshot;

/// The write end of a request's response.
///
/// Owned by the processing task. The first [`commit`](Self::commit) is
/// terminal: later commits are refused, which is how a hasty 204 keeps the
/// real outcome from being written a second time.
pub struct ResponseSlot {
    tx: Option<oneshot::Sender<Response>>,
}

impl std::fmt::Debug for ResponseSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseSlot")
            .field("committed", &self.is_committed())
            .finish()
    }
}

/// The read end, awaited by the HTTP handler.
pub type PendingResponse = oneshot::Receiver<Response>;

impl ResponseSlot {
    pub fn new() -> (Self, PendingResponse) {
        let (tx, rx) = oneshot::channel();
        (Self { tx: Some(tx) }, rx)
    }

    pub fn is_committed(&self) -> bool {
        self.tx.is_none()
    }

    /// Write `response`; returns `false` if a response was already committed.
    ///
    /// A client that went away still counts as committed.
    pub fn commit(&mut self, response: Response) -> bool {
        match self.tx.take() {
            Some(tx) => {
                let _ = tx.send(response);
                true
            }
            None => false,
        }
    }
}
