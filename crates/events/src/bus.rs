//! Event bus abstraction (validation + delivery collaborator).
//!
//! The gateway never validates or produces events itself. It hands a batch to
//! an [`EventBus`] and gets back a [`ProcessingResult`] that says, per event,
//! whether it was accepted, rejected as invalid, or failed operationally.
//!
//! ## Two kinds of failure
//!
//! - **Per-event failures** are data. They come back inside `ProcessingResult`
//!   (`invalid` / `error`) and are never returned as `Err`.
//! - **Call-level failures** (the bus could not process the batch at all) are
//!   returned as [`BusError`]. The gateway does not classify those; they go to
//!   its generic failure path.
//!
//! ## Contract
//!
//! Implementations must uphold the result invariant: every input event appears
//! in exactly one of `success`, `invalid`, `error`, and input order is preserved
//! within each list. The gateway trusts this and never recomputes it.
//!
//! ## Thread Safety
//!
//! The trait requires `Send + Sync`. One bus instance is shared by every
//! request, so overlapping `process` calls must be safe.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use eventgate_core::{Event, ProcessingResult};

/// A `process` call failed as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// The bus (or its backend) is not accepting work.
    #[error("event bus unavailable: {0}")]
    Unavailable(String),

    /// The batch could not be handed to the backend.
    #[error("event bus transport error: {0}")]
    Transport(String),
}

impl BusError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

/// Validates and delivers batches of events.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn process(&self, events: Vec<Event>) -> Result<ProcessingResult, BusError>;
}

#[async_trait]
impl<B> EventBus for Arc<B>
where
    B: EventBus + ?Sized,
{
    async fn process(&self, events: Vec<Event>) -> Result<ProcessingResult, BusError> {
        (**self).process(events).await
    }
}
