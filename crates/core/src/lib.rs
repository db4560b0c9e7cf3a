//! `eventgate-core` — data model shared by the gateway pipeline.
//!
//! This crate contains **pure data** (no IO, no async): inbound events,
//! per-event failure causes and the categorized result a bus hands back.

pub mod event;
pub mod id;
pub mod result;

pub use event::{Event, META_FIELDS};
pub use id::RequestId;
pub use result::{FailureCause, ProcessingResult, ResultItem};
