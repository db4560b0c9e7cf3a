//! Event bus seam plus the pipeline that runs around it.
//!
//! - `bus`: the collaborator contract (`EventBus`) and its call-level error
//! - `in_memory_bus`: reference bus for local runs and tests
//! - `normalize`: inbound payload -> batch
//! - `outcome`: categorized result -> HTTP verdict
//! - `error_event`: failed item -> error event
//! - `resubmit`: detached second pass to the error stream

pub mod bus;
pub mod error_event;
pub mod in_memory_bus;
pub mod normalize;
pub mod outcome;
pub mod resubmit;

pub use bus::{BusError, EventBus};
pub use error_event::{ErrorEvent, ErrorEventConfig, ErrorEventMapper, ErrorEventMeta, EMITTER_ID};
pub use in_memory_bus::InMemoryEventBus;
pub use normalize::{normalize, NormalizeError};
pub use outcome::{aggregate, LogLevel, Outcome, Verdict};
pub use resubmit::{ErrorResubmitter, ResubmissionOutcome, ResubmissionSummary};
