//! Categorized bus result -> one HTTP-level verdict.
//!
//! The decision table, evaluated top to bottom (first match wins):
//!
//! | condition              | verdict       | status | body               | level |
//! |------------------------|---------------|--------|--------------------|-------|
//! | no failures            | `Accepted`    | 204    | none               | debug |
//! | every event invalid    | `AllInvalid`  | 400    | `{invalid}`        | warn  |
//! | some events succeeded  | `MultiStatus` | 207    | `{invalid, error}` | warn  |
//! | otherwise              | `Failed`      | 500    | `{invalid, error}` | error |
//!
//! The last row is reached only when every event failed and at least one
//! failure was operational. A batch of zero events never gets here: the
//! normalizer rejects empty bodies first.

use serde_json::{json, Value};

use eventgate_core::ProcessingResult;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Warn,
    Error,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    AllInvalid,
    MultiStatus,
    Failed,
}

impl Verdict {
    pub fn http_status(&self) -> u16 {
        match self {
            Verdict::Accepted => 204,
            Verdict::AllInvalid => 400,
            Verdict::MultiStatus => 207,
            Verdict::Failed => 500,
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            Verdict::Accepted => LogLevel::Debug,
            Verdict::AllInvalid | Verdict::MultiStatus => LogLevel::Warn,
            Verdict::Failed => LogLevel::Error,
        }
    }
}

/// What the request should answer with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub verdict: Verdict,
    pub body: Option<Value>,
    pub log_level: LogLevel,
    /// Human-readable status line for logs.
    pub message: String,
}

impl Outcome {
    pub fn http_status(&self) -> u16 {
        self.verdict.http_status()
    }
}

/// Reduce a bus result for a batch of `total` events.
///
/// Counts are taken from `result` as-is; the bus owns the invariant that they
/// add up to `total`.
pub fn aggregate(total: usize, result: &ProcessingResult) -> Outcome {
    let success = result.success_count();
    let invalid = result.invalid_count();
    let error = result.error_count();
    let failure = result.failure_count();

    let (verdict, body, message) = if failure == 0 {
        (
            Verdict::Accepted,
            None,
            format!("All {success} out of {total} events were accepted."),
        )
    } else if invalid == total {
        (
            Verdict::AllInvalid,
            Some(json!({ "invalid": result.invalid })),
            format!("{invalid} out of {total} events were invalid and not accepted."),
        )
    } else if failure < total {
        (
            Verdict::MultiStatus,
            Some(json!({ "invalid": result.invalid, "error": result.error })),
            format!(
                "{success} out of {total} events were accepted, but {failure} failed \
                 ({invalid} invalid and {error} errored)."
            ),
        )
    } else {
        (
            Verdict::Failed,
            Some(json!({ "invalid": result.invalid, "error": result.error })),
            format!(
                "{failure} out of {total} events had failures and were not accepted. \
                 ({invalid} invalid and {error} errored)."
            ),
        )
    };

    Outcome {
        verdict,
        body,
        log_level: verdict.log_level(),
        message,
    }
}
