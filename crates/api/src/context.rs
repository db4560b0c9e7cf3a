use eventgate_core::RequestId;

/// Per-request context handed to the processing task.
///
/// Immutable once built; the task owns it for the lifetime of the request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: RequestId,
    hasty: bool,
}

impl RequestContext {
    pub fn new(hasty: bool) -> Self {
        Self {
            request_id: RequestId::new(),
            hasty,
        }
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Acknowledge with 204 before the bus settles.
    pub fn is_hasty(&self) -> bool {
        self.hasty
    }
}
