use crate::{ScanRequest, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartScan {
        session: SessionId,
        request: ScanRequest,
    },
    /// Abandon an in-flight session: abort reads and drop pending timers.
    CancelScan { session: SessionId },
}
