use crate::{AnalysisResult, ScanError, ScanRequest, SessionId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User submitted a target (and optional comparator) for scanning.
    ScanSubmitted(ScanRequest),
    /// Engine progress for a session.
    Progress {
        session: SessionId,
        step: String,
        message: String,
    },
    /// Engine settled a session.
    ScanFinished {
        session: SessionId,
        result: Result<AnalysisResult, ScanError>,
    },
    /// User left the result or error screen.
    BackClicked,
    /// User closed the quota notice.
    QuotaDialogDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}
