use audit_core::{AnalysisResult, ScanError, SessionId};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Progress {
        session: SessionId,
        step: String,
        message: String,
        /// Fabricated client-side during a comparative scan.
        synthesized: bool,
    },
    /// Sent exactly once per session.
    Finished {
        session: SessionId,
        result: Result<AnalysisResult, ScanError>,
    },
}

impl EngineEvent {
    pub fn session(&self) -> SessionId {
        match self {
            EngineEvent::Progress { session, .. } | EngineEvent::Finished { session, .. } => {
                *session
            }
        }
    }
}
