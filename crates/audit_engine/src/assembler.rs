use audit_core::{AnalysisResult, ScanError};

use crate::StreamEvent;

/// Message of the failure raised when input ends without a terminal event.
pub const PREMATURE_END: &str = "stream ended without a result";

/// What happened to an observed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// A log event to forward to progress tracking.
    Progress { step: String, message: String },
    /// The event settled the session.
    Settled,
    /// The session was already settled; the event was dropped.
    Ignored,
}

/// Turns stream events into the single outcome of a session.
///
/// The first terminal event wins; everything after it is ignored.
#[derive(Debug, Default)]
pub struct ResultAssembler {
    outcome: Option<Result<AnalysisResult, ScanError>>,
    ignored: usize,
}

impl ResultAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, event: StreamEvent) -> Disposition {
        if self.outcome.is_some() {
            self.ignored += 1;
            return Disposition::Ignored;
        }
        match event {
            StreamEvent::Log { step, message } => Disposition::Progress { step, message },
            StreamEvent::Complete { result } => {
                self.outcome = Some(Ok(result));
                Disposition::Settled
            }
            StreamEvent::Error { message } => {
                self.outcome = Some(Err(ScanError::Upstream(message)));
                Disposition::Settled
            }
        }
    }

    /// Settles with an outcome produced outside the stream (blocking call,
    /// transport failure). Returns false if already settled.
    pub fn settle(&mut self, outcome: Result<AnalysisResult, ScanError>) -> bool {
        if self.outcome.is_some() {
            self.ignored += 1;
            return false;
        }
        self.outcome = Some(outcome);
        true
    }

    pub fn is_settled(&self) -> bool {
        self.outcome.is_some()
    }

    /// Events dropped after settlement.
    pub fn ignored(&self) -> usize {
        self.ignored
    }

    /// Resolves the session. No terminal event means a protocol failure.
    pub fn finish(self) -> Result<AnalysisResult, ScanError> {
        self.outcome
            .unwrap_or_else(|| Err(ScanError::Protocol(PREMATURE_END.to_string())))
    }
}
