use crate::{AnalysisResult, ProgressTracker, ScanError, ScanRequest};

pub type SessionId = u64;

/// Step reported while the request is being opened.
pub const INIT_STEP: &str = "init";

/// Lifecycle of one scan.
///
/// `Idle -> Requesting -> {Streaming | AwaitingResponse} -> {Completed | Failed}`.
/// The last two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Requesting,
    Streaming,
    /// Blocking comparative call outstanding while synthesized progress plays.
    AwaitingResponse,
    Completed,
    Failed,
}

/// Coarse status exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Completed,
    Failed,
}

/// One scan invocation. Never resumed: a new scan gets a new `Session`.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: SessionId,
    request: ScanRequest,
    phase: SessionPhase,
    progress: ProgressTracker,
    outcome: Option<Result<AnalysisResult, ScanError>>,
}

impl Session {
    pub fn new(id: SessionId, request: ScanRequest) -> Self {
        Self {
            id,
            request,
            phase: SessionPhase::Idle,
            progress: ProgressTracker::new(),
            outcome: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn request(&self) -> &ScanRequest {
        &self.request
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn status(&self) -> SessionStatus {
        match self.phase {
            SessionPhase::Completed => SessionStatus::Completed,
            SessionPhase::Failed => SessionStatus::Failed,
            _ => SessionStatus::InProgress,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.phase, SessionPhase::Completed | SessionPhase::Failed)
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn outcome(&self) -> Option<&Result<AnalysisResult, ScanError>> {
        self.outcome.as_ref()
    }

    /// `Idle -> Requesting`. Returns false for any other starting phase.
    pub fn begin_request(&mut self) -> bool {
        if self.phase != SessionPhase::Idle {
            return false;
        }
        self.phase = SessionPhase::Requesting;
        self.progress.mark_step(INIT_STEP);
        true
    }

    /// `Requesting -> Streaming`.
    pub fn begin_streaming(&mut self) -> bool {
        self.advance_from_requesting(SessionPhase::Streaming)
    }

    /// `Requesting -> AwaitingResponse`.
    pub fn begin_awaiting(&mut self) -> bool {
        self.advance_from_requesting(SessionPhase::AwaitingResponse)
    }

    fn advance_from_requesting(&mut self, next: SessionPhase) -> bool {
        if self.phase != SessionPhase::Requesting {
            return false;
        }
        self.phase = next;
        true
    }

    /// Appends progress while the session is live; ignored once settled.
    pub fn record_progress(&mut self, step: impl Into<String>, message: impl Into<String>) -> bool {
        if self.is_settled() || self.phase == SessionPhase::Idle {
            return false;
        }
        self.progress.append(step, message);
        true
    }

    /// Settles the session. Only the first call has any effect.
    pub fn settle(&mut self, outcome: Result<AnalysisResult, ScanError>) -> bool {
        if self.is_settled() {
            return false;
        }
        self.phase = match outcome {
            Ok(_) => SessionPhase::Completed,
            Err(_) => SessionPhase::Failed,
        };
        self.outcome = Some(outcome);
        true
    }
}
