use std::sync::mpsc;

use audit_core::{
    AnalysisResult, ProgressTracker, ScanError, ScanRequest, Session, SessionId, Timeline,
};
use audit_logging::{audit_info, audit_warn};
use tokio_util::sync::CancellationToken;

use crate::{Diagnostic, EngineEvent, ScanStrategy, Transport};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Runs one scan from request to a single settled outcome.
///
/// Owns the session's progress; nothing is shared with other sessions.
pub struct ScanSession {
    session: Session,
    diagnostics: Vec<Diagnostic>,
    cancel: CancellationToken,
}

impl ScanSession {
    pub fn new(id: SessionId, request: ScanRequest) -> Self {
        Self {
            session: Session::new(id, request),
            diagnostics: Vec::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Cancelling the returned token aborts the session.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn progress(&self) -> &ProgressTracker {
        self.session.progress()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drives the scan. `Finished` is emitted exactly once, even when a
    /// second call finds the session already used.
    pub async fn run(
        &mut self,
        transport: &dyn Transport,
        timeline: &Timeline,
        sink: &dyn ProgressSink,
    ) -> Result<AnalysisResult, ScanError> {
        if !self.session.begin_request() {
            audit_warn!("Session {} was already started", self.session.id());
            return match self.session.outcome() {
                Some(outcome) => outcome.clone(),
                None => Err(ScanError::Protocol("session already started".to_string())),
            };
        }

        let id = self.session.id();
        let request = self.session.request().clone();
        let strategy = ScanStrategy::select(&request, timeline);
        audit_info!("Session {} started: {} ({:?})", id, request.url, request.mode());

        let cancel = self.cancel.clone();
        let mut ctx = SessionContext {
            session: &mut self.session,
            diagnostics: &mut self.diagnostics,
            sink,
        };
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ScanError::Cancelled),
            outcome = strategy.run(transport, &request, &mut ctx) => outcome,
        };

        self.session.settle(outcome.clone());
        match &outcome {
            Ok(_) => audit_info!(
                "Session {} completed after {} progress messages",
                id,
                self.session.progress().len()
            ),
            Err(err) => audit_warn!("Session {} failed: {}", id, err),
        }
        sink.emit(EngineEvent::Finished {
            session: id,
            result: outcome.clone(),
        });
        outcome
    }
}

/// Progress/diagnostic access handed to a running strategy.
pub(crate) struct SessionContext<'a> {
    session: &'a mut Session,
    diagnostics: &'a mut Vec<Diagnostic>,
    sink: &'a dyn ProgressSink,
}

impl SessionContext<'_> {
    pub(crate) fn begin_streaming(&mut self) {
        self.session.begin_streaming();
    }

    pub(crate) fn begin_awaiting(&mut self) {
        self.session.begin_awaiting();
    }

    pub(crate) fn report(&mut self, step: String, message: String, synthesized: bool) {
        if !self.session.record_progress(step.as_str(), message.as_str()) {
            return;
        }
        self.sink.emit(EngineEvent::Progress {
            session: self.session.id(),
            step,
            message,
            synthesized,
        });
    }

    pub(crate) fn record_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }
}
