use crate::view_model::{AppViewModel, StepRowView};
use crate::{AnalysisResult, ProgressTracker, ScanError, SessionId};

/// Checklist shown while a scan runs, in display order.
pub const STEP_IDS: [&str; STEP_COUNT] = ["seo", "security", "tech", "links"];

const STEP_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewPhase {
    #[default]
    Idle,
    Loading,
    Results,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    last_session: SessionId,
    active: Option<SessionId>,
    phase: ViewPhase,
    steps: [StepStatus; STEP_COUNT],
    progress: ProgressTracker,
    result: Option<AnalysisResult>,
    error: Option<String>,
    quota_reached: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            session: self.active,
            steps: STEP_IDS
                .iter()
                .zip(self.steps.iter())
                .map(|(id, status)| StepRowView {
                    id: *id,
                    status: *status,
                })
                .collect(),
            logs: self.progress.messages().to_vec(),
            current_step: self.progress.current_step().map(ToOwned::to_owned),
            result: self.result.clone(),
            error: self.error.clone(),
            quota_reached: self.quota_reached,
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    /// Session whose events are currently accepted.
    pub fn active_session(&self) -> Option<SessionId> {
        self.active
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn start_session(&mut self) -> SessionId {
        self.last_session += 1;
        self.active = Some(self.last_session);
        self.phase = ViewPhase::Loading;
        self.steps = Default::default();
        self.progress = ProgressTracker::new();
        self.result = None;
        self.error = None;
        self.quota_reached = false;
        self.dirty = true;
        self.last_session
    }

    pub(crate) fn is_live(&self, session: SessionId) -> bool {
        self.active == Some(session) && self.phase == ViewPhase::Loading
    }

    pub(crate) fn apply_progress(&mut self, step: String, message: String) {
        if let Some(index) = STEP_IDS.iter().position(|id| *id == step) {
            self.steps[index] = StepStatus::Completed;
            if let Some(next) = self.steps.get_mut(index + 1) {
                if *next == StepStatus::Pending {
                    *next = StepStatus::Running;
                }
            }
        }
        self.progress.append(step, message);
        self.dirty = true;
    }

    pub(crate) fn apply_success(&mut self, result: AnalysisResult) {
        self.steps = [StepStatus::Completed; STEP_COUNT];
        self.result = Some(result);
        self.phase = ViewPhase::Results;
        self.dirty = true;
    }

    pub(crate) fn apply_failure(&mut self, error: &ScanError) {
        if error.is_quota_exceeded() {
            self.reset();
            self.quota_reached = true;
            return;
        }
        self.steps = [StepStatus::Error; STEP_COUNT];
        self.error = Some(error.user_message());
        self.phase = ViewPhase::Error;
        self.dirty = true;
    }

    pub(crate) fn dismiss_quota(&mut self) {
        if self.quota_reached {
            self.quota_reached = false;
            self.dirty = true;
        }
    }

    /// Back to idle. The session id is retired so late events are dropped.
    pub(crate) fn reset(&mut self) {
        self.active = None;
        self.phase = ViewPhase::Idle;
        self.steps = Default::default();
        self.progress = ProgressTracker::new();
        self.result = None;
        self.error = None;
        self.dirty = true;
    }
}
