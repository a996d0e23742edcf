use crate::{AnalysisResult, SessionId, StepStatus, ViewPhase};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub phase: ViewPhase,
    pub session: Option<SessionId>,
    pub steps: Vec<StepRowView>,
    pub logs: Vec<String>,
    pub current_step: Option<String>,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
    pub quota_reached: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRowView {
    pub id: &'static str,
    pub status: StepStatus,
}
