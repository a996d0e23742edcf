//! Audit core: pure session state, progress tracking and view-model helpers.
mod effect;
mod error;
mod msg;
mod progress;
mod request;
mod result;
mod session;
mod state;
mod timeline;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::ScanError;
pub use msg::Msg;
pub use progress::ProgressTracker;
pub use request::{ScanMode, ScanRequest, DEFAULT_LANG};
pub use result::{AnalysisResult, Winner};
pub use session::{Session, SessionId, SessionPhase, SessionStatus, INIT_STEP};
pub use state::{AppState, StepStatus, ViewPhase, STEP_IDS};
pub use timeline::{SynthesizedStep, Timeline};
pub use update::update;
pub use view_model::{AppViewModel, StepRowView};
