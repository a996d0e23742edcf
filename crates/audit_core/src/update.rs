use crate::{AppState, Effect, Msg, ViewPhase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ScanSubmitted(request) => {
            if request.url.is_empty() {
                return (state, Vec::new());
            }
            let mut effects = Vec::with_capacity(2);
            // Only one session is live at a time; the previous one is abandoned.
            if let Some(previous) = state.active_session() {
                if state.phase() == ViewPhase::Loading {
                    effects.push(Effect::CancelScan { session: previous });
                }
            }
            let session = state.start_session();
            effects.push(Effect::StartScan { session, request });
            effects
        }
        Msg::Progress {
            session,
            step,
            message,
        } => {
            if state.is_live(session) {
                state.apply_progress(step, message);
            }
            Vec::new()
        }
        Msg::ScanFinished { session, result } => {
            if state.is_live(session) {
                match result {
                    Ok(result) => state.apply_success(result),
                    Err(err) => state.apply_failure(&err),
                }
            }
            Vec::new()
        }
        Msg::BackClicked => {
            let mut effects = Vec::new();
            if let Some(session) = state.active_session() {
                if state.phase() == ViewPhase::Loading {
                    effects.push(Effect::CancelScan { session });
                }
            }
            state.reset();
            effects
        }
        Msg::QuotaDialogDismissed => {
            state.dismiss_quota();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
