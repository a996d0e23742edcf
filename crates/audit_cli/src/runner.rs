use std::io::Write;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use anyhow::bail;

use audit_core::{update, AppState, Effect, Msg, ScanRequest, ViewPhase};
use audit_engine::{EngineEvent, EngineHandle};
use audit_logging::{audit_debug, audit_info};

use crate::render::Renderer;

const POLL_INTERVAL: Duration = Duration::from_millis(75);

/// Submits one scan and pumps engine events through `update` until it settles.
pub(crate) fn run_scan(
    engine: &EngineHandle,
    request: ScanRequest,
    out: &mut impl Write,
    json: bool,
) -> anyhow::Result<AppState> {
    let mut renderer = Renderer::new(json);
    let (mut state, effects) = update(AppState::new(), Msg::ScanSubmitted(request));
    apply_effects(engine, effects);

    while state.phase() == ViewPhase::Loading {
        let Some(event) = next_event(engine.recv_timeout(POLL_INTERVAL))? else {
            continue;
        };
        let (next, effects) = update(state, map_event(event));
        state = next;
        apply_effects(engine, effects);
        if state.consume_dirty() {
            renderer.render(&state.view(), out)?;
        }
    }
    Ok(state)
}

fn next_event(
    received: Result<EngineEvent, RecvTimeoutError>,
) -> anyhow::Result<Option<EngineEvent>> {
    match received {
        Ok(event) => Ok(Some(event)),
        Err(RecvTimeoutError::Timeout) => Ok(None),
        Err(RecvTimeoutError::Disconnected) => bail!("scan engine stopped before the scan settled"),
    }
}

fn apply_effects(engine: &EngineHandle, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::StartScan { session, request } => {
                audit_info!("StartScan session={} url={}", session, request.url);
                engine.start(session, request);
            }
            Effect::CancelScan { session } => {
                audit_info!("CancelScan session={}", session);
                engine.cancel(session);
            }
        }
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress {
            session,
            step,
            message,
            synthesized,
        } => {
            audit_debug!("Progress session={} step={} synthesized={}", session, step, synthesized);
            Msg::Progress {
                session,
                step,
                message,
            }
        }
        EngineEvent::Finished { session, result } => Msg::ScanFinished { session, result },
    }
}
