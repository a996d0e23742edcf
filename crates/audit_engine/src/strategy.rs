use std::convert::Infallible;

use audit_core::{AnalysisResult, ScanError, ScanMode, ScanRequest, Timeline};
use audit_logging::{audit_debug, audit_info};
use futures_util::StreamExt;
use tokio::time::Instant;

use crate::session::SessionContext;
use crate::{Disposition, ResultAssembler, StreamConsumer, Transport};

/// How a session obtains progress and its result.
///
/// Both variants report progress through the same context and resolve to a
/// single outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStrategy {
    /// Real server progress from the JSON Lines stream.
    Stream,
    /// One blocking call with a client-side timeline played meanwhile.
    Synthesized(Timeline),
}

impl ScanStrategy {
    pub fn select(request: &ScanRequest, timeline: &Timeline) -> Self {
        match request.mode() {
            ScanMode::Stream => ScanStrategy::Stream,
            ScanMode::Comparative => ScanStrategy::Synthesized(timeline.clone()),
        }
    }

    pub(crate) async fn run(
        &self,
        transport: &dyn Transport,
        request: &ScanRequest,
        ctx: &mut SessionContext<'_>,
    ) -> Result<AnalysisResult, ScanError> {
        match self {
            ScanStrategy::Stream => run_stream(transport, request, ctx).await,
            ScanStrategy::Synthesized(timeline) => {
                run_synthesized(transport, request, timeline, ctx).await
            }
        }
    }
}

async fn run_stream(
    transport: &dyn Transport,
    request: &ScanRequest,
    ctx: &mut SessionContext<'_>,
) -> Result<AnalysisResult, ScanError> {
    let mut body = transport.open_stream(request).await?;
    ctx.begin_streaming();

    let mut consumer = StreamConsumer::new();
    let mut assembler = ResultAssembler::new();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        let events = consumer.feed(&chunk);
        ctx.record_diagnostics(consumer.take_diagnostics());
        for event in events {
            if let Disposition::Progress { step, message } = assembler.observe(event) {
                ctx.report(step, message, false);
            }
        }
        if assembler.is_settled() {
            audit_debug!("Terminal event after {} lines; closing stream", consumer.lines());
            return assembler.finish();
        }
    }

    let events = consumer.finish();
    ctx.record_diagnostics(consumer.take_diagnostics());
    for event in events {
        if let Disposition::Progress { step, message } = assembler.observe(event) {
            ctx.report(step, message, false);
        }
    }
    assembler.finish()
}

async fn run_synthesized(
    transport: &dyn Transport,
    request: &ScanRequest,
    timeline: &Timeline,
    ctx: &mut SessionContext<'_>,
) -> Result<AnalysisResult, ScanError> {
    ctx.begin_awaiting();
    let mut assembler = ResultAssembler::new();

    // Dropping the timeline future when the call settles cancels every pending timer.
    let outcome = tokio::select! {
        biased;
        outcome = transport.compare(request) => outcome,
        never = play_timeline(timeline, ctx) => match never {},
    };
    assembler.settle(outcome);
    assembler.finish()
}

async fn play_timeline(timeline: &Timeline, ctx: &mut SessionContext<'_>) -> Infallible {
    let started = Instant::now();
    for entry in timeline.steps() {
        tokio::time::sleep_until(started + entry.delay).await;
        ctx.report(entry.step.clone(), entry.message.clone(), true);
    }
    audit_info!("Synthesized timeline exhausted; still waiting for the comparative response");
    std::future::pending().await
}
