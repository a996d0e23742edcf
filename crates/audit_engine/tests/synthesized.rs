mod common;

use std::time::Duration;

use audit_core::{
    AnalysisResult, ScanError, ScanRequest, SessionPhase, SynthesizedStep, Timeline, Winner,
};
use audit_engine::{EngineEvent, ScanSession, ScanStrategy};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{init_logging, FakeTransport, TestSink};

fn battle_request() -> ScanRequest {
    ScanRequest::new("https://a.example").with_competitor(Some("https://b.example"))
}

fn timeline() -> Timeline {
    let ms = Duration::from_millis;
    Timeline::new(vec![
        SynthesizedStep::new("seo", "one", ms(1_000)),
        SynthesizedStep::new("security", "two", ms(2_000)),
        SynthesizedStep::new("tech", "three", ms(3_000)),
    ])
}

fn battle_result() -> AnalysisResult {
    AnalysisResult::new(json!({
        "url": "https://a.example",
        "competitor": {"url": "https://b.example"},
        "winner": "target"
    }))
}

#[test]
fn strategy_follows_presence_of_competitor() {
    let timeline = timeline();
    assert_eq!(
        ScanStrategy::select(&ScanRequest::new("https://a.example"), &timeline),
        ScanStrategy::Stream
    );
    assert_eq!(
        ScanStrategy::select(&battle_request(), &timeline),
        ScanStrategy::Synthesized(timeline.clone())
    );
}

#[tokio::test(start_paused = true)]
async fn fast_response_appends_no_synthesized_messages() {
    init_logging();
    let transport = FakeTransport::comparing(Duration::from_millis(500), Ok(battle_result()));
    let sink = TestSink::new();
    let mut scan = ScanSession::new(1, battle_request());

    let result = scan.run(&transport, &timeline(), &sink).await;

    assert_eq!(result.as_ref().map(AnalysisResult::winner), Ok(Some(Winner::Target)));
    assert!(scan.progress().is_empty());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(scan.progress().is_empty());
    assert!(sink.messages().is_empty());
}

#[tokio::test(start_paused = true)]
async fn timeline_plays_until_the_call_settles() {
    init_logging();
    let transport = FakeTransport::comparing(Duration::from_millis(2_500), Ok(battle_result()));
    let sink = TestSink::new();
    let mut scan = ScanSession::new(2, battle_request());

    let result = scan.run(&transport, &timeline(), &sink).await;
    assert_eq!(result, Ok(battle_result()));
    assert_eq!(scan.progress().messages(), ["one", "two"]);
    assert_eq!(scan.progress().current_step(), Some("security"));
    assert_eq!(scan.session().phase(), SessionPhase::Completed);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(scan.progress().messages(), ["one", "two"]);

    let events = sink.take();
    assert!(events.iter().all(|event| match event {
        EngineEvent::Progress { synthesized, .. } => *synthesized,
        EngineEvent::Finished { .. } => true,
    }));
    assert!(matches!(events.last(), Some(EngineEvent::Finished { .. })));
}

#[tokio::test(start_paused = true)]
async fn exhausted_timeline_keeps_waiting_for_the_result() {
    init_logging();
    let transport = FakeTransport::comparing(Duration::from_secs(30), Ok(battle_result()));
    let sink = TestSink::new();
    let mut scan = ScanSession::new(3, battle_request());

    let result = scan.run(&transport, &timeline(), &sink).await;

    assert_eq!(result, Ok(battle_result()));
    assert_eq!(scan.progress().messages(), ["one", "two", "three"]);
}

#[tokio::test(start_paused = true)]
async fn failed_call_cancels_timers_and_reports_error() {
    init_logging();
    let transport = FakeTransport::comparing(
        Duration::from_millis(1_500),
        Err(ScanError::HttpStatus {
            status: 500,
            detail: "server error".into(),
        }),
    );
    let sink = TestSink::new();
    let mut scan = ScanSession::new(4, battle_request());

    let result = scan.run(&transport, &timeline(), &sink).await;

    assert_eq!(
        result,
        Err(ScanError::HttpStatus {
            status: 500,
            detail: "server error".into()
        })
    );
    assert_eq!(scan.progress().messages(), ["one"]);
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(sink.messages(), vec!["one".to_string()]);
}
