mod common;

use std::time::Duration;

use audit_core::{AnalysisResult, ScanError, ScanRequest, SessionPhase, Timeline};
use audit_engine::{Diagnostic, EngineEvent, ScanSession, PREMATURE_END};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{init_logging, jsonl, FakeTransport, TestSink};

fn stream_session() -> ScanSession {
    ScanSession::new(1, ScanRequest::new("https://a.example"))
}

#[tokio::test]
async fn logs_then_complete_resolves_with_payload() {
    init_logging();
    let transport = FakeTransport::streaming(vec![jsonl(&[
        r#"{"type":"log","step":"seo","message":"a"}"#,
        r#"{"type":"log","step":"security","message":"b"}"#,
        r#"{"type":"complete","data":{"url":"x"}}"#,
    ])]);
    let sink = TestSink::new();
    let mut scan = stream_session();

    let result = scan.run(&transport, &Timeline::default(), &sink).await;

    assert_eq!(result, Ok(AnalysisResult::new(json!({"url": "x"}))));
    assert_eq!(scan.progress().messages(), ["a", "b"]);
    assert_eq!(scan.progress().current_step(), Some("security"));
    assert_eq!(scan.session().phase(), SessionPhase::Completed);
    assert_eq!(
        sink.take(),
        vec![
            EngineEvent::Progress {
                session: 1,
                step: "seo".into(),
                message: "a".into(),
                synthesized: false,
            },
            EngineEvent::Progress {
                session: 1,
                step: "security".into(),
                message: "b".into(),
                synthesized: false,
            },
            EngineEvent::Finished {
                session: 1,
                result: Ok(AnalysisResult::new(json!({"url": "x"}))),
            },
        ]
    );
}

#[tokio::test]
async fn error_event_fails_with_upstream_message() {
    init_logging();
    let transport =
        FakeTransport::streaming(vec![jsonl(&[r#"{"type":"error","message":"boom"}"#])]);
    let sink = TestSink::new();
    let mut scan = stream_session();

    let result = scan.run(&transport, &Timeline::default(), &sink).await;

    assert_eq!(result, Err(ScanError::Upstream("boom".into())));
    assert!(scan.progress().is_empty());
    assert_eq!(scan.session().phase(), SessionPhase::Failed);
}

#[tokio::test]
async fn invalid_line_before_complete_still_succeeds() {
    init_logging();
    let transport = FakeTransport::streaming(vec![jsonl(&[
        "not json",
        r#"{"type":"complete","data":{"url":"x"}}"#,
    ])]);
    let sink = TestSink::new();
    let mut scan = stream_session();

    let result = scan.run(&transport, &Timeline::default(), &sink).await;

    assert!(result.is_ok());
    assert_eq!(scan.diagnostics().len(), 1);
    assert!(matches!(scan.diagnostics()[0], Diagnostic::Parse { .. }));
}

#[tokio::test]
async fn stream_without_terminal_event_is_protocol_failure() {
    init_logging();
    let transport = FakeTransport::streaming(vec![jsonl(&[
        r#"{"type":"log","step":"seo","message":"a"}"#,
    ])]);
    let sink = TestSink::new();
    let mut scan = stream_session();

    let result = scan.run(&transport, &Timeline::default(), &sink).await;

    assert_eq!(result, Err(ScanError::Protocol(PREMATURE_END.into())));
    assert_eq!(scan.progress().messages(), ["a"]);
}

#[tokio::test]
async fn events_after_terminal_are_ignored() {
    init_logging();
    let transport = FakeTransport::streaming(vec![
        jsonl(&[
            r#"{"type":"complete","data":{"url":"first"}}"#,
            r#"{"type":"log","step":"seo","message":"late"}"#,
        ]),
        jsonl(&[r#"{"type":"error","message":"too late"}"#]),
    ]);
    let sink = TestSink::new();
    let mut scan = stream_session();

    let result = scan.run(&transport, &Timeline::default(), &sink).await;

    assert_eq!(result, Ok(AnalysisResult::new(json!({"url": "first"}))));
    assert!(scan.progress().is_empty());
    let finished = sink
        .take()
        .into_iter()
        .filter(|event| matches!(event, EngineEvent::Finished { .. }))
        .count();
    assert_eq!(finished, 1);
}

#[tokio::test]
async fn chunk_boundaries_do_not_change_the_outcome() {
    init_logging();
    let body = jsonl(&[
        r#"{"type":"log","step":"seo","message":"résumé ✓"}"#,
        r#"{"type":"complete","data":{"url":"x"}}"#,
    ]);
    for size in [1, 2, 3, 5, 7, 64] {
        let chunks = body.chunks(size).map(<[u8]>::to_vec).collect();
        let transport = FakeTransport::streaming(chunks);
        let sink = TestSink::new();
        let mut scan = stream_session();

        let result = scan.run(&transport, &Timeline::default(), &sink).await;

        assert_eq!(result, Ok(AnalysisResult::new(json!({"url": "x"}))), "chunk size {size}");
        assert_eq!(scan.progress().messages(), ["résumé ✓"], "chunk size {size}");
    }
}

#[tokio::test]
async fn transport_failure_mid_stream_is_reported() {
    init_logging();
    let transport = FakeTransport::streaming_with_errors(vec![
        Ok(jsonl(&[r#"{"type":"log","step":"seo","message":"a"}"#])),
        Err(ScanError::Transport("connection reset".into())),
    ]);
    let sink = TestSink::new();
    let mut scan = stream_session();

    let result = scan.run(&transport, &Timeline::default(), &sink).await;

    assert_eq!(result, Err(ScanError::Transport("connection reset".into())));
    assert_eq!(scan.progress().messages(), ["a"]);
}

#[tokio::test]
async fn refused_request_fails_before_streaming() {
    init_logging();
    let transport = FakeTransport::refusing(ScanError::HttpStatus {
        status: 401,
        detail: "Not authenticated".into(),
    });
    let sink = TestSink::new();
    let mut scan = stream_session();

    let result = scan.run(&transport, &Timeline::default(), &sink).await;

    assert_eq!(
        result,
        Err(ScanError::HttpStatus {
            status: 401,
            detail: "Not authenticated".into()
        })
    );
    assert_eq!(scan.session().phase(), SessionPhase::Failed);
}

#[tokio::test]
async fn session_cannot_be_restarted() {
    init_logging();
    let transport =
        FakeTransport::streaming(vec![jsonl(&[r#"{"type":"error","message":"boom"}"#])]);
    let sink = TestSink::new();
    let mut scan = stream_session();

    let first = scan.run(&transport, &Timeline::default(), &sink).await;
    let second = scan.run(&transport, &Timeline::default(), &sink).await;

    assert_eq!(first, second);
    assert_eq!(sink.take().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancellation_settles_session_as_cancelled() {
    init_logging();
    let transport = FakeTransport::comparing(
        Duration::from_secs(60),
        Ok(AnalysisResult::new(json!({"url": "x"}))),
    );
    let sink = TestSink::new();
    let request = ScanRequest::new("https://a.example").with_competitor(Some("https://b.example"));
    let mut scan = ScanSession::new(4, request);
    let token = scan.cancel_token();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        token.cancel();
    });
    let result = scan.run(&transport, &Timeline::comparative(), &sink).await;

    assert_eq!(result, Err(ScanError::Cancelled));
    assert!(!*transport.compare_resolved.lock().unwrap());
    let before = scan.progress().len();
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(scan.progress().len(), before);
}
