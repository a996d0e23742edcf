#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use audit_core::{AnalysisResult, ScanError, ScanRequest};
use audit_engine::{ByteStream, EngineEvent, ProgressSink, Transport};
use bytes::Bytes;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(audit_logging::initialize_for_tests);
}

#[derive(Default, Clone)]
pub struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Progress { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// In-memory backend: replays fixed chunks, or answers the comparative call
/// after a delay.
pub struct FakeTransport {
    chunks: Vec<Result<Vec<u8>, ScanError>>,
    open_error: Option<ScanError>,
    compare_delay: Duration,
    compare_result: Result<AnalysisResult, ScanError>,
    /// Set once the comparative call resolves (delay elapsed).
    pub compare_resolved: Arc<Mutex<bool>>,
}

impl FakeTransport {
    pub fn streaming(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks: chunks.into_iter().map(Ok).collect(),
            open_error: None,
            compare_delay: Duration::ZERO,
            compare_result: Err(ScanError::Protocol("unexpected compare".into())),
            compare_resolved: Arc::default(),
        }
    }

    pub fn streaming_with_errors(chunks: Vec<Result<Vec<u8>, ScanError>>) -> Self {
        Self {
            chunks,
            ..Self::streaming(Vec::new())
        }
    }

    pub fn refusing(error: ScanError) -> Self {
        Self {
            open_error: Some(error),
            ..Self::streaming(Vec::new())
        }
    }

    pub fn comparing(delay: Duration, result: Result<AnalysisResult, ScanError>) -> Self {
        Self {
            compare_delay: delay,
            compare_result: result,
            ..Self::streaming(Vec::new())
        }
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn open_stream(&self, _request: &ScanRequest) -> Result<ByteStream, ScanError> {
        if let Some(err) = &self.open_error {
            return Err(err.clone());
        }
        let items: Vec<Result<Bytes, ScanError>> = self
            .chunks
            .iter()
            .cloned()
            .map(|chunk| chunk.map(Bytes::from))
            .collect();
        Ok(Box::pin(futures_util::stream::iter(items)))
    }

    async fn compare(&self, _request: &ScanRequest) -> Result<AnalysisResult, ScanError> {
        tokio::time::sleep(self.compare_delay).await;
        *self.compare_resolved.lock().unwrap() = true;
        self.compare_result.clone()
    }
}

pub fn jsonl(lines: &[&str]) -> Vec<u8> {
    let mut body = lines.join("\n");
    body.push('\n');
    body.into_bytes()
}
