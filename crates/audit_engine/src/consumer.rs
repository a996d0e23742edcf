use audit_logging::{audit_debug, audit_warn};

use crate::{parse_line, ChunkDecoder, LineFramer, ParseFailure, StreamEvent};

/// Non-fatal problem noticed while consuming the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A line was skipped.
    Parse { line: String, failure: ParseFailure },
    /// Invalid or truncated UTF-8 was replaced.
    Decode { at_end: bool },
}

/// Bytes in, events out: `ChunkDecoder -> LineFramer -> parse_line`.
///
/// Events come back in arrival order, terminal or not; deciding which one
/// counts is left to [`crate::ResultAssembler`].
#[derive(Default)]
pub struct StreamConsumer {
    decoder: ChunkDecoder,
    framer: LineFramer,
    diagnostics: Vec<Diagnostic>,
    lines: usize,
}

impl StreamConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let anomalies = self.decoder.anomalies();
        let text = self.decoder.decode(chunk);
        if self.decoder.anomalies() > anomalies {
            self.diagnostics.push(Diagnostic::Decode { at_end: false });
        }
        let lines = self.framer.push(&text);
        self.parse_all(lines)
    }

    /// Flushes the decoder and framer at end of input.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let anomalies = self.decoder.anomalies();
        let text = self.decoder.finish();
        if self.decoder.anomalies() > anomalies {
            self.diagnostics.push(Diagnostic::Decode { at_end: true });
        }
        let mut lines = self.framer.push(&text);
        lines.extend(self.framer.finish());
        self.parse_all(lines)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Frames seen so far, including skipped ones.
    pub fn lines(&self) -> usize {
        self.lines
    }

    fn parse_all(&mut self, lines: Vec<String>) -> Vec<StreamEvent> {
        let mut events = Vec::with_capacity(lines.len());
        for line in lines {
            self.lines += 1;
            match parse_line(&line) {
                Ok(event) => {
                    audit_debug!("Stream line #{} parsed: terminal={}", self.lines, event.is_terminal());
                    events.push(event);
                }
                Err(failure) => {
                    audit_warn!("Skipping stream line #{}: {}", self.lines, failure);
                    self.diagnostics.push(Diagnostic::Parse { line, failure });
                }
            }
        }
        events
    }
}
