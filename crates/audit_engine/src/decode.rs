use audit_logging::audit_warn;
use encoding_rs::{CoderResult, Decoder, UTF_8};

/// Incremental UTF-8 decoder for transport chunks.
///
/// A multi-byte sequence split across chunks is held back until the rest
/// arrives. Malformed or truncated input is replaced with U+FFFD and counted
/// as an anomaly rather than failing the stream.
pub struct ChunkDecoder {
    decoder: Decoder,
    anomalies: usize,
    finished: bool,
}

impl ChunkDecoder {
    pub fn new() -> Self {
        Self {
            decoder: UTF_8.new_decoder(),
            anomalies: 0,
            finished: false,
        }
    }

    /// Decodes one chunk, keeping any trailing partial sequence for the next call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.run(chunk, false)
    }

    /// Flushes leftover bytes at end of input. Further calls yield nothing.
    pub fn finish(&mut self) -> String {
        self.run(&[], true)
    }

    /// Number of chunks (or the final flush) that needed replacement characters.
    pub fn anomalies(&self) -> usize {
        self.anomalies
    }

    fn run(&mut self, mut src: &[u8], last: bool) -> String {
        if self.finished {
            return String::new();
        }
        self.finished = last;

        let mut out = String::new();
        let mut replaced = false;
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(src.len())
                .unwrap_or(src.len().saturating_mul(3) + 4);
            out.reserve(needed);
            let (result, read, had_replacements) = self.decoder.decode_to_string(src, &mut out, last);
            replaced |= had_replacements;
            src = &src[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }

        if replaced {
            self.anomalies += 1;
            if last {
                audit_warn!("Stream ended inside a multi-byte sequence; flushed with replacement");
            } else {
                audit_warn!("Invalid UTF-8 in stream chunk; replaced");
            }
        }
        out
    }
}

impl Default for ChunkDecoder {
    fn default() -> Self {
        Self::new()
    }
}
