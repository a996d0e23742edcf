/// Splits decoded text into newline-delimited frames.
///
/// Only the text after the last newline is buffered between pushes.
#[derive(Debug, Default)]
pub struct LineFramer {
    pending: String,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `text` and returns every line it completed, in order.
    /// Whitespace-only lines are dropped; a trailing `\r` is stripped.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.pending.push_str(text);
        let Some(last_newline) = self.pending.rfind('\n') else {
            return Vec::new();
        };

        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);
        complete
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty())
            .map(ToOwned::to_owned)
            .collect()
    }

    /// Releases the unterminated tail at end of input, if it holds anything.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        let rest = rest.strip_suffix('\r').unwrap_or(&rest);
        if rest.trim().is_empty() {
            None
        } else {
            Some(rest.to_string())
        }
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }
}
