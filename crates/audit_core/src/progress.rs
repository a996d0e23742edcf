/// Ordered progress log of a single session.
///
/// Messages are kept in arrival order with no deduplication and no cap.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressTracker {
    messages: Vec<String>,
    current_step: Option<String>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, step: impl Into<String>, message: impl Into<String>) {
        self.current_step = Some(step.into());
        self.messages.push(message.into());
    }

    /// Moves the current step without logging a message.
    pub fn mark_step(&mut self, step: impl Into<String>) {
        self.current_step = Some(step.into());
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn current_step(&self) -> Option<&str> {
        self.current_step.as_deref()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
