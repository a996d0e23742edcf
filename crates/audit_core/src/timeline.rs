use std::time::Duration;

/// One client-fabricated progress entry; `delay` is measured from the start
/// of the blocking call, not from the previous entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedStep {
    pub step: String,
    pub message: String,
    pub delay: Duration,
}

impl SynthesizedStep {
    pub fn new(step: impl Into<String>, message: impl Into<String>, delay: Duration) -> Self {
        Self {
            step: step.into(),
            message: message.into(),
            delay,
        }
    }
}

/// Fixed progress script played during a comparative scan.
///
/// It says nothing about real backend progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    steps: Vec<SynthesizedStep>,
}

impl Timeline {
    /// Entries are ordered by delay; equal delays keep their given order.
    pub fn new(mut steps: Vec<SynthesizedStep>) -> Self {
        steps.sort_by_key(|entry| entry.delay);
        Self { steps }
    }

    pub fn comparative() -> Self {
        let ms = Duration::from_millis;
        Self::new(vec![
            SynthesizedStep::new("init", "Starting comparative audit of both sites...", ms(400)),
            SynthesizedStep::new("seo", "Analyzing SEO signals on both sites...", ms(2_000)),
            SynthesizedStep::new("security", "Checking security headers and TLS...", ms(5_000)),
            SynthesizedStep::new("tech", "Detecting technology stacks...", ms(9_000)),
            SynthesizedStep::new("links", "Crawling pages for broken links...", ms(14_000)),
            SynthesizedStep::new("links", "Comparing results and picking a winner...", ms(20_000)),
        ])
    }

    pub fn steps(&self) -> &[SynthesizedStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::comparative()
    }
}
