use serde::{Deserialize, Serialize};

/// Language code sent when the caller does not pick one.
pub const DEFAULT_LANG: &str = "en";

/// How a scan is carried out against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Single target; the backend streams progress as JSON Lines.
    Stream,
    /// Target plus comparator; the backend answers one blocking request.
    Comparative,
}

/// What the caller asked to audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitor_url: Option<String>,
    pub lang: String,
}

impl ScanRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into().trim().to_string(),
            competitor_url: None,
            lang: DEFAULT_LANG.to_string(),
        }
    }

    /// Sets the comparator target. Blank input clears it.
    pub fn with_competitor(mut self, competitor_url: Option<impl Into<String>>) -> Self {
        self.competitor_url = competitor_url
            .map(Into::into)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        let lang = lang.into();
        if !lang.trim().is_empty() {
            self.lang = lang.trim().to_string();
        }
        self
    }

    /// Mode selection depends only on whether a comparator is present.
    pub fn mode(&self) -> ScanMode {
        if self.competitor_url.is_some() {
            ScanMode::Comparative
        } else {
            ScanMode::Stream
        }
    }
}
