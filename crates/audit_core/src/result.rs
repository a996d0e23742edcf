use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Final audit payload, carried verbatim from the backend.
///
/// The core never reshapes this document; the accessors only read the few
/// fields a caller needs for routing (target url, comparator, winner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult(Value);

impl AnalysisResult {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn url(&self) -> Option<&str> {
        self.0.get("url").and_then(Value::as_str)
    }

    /// Nested comparator result (comparative scans only).
    pub fn competitor(&self) -> Option<&Value> {
        self.0.get("competitor").filter(|value| !value.is_null())
    }

    pub fn winner(&self) -> Option<Winner> {
        self.0
            .get("winner")
            .and_then(Value::as_str)
            .and_then(Winner::parse)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }
}

impl From<Value> for AnalysisResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Outcome of a comparative scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Target,
    Competitor,
    Draw,
}

impl Winner {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "target" => Some(Self::Target),
            "competitor" => Some(Self::Competitor),
            "draw" => Some(Self::Draw),
            _ => None,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Target => write!(f, "target"),
            Winner::Competitor => write!(f, "competitor"),
            Winner::Draw => write!(f, "draw"),
        }
    }
}
