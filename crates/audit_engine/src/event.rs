use audit_core::AnalysisResult;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// One decoded line of the analysis stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Log { step: String, message: String },
    Complete { result: AnalysisResult },
    Error { message: String },
}

impl StreamEvent {
    /// `complete` and `error` end a session.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamEvent::Log { .. })
    }
}

/// Why a line was skipped. Never fatal for the stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("invalid json: {0}")]
    InvalidJson(String),
    #[error("line is not a json object")]
    NotAnObject,
    #[error("missing `type` discriminant")]
    MissingType,
    #[error("unknown event type `{0}`")]
    UnknownType(String),
    #[error("malformed `{kind}` event: {reason}")]
    MalformedEvent { kind: &'static str, reason: String },
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireEvent {
    Log { step: String, message: String },
    Complete { data: Option<Value> },
    Error { message: String },
}

const KINDS: [&str; 3] = ["log", "complete", "error"];

/// Parses one frame into a typed event.
pub fn parse_line(line: &str) -> Result<StreamEvent, ParseFailure> {
    let value: Value =
        serde_json::from_str(line).map_err(|err| ParseFailure::InvalidJson(err.to_string()))?;
    let object = value.as_object().ok_or(ParseFailure::NotAnObject)?;
    let kind = match object.get("type") {
        Some(Value::String(kind)) => kind.as_str(),
        Some(other) => return Err(ParseFailure::UnknownType(other.to_string())),
        None => return Err(ParseFailure::MissingType),
    };
    let Some(kind) = KINDS.iter().copied().find(|known| *known == kind) else {
        return Err(ParseFailure::UnknownType(kind.to_string()));
    };

    let malformed = |reason: String| ParseFailure::MalformedEvent { kind, reason };
    match serde_json::from_value::<WireEvent>(value).map_err(|err| malformed(err.to_string()))? {
        WireEvent::Log { step, message } => Ok(StreamEvent::Log { step, message }),
        WireEvent::Complete { data: Some(data) } if !data.is_null() => Ok(StreamEvent::Complete {
            result: AnalysisResult::new(data),
        }),
        WireEvent::Complete { .. } => Err(malformed("missing field `data`".to_string())),
        WireEvent::Error { message } => Ok(StreamEvent::Error { message }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_each_kind() {
        assert_eq!(
            parse_line(r#"{"type":"log","step":"seo","message":"a"}"#),
            Ok(StreamEvent::Log {
                step: "seo".into(),
                message: "a".into()
            })
        );
        assert_eq!(
            parse_line(r#"{"type":"error","message":"boom"}"#),
            Ok(StreamEvent::Error {
                message: "boom".into()
            })
        );
        let complete = parse_line(r#"{"type":"complete","data":{"url":"x","nested":[1,2]}}"#);
        assert_eq!(
            complete,
            Ok(StreamEvent::Complete {
                result: AnalysisResult::new(json!({"url": "x", "nested": [1, 2]}))
            })
        );
    }

    #[test]
    fn extra_fields_are_tolerated() {
        let event = parse_line(r#"{"type":"log","step":"seo","message":"a","ts":1}"#).unwrap();
        assert!(!event.is_terminal());
    }

    #[test]
    fn rejects_bad_lines() {
        assert!(matches!(parse_line("not json"), Err(ParseFailure::InvalidJson(_))));
        assert_eq!(parse_line("[1,2]"), Err(ParseFailure::NotAnObject));
        assert_eq!(parse_line(r#"{"step":"seo"}"#), Err(ParseFailure::MissingType));
        assert_eq!(
            parse_line(r#"{"type":"ping"}"#),
            Err(ParseFailure::UnknownType("ping".into()))
        );
        assert!(matches!(
            parse_line(r#"{"type":"log","message":"no step"}"#),
            Err(ParseFailure::MalformedEvent { kind: "log", .. })
        ));
        assert!(matches!(
            parse_line(r#"{"type":"complete","data":null}"#),
            Err(ParseFailure::MalformedEvent {
                kind: "complete",
                ..
            })
        ));
    }
}
