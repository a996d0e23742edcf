use thiserror::Error;

/// The single classified failure a scan resolves to.
///
/// `Display` yields a message suitable for showing to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Connection or read failure before a terminal event arrived.
    #[error("network error: {0}")]
    Transport(String),
    /// The backend answered with a non-success status.
    #[error("{detail}")]
    HttpStatus { status: u16, detail: String },
    /// The stream ended without a terminal event, or the response was unusable.
    #[error("{0}")]
    Protocol(String),
    /// The backend reported a failure through an `error` event.
    #[error("{0}")]
    Upstream(String),
    /// The session was abandoned before it settled.
    #[error("scan cancelled")]
    Cancelled,
}

impl ScanError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ScanError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 403 responses whose detail mentions the plan quota.
    pub fn is_quota_exceeded(&self) -> bool {
        match self {
            ScanError::HttpStatus { status: 403, detail } => {
                let detail = detail.to_lowercase();
                ["quota", "limit", "plan"]
                    .iter()
                    .any(|needle| detail.contains(needle))
            }
            _ => false,
        }
    }

    /// Message for the result screen.
    pub fn user_message(&self) -> String {
        match self {
            ScanError::HttpStatus {
                status: 408 | 504, ..
            } => "The scan took too long. The site may be slow or unreachable.".to_string(),
            ScanError::HttpStatus { status: 500, .. } => {
                "An internal error occurred. Please try again later.".to_string()
            }
            ScanError::Transport(_) => {
                "Unable to reach the server. Check your connection.".to_string()
            }
            other => other.to_string(),
        }
    }
}
