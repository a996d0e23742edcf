use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use audit_core::{AnalysisResult, ScanError, ScanRequest};
use audit_logging::{audit_debug, audit_info};
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde_json::Value;
use url::Url;

/// Environment variable read by [`EnvCredential::default`].
pub const DEFAULT_TOKEN_VAR: &str = "SITE_AUDIT_TOKEN";

/// Response body of a streaming scan, chunk by chunk.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ScanError>> + Send>>;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub stream_path: String,
    pub compare_path: String,
    pub connect_timeout: Duration,
    /// Whole-request limit. `None` leaves streams open as long as the server keeps them.
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            stream_path: "/api/stream".to_string(),
            compare_path: "/api/analyze".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            user_agent: concat!("site-audit/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Supplies the opaque bearer token, when the user has one.
pub trait CredentialProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticCredential(Option<String>);

impl StaticCredential {
    pub fn new(token: Option<String>) -> Self {
        Self(token)
    }
}

impl CredentialProvider for StaticCredential {
    fn bearer_token(&self) -> Option<String> {
        non_empty(self.0.clone())
    }
}

/// Reads the token from an environment variable on every request.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredential {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_VAR)
    }
}

impl CredentialProvider for EnvCredential {
    fn bearer_token(&self) -> Option<String> {
        non_empty(std::env::var(&self.var).ok())
    }
}

fn non_empty(token: Option<String>) -> Option<String> {
    token
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// The two backend calls a scan can make.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Single-target scan: opens the JSON Lines progress stream.
    async fn open_stream(&self, request: &ScanRequest) -> Result<ByteStream, ScanError>;

    /// Comparative scan: one blocking request, one JSON document back.
    async fn compare(&self, request: &ScanRequest) -> Result<AnalysisResult, ScanError>;
}

pub struct ReqwestTransport {
    settings: ClientSettings,
    client: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl ReqwestTransport {
    pub fn new(
        settings: ClientSettings,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ScanError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent.clone());
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ScanError::Transport(err.to_string()))?;
        Ok(Self {
            settings,
            client,
            credentials,
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> Result<Url, ScanError> {
        let raw = format!("{}{}", self.settings.base_url.trim_end_matches('/'), path);
        Url::parse(&raw)
            .map_err(|err| ScanError::Transport(format!("invalid endpoint {raw}: {err}")))
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.credentials.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn open_stream(&self, request: &ScanRequest) -> Result<ByteStream, ScanError> {
        let endpoint = self.endpoint(&self.settings.stream_path)?;
        audit_info!("Opening analysis stream for {} ({})", request.url, request.lang);

        let response = self
            .authorize(self.client.get(endpoint))
            .query(&[("url", request.url.as_str()), ("lang", request.lang.as_str())])
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;

        Ok(Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(map_reqwest_error)),
        ))
    }

    async fn compare(&self, request: &ScanRequest) -> Result<AnalysisResult, ScanError> {
        let endpoint = self.endpoint(&self.settings.compare_path)?;
        audit_info!(
            "Starting comparative scan {} vs {} ({})",
            request.url,
            request.competitor_url.as_deref().unwrap_or("-"),
            request.lang
        );

        let response = self
            .authorize(self.client.post(endpoint))
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        audit_debug!("Comparative response: {} bytes", body.len());
        let value: Value = serde_json::from_slice(&body)
            .map_err(|err| ScanError::Protocol(format!("invalid comparative response: {err}")))?;
        if !value.is_object() {
            return Err(ScanError::Protocol(
                "comparative response is not a json object".to_string(),
            ));
        }
        Ok(AnalysisResult::new(value))
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ScanError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = error_detail(&body).unwrap_or(body);
    let detail = if detail.trim().is_empty() {
        status.to_string()
    } else {
        detail
    };
    Err(ScanError::HttpStatus {
        status: status.as_u16(),
        detail,
    })
}

/// `detail` of a JSON error body; non-string details are kept as JSON text.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(detail) => Some(detail.clone()),
        other => Some(other.to_string()),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ScanError {
    if err.is_timeout() {
        return ScanError::Transport(format!("timed out: {err}"));
    }
    ScanError::Transport(err.to_string())
}
