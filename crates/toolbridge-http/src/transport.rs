//! Single-shot HTTP POST transport for MCP JSON-RPC envelopes.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode, header};
use tracing::debug;

use toolbridge_protocol::{Error, Result, RpcRequest};

use crate::auth::AuthBinding;

/// Request header carrying the protocol session id.
pub const SESSION_HEADER: &str = "Mcp-Session-Id";

/// `Accept` value sent on every request.
pub const ACCEPT_VALUE: &str = "application/json, text/event-stream";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest body excerpt copied into a transport error.
const ERROR_BODY_EXCERPT: usize = 512;

/// HTTP transport configuration
#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    /// Server address; a trailing `/` is stripped before use
    pub endpoint: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Request authentication
    pub auth: AuthBinding,

    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,

    /// User agent string (set to None to disable the User-Agent header)
    pub user_agent: Option<String>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/mcp".to_string(),
            timeout: DEFAULT_TIMEOUT,
            auth: AuthBinding::None,
            headers: HashMap::new(),
            user_agent: Some(format!("toolbridge/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

/// Sends one envelope per POST.
pub struct HttpTransport {
    endpoint: String,
    timeout: Duration,
    auth: AuthBinding,
    base_headers: header::HeaderMap,
    http_client: HttpClient,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("auth", &self.auth)
            .finish()
    }
}

impl HttpTransport {
    /// Create a transport from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the underlying HTTP client cannot be built.
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        // Explicit rustls: cargo features are additive and another crate may pull native-tls.
        let mut client_builder = HttpClient::builder()
            .use_rustls_tls()
            .timeout(config.timeout);

        if let Some(ref user_agent) = config.user_agent {
            client_builder = client_builder.user_agent(user_agent);
        }

        let http_client = client_builder
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {e}")))?;

        let mut base_headers = header::HeaderMap::new();
        for (key, value) in &config.headers {
            if let (Ok(k), Ok(v)) = (
                header::HeaderName::from_bytes(key.as_bytes()),
                header::HeaderValue::from_str(value),
            ) {
                base_headers.insert(k, v);
            }
        }

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            auth: config.auth,
            base_headers,
            http_client,
        })
    }

    /// The URL every envelope is posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The configured per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn build_headers(&self, session_id: Option<&str>) -> header::HeaderMap {
        let mut headers = self.base_headers.clone();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT_VALUE));

        if let Some(session_id) = session_id
            && let Ok(session_value) = header::HeaderValue::from_str(session_id)
        {
            headers.insert(SESSION_HEADER, session_value);
        }

        headers
    }

    /// POST one envelope.
    ///
    /// A reply is returned for every HTTP answer, including error statuses, so
    /// the caller can record a session id before checking the status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] when the request cannot be sent or times out.
    pub async fn post(&self, request: &RpcRequest, session_id: Option<&str>) -> Result<HttpReply> {
        let payload = request.to_bytes()?;

        debug!(
            method = %request.method,
            with_session = session_id.is_some(),
            url = %self.endpoint,
            "Sending MCP HTTP request"
        );

        let builder = self
            .http_client
            .post(&self.endpoint)
            .headers(self.build_headers(session_id))
            .body(payload);

        let response = self.auth.apply(builder).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::transport(format!("Request timed out after {:?}: {e}", self.timeout))
            } else {
                Error::transport(format!("Request to {} failed: {e}", self.endpoint))
            }
        })?;

        let status = response.status();
        let session_id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        debug!(
            method = %request.method,
            status = %status,
            session_assigned = session_id.is_some(),
            "Received MCP HTTP response"
        );

        Ok(HttpReply {
            status,
            session_id,
            response,
        })
    }
}

/// The server's answer to one POST; the body is read lazily.
#[derive(Debug)]
pub struct HttpReply {
    status: StatusCode,
    session_id: Option<String>,
    response: reqwest::Response,
}

impl HttpReply {
    /// HTTP status
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Session id announced via the `mcp-session-id` response header.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Fail on a non-2xx status; the error text carries the status line and a
    /// body excerpt, which is what session-loss detection inspects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] with the status code set.
    pub async fn error_for_status(self) -> Result<Self> {
        if self.status.is_success() {
            return Ok(self);
        }

        let status = self.status;
        let body = self.response.text().await.unwrap_or_default();
        let excerpt: String = body.trim().chars().take(ERROR_BODY_EXCERPT).collect();
        let message = if excerpt.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {excerpt}")
        };

        Err(Error::http_status(status.as_u16(), message))
    }

    /// Read the whole body as text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the body cannot be read (including a read timeout).
    pub async fn text(self) -> Result<String> {
        self.response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response body: {e}")))
    }
}
