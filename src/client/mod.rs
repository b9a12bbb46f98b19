//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{ChannelToken, MessageText, ValidationError};

const DEFAULT_BROADCAST_ENDPOINT: &str = "https://api.line.me/v2/bot/message/broadcast";
const REQUEST_ID_HEADER: &str = "x-line-request-id";

pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
    pub(crate) request_id: Option<String>,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        bearer: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        bearer: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .bearer_auth(bearer)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let request_id = response
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response.text().await?;
            Ok(HttpResponse {
                status,
                body,
                request_id,
            })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`LineClient`].
///
/// This error preserves:
/// - HTTP-level failures (transport failures or non-2xx status without a
///   recognizable error body),
/// - API-level failures (a LINE error payload with a message),
/// - validation/parse failures.
pub enum LineError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status without a parseable LINE error body.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// LINE Messaging API rejected the request with an error payload.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl LineError {
    /// Whether re-attempting the same call may succeed.
    ///
    /// Everything the vendor reports — rate limits, auth rejections, server
    /// faults, network failures — is treated as retryable; only local
    /// validation and parse failures are permanent.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::HttpStatus { .. } | Self::Api { .. }
        )
    }
}

#[derive(Debug, Clone)]
/// Builder for [`LineClient`].
///
/// Use this when you need to customize the endpoint, timeout, or user-agent.
pub struct LineClientBuilder {
    token: ChannelToken,
    endpoint: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl LineClientBuilder {
    /// Create a builder with the default endpoint and no timeout/user-agent override.
    pub fn new(token: ChannelToken) -> Self {
        Self {
            token,
            endpoint: DEFAULT_BROADCAST_ENDPOINT.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the broadcast endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`LineClient`].
    pub fn build(self) -> Result<LineClient, LineError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| LineError::Transport(Box::new(err)))?;

        Ok(LineClient {
            token: self.token,
            endpoint: self.endpoint,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Receipt for an accepted broadcast.
pub struct BroadcastReceipt {
    /// `X-Line-Request-Id` assigned by the API, when present.
    pub request_id: Option<String>,
}

#[derive(Clone)]
/// High-level LINE Messaging API client.
///
/// This type orchestrates request encoding, bearer authentication, and error
/// mapping for `https://api.line.me/v2/bot/message/broadcast`.
pub struct LineClient {
    token: ChannelToken,
    endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl LineClient {
    /// Create a client using the default endpoint.
    ///
    /// For more customization, use [`LineClient::builder`].
    pub fn new(token: ChannelToken) -> Self {
        Self {
            token,
            endpoint: DEFAULT_BROADCAST_ENDPOINT.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(token: ChannelToken) -> LineClientBuilder {
        LineClientBuilder::new(token)
    }

    /// The channel token this client authenticates with.
    pub fn token(&self) -> &ChannelToken {
        &self.token
    }

    /// Broadcast a text message to all followers of the channel.
    ///
    /// Errors:
    /// - [`LineError::Transport`] when the HTTP call itself fails,
    /// - [`LineError::Api`] when LINE returns an error payload,
    /// - [`LineError::HttpStatus`] for non-2xx responses without one.
    pub async fn broadcast_text(
        &self,
        text: &MessageText,
    ) -> Result<BroadcastReceipt, LineError> {
        let body = crate::transport::encode_broadcast_body(text);

        let response = self
            .http
            .post_json(&self.endpoint, self.token.as_str(), body)
            .await
            .map_err(LineError::Transport)?;

        if (200..=299).contains(&response.status) {
            return Ok(BroadcastReceipt {
                request_id: response.request_id,
            });
        }

        match crate::transport::decode_error_body(&response.body) {
            Ok(parsed) => Err(LineError::Api {
                status: response.status,
                message: parsed.message,
            }),
            Err(_) => {
                let body = if response.body.trim().is_empty() {
                    None
                } else {
                    Some(response.body)
                };
                Err(LineError::HttpStatus {
                    status: response.status,
                    body,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        last_url: Option<String>,
        last_bearer: Option<String>,
        last_body: Option<String>,
        response_status: u16,
        response_body: String,
        response_request_id: Option<String>,
    }

    impl FakeTransport {
        fn new(response_status: u16, response_body: impl Into<String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    last_url: None,
                    last_bearer: None,
                    last_body: None,
                    response_status,
                    response_body: response_body.into(),
                    response_request_id: None,
                })),
            }
        }

        fn with_request_id(self, request_id: impl Into<String>) -> Self {
            self.state.lock().unwrap().response_request_id = Some(request_id.into());
            self
        }

        fn last_request(&self) -> (Option<String>, Option<String>, Option<String>) {
            let state = self.state.lock().unwrap();
            (
                state.last_url.clone(),
                state.last_bearer.clone(),
                state.last_body.clone(),
            )
        }
    }

    impl HttpTransport for FakeTransport {
        fn post_json<'a>(
            &'a self,
            url: &'a str,
            bearer: &'a str,
            body: String,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let (status, response_body, request_id) = {
                    let mut state = self.state.lock().unwrap();
                    state.last_url = Some(url.to_owned());
                    state.last_bearer = Some(bearer.to_owned());
                    state.last_body = Some(body);
                    (
                        state.response_status,
                        state.response_body.clone(),
                        state.response_request_id.clone(),
                    )
                };
                Ok(HttpResponse {
                    status,
                    body: response_body,
                    request_id,
                })
            })
        }
    }

    fn make_client(token: &str, transport: FakeTransport) -> LineClient {
        LineClient {
            token: ChannelToken::new(token).unwrap(),
            endpoint: "https://example.invalid/v2/bot/message/broadcast".to_owned(),
            http: Arc::new(transport),
        }
    }

    #[tokio::test]
    async fn broadcast_sends_bearer_token_and_text_body() {
        let transport = FakeTransport::new(200, "{}").with_request_id("req-1");
        let client = make_client("test_token", transport.clone());

        let receipt = client
            .broadcast_text(&MessageText::new("hello").unwrap())
            .await
            .unwrap();
        assert_eq!(receipt.request_id.as_deref(), Some("req-1"));

        let (url, bearer, body) = transport.last_request();
        assert_eq!(
            url.as_deref(),
            Some("https://example.invalid/v2/bot/message/broadcast")
        );
        assert_eq!(bearer.as_deref(), Some("test_token"));

        let body: serde_json::Value = serde_json::from_str(&body.unwrap()).unwrap();
        assert_eq!(body["messages"][0]["type"], "text");
        assert_eq!(body["messages"][0]["text"], "hello");
    }

    #[tokio::test]
    async fn broadcast_maps_error_payload_to_api_error() {
        let transport = FakeTransport::new(401, r#"{"message":"Authentication failed"}"#);
        let client = make_client("bad_token", transport);

        let err = client
            .broadcast_text(&MessageText::new("hello").unwrap())
            .await
            .unwrap_err();
        match err {
            LineError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Authentication failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn broadcast_maps_unparseable_error_to_http_status() {
        let transport = FakeTransport::new(500, "oops");
        let client = make_client("test_token", transport);

        let err = client
            .broadcast_text(&MessageText::new("hello").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LineError::HttpStatus {
                status: 500,
                body: Some(_)
            }
        ));
    }

    #[tokio::test]
    async fn broadcast_maps_empty_error_body_to_none() {
        let transport = FakeTransport::new(503, "   ");
        let client = make_client("test_token", transport);

        let err = client
            .broadcast_text(&MessageText::new("hello").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LineError::HttpStatus {
                status: 503,
                body: None
            }
        ));
    }

    #[test]
    fn retryable_classification_follows_vendor_boundary() {
        let transient = LineError::Api {
            status: 429,
            message: "rate limited".to_owned(),
        };
        assert!(transient.is_retryable());

        let auth = LineError::Api {
            status: 401,
            message: "Authentication failed".to_owned(),
        };
        assert!(auth.is_retryable());

        assert!(
            LineError::HttpStatus {
                status: 500,
                body: None
            }
            .is_retryable()
        );

        let validation = LineError::Validation(ValidationError::Empty { field: "token" });
        assert!(!validation.is_retryable());
    }

    #[test]
    fn builder_endpoint_override_is_applied() {
        let client = LineClient::builder(ChannelToken::new("key").unwrap())
            .endpoint("https://example.invalid/broadcast")
            .build()
            .unwrap();
        assert_eq!(client.endpoint, "https://example.invalid/broadcast");
    }
}
