//! Sender layer: validate, then simulate or transmit with bounded retry;
//! sequential fan-out for batches.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::client::{BoxFuture, BroadcastReceipt, LineClient, LineError};
use crate::config::{AppConfig, RetryPolicy};
use crate::domain::{ChannelToken, MessageText, ValidationError};

/// Pause between consecutive real sends in a batch.
const BATCH_PAUSE: Duration = Duration::from_secs(1);

pub(crate) trait BroadcastApi: Send + Sync {
    fn broadcast_text<'a>(
        &'a self,
        text: &'a MessageText,
    ) -> BoxFuture<'a, Result<BroadcastReceipt, LineError>>;
}

impl BroadcastApi for LineClient {
    fn broadcast_text<'a>(
        &'a self,
        text: &'a MessageText,
    ) -> BoxFuture<'a, Result<BroadcastReceipt, LineError>> {
        Box::pin(LineClient::broadcast_text(self, text))
    }
}

pub(crate) trait ClientFactory: Send + Sync {
    fn connect(
        &self,
        token: &str,
        timeout: Duration,
    ) -> Result<Arc<dyn BroadcastApi>, LineError>;
}

struct LineClientFactory;

impl ClientFactory for LineClientFactory {
    fn connect(
        &self,
        token: &str,
        timeout: Duration,
    ) -> Result<Arc<dyn BroadcastApi>, LineError> {
        let token = ChannelToken::new(token)?;
        let client = LineClient::builder(token).timeout(timeout).build()?;
        Ok(Arc::new(client))
    }
}

pub(crate) trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Secondary, user-facing output next to the structured log.
///
/// The original tool printed its outcome lines to the terminal in addition to
/// the log file; callers that scrape those lines rely on them.
pub(crate) trait Console: Send + Sync {
    fn notice(&self, line: &str);
}

struct StdoutConsole;

impl Console for StdoutConsole {
    fn notice(&self, line: &str) {
        println!("{line}");
    }
}

/// A client handle that failed to construct stays failed for the lifetime of
/// the sender; construction is never retried.
enum ApiSlot {
    Ready(Arc<dyn BroadcastApi>),
    Broken,
}

/// Validates outgoing text and broadcasts it through a lazily-constructed
/// LINE client, retrying transient vendor failures a bounded number of times.
///
/// One sender is bound to one channel token. Every outcome converges to a
/// `bool`; no error type escapes the send methods.
pub struct BroadcastSender {
    token: String,
    max_message_length: usize,
    retry: RetryPolicy,
    http_timeout: Duration,
    factory: Arc<dyn ClientFactory>,
    sleeper: Arc<dyn Sleeper>,
    console: Arc<dyn Console>,
    api: Option<ApiSlot>,
}

impl BroadcastSender {
    /// Create a sender bound to `token`, taking limits and retry policy from
    /// `config`. The token is not validated here; an empty token only fails
    /// once a real (non-dry-run) send needs the client.
    pub fn new(token: impl Into<String>, config: &AppConfig) -> Self {
        Self {
            token: token.into(),
            max_message_length: config.max_message_length,
            retry: config.retry,
            http_timeout: config.http_timeout,
            factory: Arc::new(LineClientFactory),
            sleeper: Arc::new(TokioSleeper),
            console: Arc::new(StdoutConsole),
            api: None,
        }
    }

    /// Whether `message` would be accepted for sending.
    ///
    /// Rejections (empty, whitespace-only, over the configured length) are
    /// logged at warn level; acceptance has no side effect.
    pub fn validate(&self, message: &str) -> bool {
        self.checked(message).is_some()
    }

    fn check(&self, message: &str) -> Result<MessageText, ValidationError> {
        MessageText::with_limit(message, self.max_message_length)
    }

    fn checked(&self, message: &str) -> Option<MessageText> {
        match self.check(message) {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(%err, "rejected outgoing message");
                None
            }
        }
    }

    /// Get the memoized client, constructing it on first use. A factory
    /// failure (empty token, client build error) is permanent for this sender.
    fn api(&mut self) -> Option<Arc<dyn BroadcastApi>> {
        if self.api.is_none() {
            let slot = match self.factory.connect(&self.token, self.http_timeout) {
                Ok(api) => ApiSlot::Ready(api),
                Err(err) => {
                    error!(%err, "failed to construct LINE client");
                    self.console.notice(&format!("send error: {err}"));
                    ApiSlot::Broken
                }
            };
            self.api = Some(slot);
        }
        match &self.api {
            Some(ApiSlot::Ready(api)) => Some(Arc::clone(api)),
            _ => None,
        }
    }

    /// Validate and send one message.
    ///
    /// In dry-run mode the message is logged and echoed but the client is
    /// never touched. Otherwise the broadcast is attempted up to
    /// `retry_count + 1` times (configured default when `None`), sleeping the
    /// configured delay between attempts. Retry covers vendor-reported
    /// failures only; validation and parse errors fail immediately.
    pub async fn send(&mut self, message: &str, dry_run: bool, retry_count: Option<u32>) -> bool {
        let Some(text) = self.checked(message) else {
            return false;
        };

        if dry_run {
            info!(message, "dry run, not sending");
            self.console.notice(&format!("DRY RUN - NotSend: {message}"));
            return true;
        }

        let retries = retry_count.unwrap_or(self.retry.attempts);
        let Some(api) = self.api() else {
            return false;
        };

        for attempt in 0..=retries {
            match api.broadcast_text(&text).await {
                Ok(receipt) => {
                    info!(
                        message,
                        request_id = receipt.request_id.as_deref(),
                        "broadcast delivered"
                    );
                    self.console
                        .notice(&format!("MsgSend: {message}\nCHANNEL: {}", self.token));
                    return true;
                }
                Err(err) if err.is_retryable() => {
                    error!(attempt = attempt + 1, %err, "broadcast attempt failed");
                    if attempt < retries {
                        self.sleeper.sleep(self.retry.delay).await;
                    } else {
                        self.console.notice(&format!("send failed: {err}"));
                        return false;
                    }
                }
                Err(err) => {
                    error!(%err, "unexpected send error");
                    self.console.notice(&format!("send error: {err}"));
                    return false;
                }
            }
        }

        false
    }

    /// Send every message in order, one result per input.
    ///
    /// Individual failures do not stop the batch. Real sends are throttled
    /// with a fixed pause between consecutive messages; there is no pause
    /// after the last message and none at all in dry-run mode.
    pub async fn send_batch<S: AsRef<str>>(&mut self, messages: &[S], dry_run: bool) -> Vec<bool> {
        let total = messages.len();
        let mut results = Vec::with_capacity(total);
        for (index, message) in messages.iter().enumerate() {
            info!(current = index + 1, total, "sending batch message");
            results.push(self.send(message.as_ref(), dry_run, None).await);
            if !dry_run && index + 1 < total {
                self.sleeper.sleep(BATCH_PAUSE).await;
            }
        }
        results
    }
}
