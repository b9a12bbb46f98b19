//! Process configuration: read once at startup, immutable afterwards.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Environment variable holding the default channel access token.
pub const TOKEN_VAR: &str = "LINE_CHANNEL_TOKEN";

const LOG_LEVEL_VAR: &str = "LINEPUSH_LOG_LEVEL";
const LOG_FILE_VAR: &str = "LINEPUSH_LOG_FILE";
const MAX_MESSAGE_LENGTH_VAR: &str = "LINEPUSH_MAX_MESSAGE_LENGTH";
const RETRY_COUNT_VAR: &str = "LINEPUSH_RETRY_COUNT";
const RETRY_DELAY_VAR: &str = "LINEPUSH_RETRY_DELAY_SECS";
const HTTP_TIMEOUT_VAR: &str = "LINEPUSH_HTTP_TIMEOUT_SECS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Bounded retry with a fixed delay between attempts.
///
/// `attempts` counts retries, not total tries: a send makes `attempts + 1`
/// calls before giving up.
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Logging sink configuration.
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Log file path; stdout when `None`.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Read-once process configuration.
///
/// Assemble one instance at startup (usually via [`AppConfig::from_env`]) and
/// pass it by reference to the facade; nothing in this crate reads the
/// environment after construction.
pub struct AppConfig {
    /// Default channel access token used when none is passed explicitly.
    pub channel_token: Option<String>,
    /// Maximum accepted message length in characters.
    pub max_message_length: usize,
    pub retry: RetryPolicy,
    /// Timeout applied to each HTTP request.
    pub http_timeout: Duration,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            channel_token: None,
            max_message_length: 5000,
            retry: RetryPolicy::default(),
            http_timeout: Duration::from_secs(30),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit key/value sequence.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let kv: HashMap<String, String> = vars.into_iter().collect();
        let mut config = Self::default();

        if let Some(token) = kv.get(TOKEN_VAR).filter(|v| !v.trim().is_empty()) {
            config.channel_token = Some(token.trim().to_owned());
        }
        if let Some(level) = kv.get(LOG_LEVEL_VAR).filter(|v| !v.trim().is_empty()) {
            config.log.level = level.trim().to_owned();
        }
        if let Some(file) = kv.get(LOG_FILE_VAR).filter(|v| !v.trim().is_empty()) {
            config.log.file = Some(PathBuf::from(file.trim()));
        }
        if let Some(value) = parse_var::<usize>(&kv, MAX_MESSAGE_LENGTH_VAR) {
            config.max_message_length = value;
        }
        if let Some(value) = parse_var::<u32>(&kv, RETRY_COUNT_VAR) {
            config.retry.attempts = value;
        }
        if let Some(value) = parse_var::<f64>(&kv, RETRY_DELAY_VAR) {
            config.retry.delay = Duration::from_secs_f64(value.max(0.0));
        }
        if let Some(value) = parse_var::<u64>(&kv, HTTP_TIMEOUT_VAR) {
            config.http_timeout = Duration::from_secs(value);
        }

        config
    }
}

fn parse_var<T: std::str::FromStr>(kv: &HashMap<String, String>, key: &str) -> Option<T> {
    let raw = kv.get(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring malformed configuration value");
            None
        }
    }
}
