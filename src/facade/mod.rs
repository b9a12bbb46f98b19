//! Facade layer: stable, defensive entry surface over the sender.
//!
//! This is the call shape external scripts depend on: dry-run by default,
//! boolean outcomes, and a legacy free function kept working unchanged.

use crate::config::AppConfig;
use crate::domain::{ChannelToken, ValidationError};
use crate::sender::BroadcastSender;

/// Thin wrapper pairing a [`BroadcastSender`] with the process configuration.
///
/// Callers above this type never see an error value from a send: every
/// failure — validation, configuration, vendor — comes back as `false`.
pub struct LineBot {
    sender: BroadcastSender,
}

impl std::fmt::Debug for LineBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineBot").finish_non_exhaustive()
    }
}

impl LineBot {
    /// Build a bot with an explicit token, falling back to the configured
    /// default token when `None`.
    ///
    /// Fails only when neither an explicit nor a configured token exists;
    /// an empty-but-present token is deferred to the first real send, which
    /// reports it as a `false` outcome.
    pub fn new(token: Option<String>, config: &AppConfig) -> Result<Self, ValidationError> {
        match token {
            Some(token) => Ok(Self::with_token(token, config)),
            None => Self::from_config(config),
        }
    }

    /// Build a bot using the default token from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, ValidationError> {
        match &config.channel_token {
            Some(token) => Ok(Self::with_token(token.clone(), config)),
            None => Err(ValidationError::Empty {
                field: ChannelToken::FIELD,
            }),
        }
    }

    /// Build a bot bound to `token`.
    pub fn with_token(token: impl Into<String>, config: &AppConfig) -> Self {
        Self {
            sender: BroadcastSender::new(token, config),
        }
    }

    /// Send one message. `debug = true` (the expected default posture) means
    /// dry run: validate and log, but transmit nothing.
    pub async fn send_message(
        &mut self,
        message: &str,
        debug: bool,
        retry_count: Option<u32>,
    ) -> bool {
        self.sender.send(message, debug, retry_count).await
    }

    /// Send several messages in order, one result per input.
    pub async fn send_multiple<S: AsRef<str>>(&mut self, messages: &[S], debug: bool) -> Vec<bool> {
        self.sender.send_batch(messages, debug).await
    }
}

/// Legacy call shape kept for old scripts: `send = true` transmits for real,
/// anything else is a dry run.
///
/// Both arguments must be explicitly non-empty; a missing one prints a
/// prompt-style notice and returns `false` without constructing a sender.
/// This shape always uses the default retry count.
pub async fn send_text(message: &str, send: bool, token: &str) -> bool {
    if token.is_empty() {
        println!("specify a token?");
        return false;
    }

    if message.is_empty() {
        println!("the message is empty?");
        return false;
    }

    let config = AppConfig::default();
    let mut bot = LineBot::with_token(token, &config);
    bot.send_message(message, !send, None).await
}
