//! Typed Rust layer over the LINE Messaging API broadcast endpoint.
//!
//! The design is layered: a domain layer of strong types, a transport layer
//! for wire-format details, a small client layer orchestrating HTTP, a sender
//! that validates and retries, and a facade presenting the stable call
//! surface (dry-run by default, boolean outcomes).
//!
//! ```rust,no_run
//! use linepush::{AppConfig, LineBot};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::from_env();
//!     let mut bot = LineBot::with_token("channel-access-token", &config);
//!     // debug = true is a dry run: validated and logged, never transmitted.
//!     let delivered = bot.send_message("hello", true, None).await;
//!     assert!(delivered);
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
pub mod facade;
pub mod logging;
pub mod sender;
mod transport;

pub use client::{BroadcastReceipt, LineClient, LineClientBuilder, LineError};
pub use config::{AppConfig, LogConfig, RetryPolicy};
pub use domain::{ChannelToken, DEFAULT_MAX_TEXT_LENGTH, MessageText, ValidationError};
pub use facade::{LineBot, send_text};
pub use logging::LogGuard;
pub use sender::BroadcastSender;
