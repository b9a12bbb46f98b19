//! Tracing subscriber setup for binaries using this crate.

use std::ffi::OsString;
use std::path::Path;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogConfig;

#[must_use = "LogGuard must be held to keep logging active"]
#[non_exhaustive]
/// Keeps the non-blocking log writer alive; drop it and buffered lines are lost.
pub struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

impl LogGuard {
    /// Install the global subscriber.
    ///
    /// `RUST_LOG` wins over the configured level when set. Logs go to the
    /// configured file, or stdout when no path is given.
    pub fn init(config: &LogConfig) -> Self {
        let (non_blocking_writer, guard) = match &config.file {
            Some(path) => {
                let dir = path
                    .parent()
                    .filter(|parent| !parent.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                let file_name = path
                    .file_name()
                    .map(OsString::from)
                    .unwrap_or_else(|| OsString::from("linepush.log"));
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name))
            }
            None => tracing_appender::non_blocking(std::io::stdout()),
        };

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.level));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(non_blocking_writer))
            .try_init()
            .expect("failed to init tracing");

        Self { _guard: guard }
    }
}
