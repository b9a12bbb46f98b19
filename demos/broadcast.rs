use std::io;

use linepush::{AppConfig, LineBot, LogGuard};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();
    let _log = LogGuard::init(&config.log);

    let message = std::env::var("LINEPUSH_MESSAGE")
        .unwrap_or_else(|_| "Hello from the linepush demo.".to_owned());
    // Anything other than "1" stays in dry-run mode.
    let send_for_real = std::env::var("LINEPUSH_SEND").is_ok_and(|v| v == "1");

    let mut bot = LineBot::from_config(&config).map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("LINE_CHANNEL_TOKEN environment variable is required: {err}"),
        )
    })?;

    let delivered = bot.send_message(&message, !send_for_real, None).await;
    println!("delivered: {delivered}");

    Ok(())
}
