use std::io;

use linepush::{AppConfig, LineBot, LogGuard};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();
    let _log = LogGuard::init(&config.log);

    let messages: Vec<String> = std::env::args().skip(1).collect();
    if messages.is_empty() {
        return Err(Box::new(io::Error::new(
            io::ErrorKind::InvalidInput,
            "usage: broadcast_batch <message> [<message> ...]",
        )));
    }
    let send_for_real = std::env::var("LINEPUSH_SEND").is_ok_and(|v| v == "1");

    let mut bot = LineBot::from_config(&config).map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("LINE_CHANNEL_TOKEN environment variable is required: {err}"),
        )
    })?;

    let results = bot.send_multiple(&messages, !send_for_real).await;
    for (message, delivered) in messages.iter().zip(&results) {
        println!("{delivered}: {message}");
    }

    Ok(())
}
