#![allow(clippy::expect_used, clippy::doc_markdown, clippy::uninlined_format_args)]
//! Example: Send one message through an authenticated relay
//!
//! Reads everything from the environment:
//!
//! - `RELAY_HOST` / `RELAY_PORT` (default port 587)
//! - `RELAY_USER` / `RELAY_PASSWORD`
//! - `RELAY_LOCAL_NAME` (optional, sent as the EHLO name)
//! - `MAIL_FROM` / `MAIL_TO`, e.g. `Mailer <mailer@example.com>`
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=mailrelay=debug,mailrelay_smtp=trace \
//!     cargo run --package mailrelay --example send_once
//! ```

use std::env;

use mailrelay::{Mailbox, Sender, SenderConfig, TlsConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let host = env::var("RELAY_HOST").expect("RELAY_HOST must be set");
    let port = env::var("RELAY_PORT")
        .ok()
        .map_or(Ok(587), |port| port.parse::<u16>())?;

    let mut config = SenderConfig::new(
        env::var("RELAY_USER").unwrap_or_default(),
        env::var("RELAY_PASSWORD").unwrap_or_default(),
    );
    if let Ok(local_name) = env::var("RELAY_LOCAL_NAME") {
        config = config.with_local_name(local_name);
    }

    let from: Mailbox = env::var("MAIL_FROM").expect("MAIL_FROM must be set").parse()?;
    let to: Mailbox = env::var("MAIL_TO").expect("MAIL_TO must be set").parse()?;

    println!("Sending to {} via {}:{}...", to, host, port);

    let sender = Sender::new(config);
    match sender
        .send(
            &host,
            port,
            &TlsConfig::new(),
            &from,
            &to,
            "mailrelay test",
            "If you can read this, the relay accepted the message.",
        )
        .await
    {
        Ok(()) => println!("✓ Sent"),
        Err(e) => {
            eprintln!("✗ {}", e);
            if let Some(code) = e.reply_code() {
                eprintln!("  relay replied {}", code);
            }
            return Err(e.into());
        }
    }

    Ok(())
}
