//! # mailrelay
//!
//! Sends one plain-text message through an SMTP relay, then disconnects.
//!
//! Every send connects, upgrades with STARTTLS (refusing to continue on a
//! plaintext session), authenticates with PLAIN, runs a single
//! MAIL/RCPT/DATA transaction and quits. There is no pooling, queuing or retry.
//!
//! ## Example
//!
//! ```ignore
//! use mailrelay::{Mailbox, Sender, SenderConfig, TlsConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sender = Sender::new(
//!         SenderConfig::new("mailer@example.com", "app-password")
//!             .with_local_name("web-01.example.com"),
//!     );
//!
//!     let from: Mailbox = "Mailer <mailer@example.com>".parse()?;
//!     let to: Mailbox = "Ops <ops@example.org>".parse()?;
//!
//!     sender
//!         .send("smtp.example.com", 587, &TlsConfig::new(), &from, &to, "Nightly report", "All green.")
//!         .await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod message;
mod sender;
pub mod session;

pub use config::{ConfigError, SenderConfig};
pub use error::{Error, ErrorKind, Result};
pub use message::Message;
pub use sender::Sender;
pub use session::{Connector, Session, TcpConnector};

pub use mailrelay_smtp as smtp;
pub use mailrelay_smtp::{Address, Mailbox, TlsConfig, TlsInfo};
